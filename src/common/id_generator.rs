// src/common/id_generator.rs
//! Crockford Base32 ID Generator
//!
//! Generates human-readable, prefixed IDs using Crockford Base32 encoding.
//! Format: PREFIX_XXXXXX (e.g., J_K7NP3X for jobs)

use rand::Rng;

/// Crockford Base32 alphabet (excludes I, L, O, U to avoid confusion)
const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Entity type prefixes for ID generation
#[derive(Debug, Clone, Copy)]
pub enum EntityPrefix {
    /// Job posting (J_)
    Job,
    /// Application (A_)
    Application,
    /// User (U_)
    User,
    /// Company (C_)
    Company,
    /// Organization (G_)
    Organization,
    /// CV document (V_)
    Cv,
    /// Application attachment (F_) - F for File
    Attachment,
    /// Status history entry (H_)
    History,
    /// Follow relation (N_) - N for Network edge
    Follow,
    /// Post (P_)
    Post,
    /// Tender (T_)
    Tender,
    /// Reference entry (R_)
    Reference,
    /// Work experience entry (X_)
    Experience,
}

impl EntityPrefix {
    /// Get the string prefix for this entity type
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityPrefix::Job => "J",
            EntityPrefix::Application => "A",
            EntityPrefix::User => "U",
            EntityPrefix::Company => "C",
            EntityPrefix::Organization => "G",
            EntityPrefix::Cv => "V",
            EntityPrefix::Attachment => "F",
            EntityPrefix::History => "H",
            EntityPrefix::Follow => "N",
            EntityPrefix::Post => "P",
            EntityPrefix::Tender => "T",
            EntityPrefix::Reference => "R",
            EntityPrefix::Experience => "X",
        }
    }
}

/// Generate a random Crockford Base32 string of specified length
fn generate_crockford_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..32);
            CROCKFORD_ALPHABET[idx] as char
        })
        .collect()
}

/// Generate a prefixed ID in the format "PREFIX_XXXXXX" (e.g., "J_K7NP3X")
pub fn generate_id(prefix: EntityPrefix) -> String {
    format!("{}_{}", prefix.as_str(), generate_crockford_string(6))
}

/// Generate a raw Crockford Base32 string without prefix
/// Useful for filenames or other non-entity identifiers
pub fn generate_raw_id(length: usize) -> String {
    generate_crockford_string(length)
}

/// Validates ID format - accepts both UUIDs and custom prefixed IDs (e.g., J_XXXXXX)
pub fn is_valid_entity_id(id_str: &str) -> bool {
    if uuid::Uuid::parse_str(id_str).is_ok() {
        return true;
    }

    if id_str.len() >= 3 && id_str.chars().nth(1) == Some('_') {
        let prefix = id_str.chars().next().unwrap();
        let suffix = &id_str[2..];

        let valid_prefixes = ['J', 'A', 'U', 'C', 'G', 'V', 'F', 'H', 'N', 'P', 'T', 'R', 'X'];
        if valid_prefixes.contains(&prefix) && !suffix.is_empty() {
            return suffix
                .chars()
                .all(|c| CROCKFORD_ALPHABET.contains(&(c.to_ascii_uppercase() as u8)));
        }
    }

    false
}

// ============================================================================
// Convenience functions for each entity type
// ============================================================================

/// Generate a Job ID (J_XXXXXX)
pub fn generate_job_id() -> String {
    generate_id(EntityPrefix::Job)
}

/// Generate an Application ID (A_XXXXXX)
pub fn generate_application_id() -> String {
    generate_id(EntityPrefix::Application)
}

/// Generate a User ID (U_XXXXXX)
pub fn generate_user_id() -> String {
    generate_id(EntityPrefix::User)
}

/// Generate a Company ID (C_XXXXXX)
pub fn generate_company_id() -> String {
    generate_id(EntityPrefix::Company)
}

/// Generate an Organization ID (G_XXXXXX)
pub fn generate_organization_id() -> String {
    generate_id(EntityPrefix::Organization)
}

/// Generate a CV ID (V_XXXXXX)
pub fn generate_cv_id() -> String {
    generate_id(EntityPrefix::Cv)
}

/// Generate an Attachment ID (F_XXXXXX)
pub fn generate_attachment_id() -> String {
    generate_id(EntityPrefix::Attachment)
}

/// Generate a History ID (H_XXXXXX)
pub fn generate_history_id() -> String {
    generate_id(EntityPrefix::History)
}

/// Generate a Follow ID (N_XXXXXX)
pub fn generate_follow_id() -> String {
    generate_id(EntityPrefix::Follow)
}

/// Generate a Post ID (P_XXXXXX)
pub fn generate_post_id() -> String {
    generate_id(EntityPrefix::Post)
}

/// Generate a Tender ID (T_XXXXXX)
pub fn generate_tender_id() -> String {
    generate_id(EntityPrefix::Tender)
}

/// Generate a Reference ID (R_XXXXXX)
pub fn generate_reference_id() -> String {
    generate_id(EntityPrefix::Reference)
}

/// Generate an Experience ID (X_XXXXXX)
pub fn generate_experience_id() -> String {
    generate_id(EntityPrefix::Experience)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_carry_prefix() {
        let id = generate_job_id();
        assert!(id.starts_with("J_"));
        assert_eq!(id.len(), 8);

        let id = generate_application_id();
        assert!(id.starts_with("A_"));
    }

    #[test]
    fn test_ids_use_crockford_alphabet() {
        let id = generate_raw_id(32);
        assert!(id
            .bytes()
            .all(|b| CROCKFORD_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_is_valid_entity_id() {
        assert!(is_valid_entity_id("J_K7NP3X"));
        assert!(is_valid_entity_id("550e8400-e29b-41d4-a716-446655440000"));
        assert!(is_valid_entity_id(&generate_cv_id()));
        assert!(!is_valid_entity_id("Z_K7NP3X"));
        assert!(!is_valid_entity_id("J_"));
        assert!(!is_valid_entity_id("not-an-id"));
    }
}

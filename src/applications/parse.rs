// src/applications/parse.rs
//! Pure parsing helpers for the multipart submission body.
//!
//! String fields arrive JSON-encoded from the client. A field that fails to
//! parse as JSON degrades to a raw string rather than failing the request;
//! structured conversions below then make the best of either shape.

use serde_json::Value;
use std::collections::HashMap;

use super::models::{ContactInfo, ReferenceInput, SubmissionFields, WorkExperienceInput};

/// Parse a raw field value as JSON, degrading to a plain string on failure.
pub fn parse_json_field(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Extracts a list of strings from a parsed field value.
///
/// Arrays keep their string elements; a degraded raw string becomes a
/// single-element list when non-empty.
pub fn string_list_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Vec::new()
            } else {
                vec![trimmed.to_string()]
            }
        }
        _ => Vec::new(),
    }
}

/// Deduplicated union of profile skills and submission skills,
/// case-insensitive, first-seen casing wins, order preserved.
pub fn merge_skills(profile_skills: &[String], submitted_skills: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut merged = Vec::new();

    for skill in profile_skills.iter().chain(submitted_skills.iter()) {
        let trimmed = skill.trim();
        if trimmed.is_empty() {
            continue;
        }
        if seen.insert(trimmed.to_lowercase()) {
            merged.push(trimmed.to_string());
        }
    }

    merged
}

fn contact_from_value(value: Value) -> ContactInfo {
    serde_json::from_value(value).unwrap_or_default()
}

fn references_from_value(value: Value) -> Vec<ReferenceInput> {
    serde_json::from_value(value).unwrap_or_default()
}

fn work_experience_from_value(value: Value) -> Vec<WorkExperienceInput> {
    serde_json::from_value(value).unwrap_or_default()
}

impl SubmissionFields {
    /// Assemble structured submission fields from the raw text parts of the
    /// multipart body.
    pub fn from_raw(fields: &HashMap<String, String>) -> Self {
        let get = |name: &str| fields.get(name).map(|s| s.as_str()).unwrap_or("");

        let skills = string_list_from_value(&parse_json_field(get("skills")));
        let selected_cv_ids = string_list_from_value(&parse_json_field(get("selectedCVs")));

        let contact_info = fields
            .get("contactInfo")
            .map(|raw| contact_from_value(parse_json_field(raw)))
            .unwrap_or_default();

        let references = fields
            .get("references")
            .map(|raw| references_from_value(parse_json_field(raw)))
            .unwrap_or_default();

        let work_experience = fields
            .get("workExperience")
            .map(|raw| work_experience_from_value(parse_json_field(raw)))
            .unwrap_or_default();

        SubmissionFields {
            cover_letter: get("coverLetter").trim().to_string(),
            skills,
            selected_cv_ids,
            contact_info,
            references,
            work_experience,
        }
    }
}

// src/profile/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Candidate profile - the single owner of professional data
/// (skills, contact detail, role-specific structures).
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Profile {
    pub user_id: String,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
    /// Stored as a JSON string, exposed as an array
    #[serde(
        serialize_with = "crate::common::helpers::serialize_string_list",
        deserialize_with = "crate::common::helpers::deserialize_string_list"
    )]
    pub skills: Option<String>,
    /// JSON object keyed by role (education, certifications, ...)
    pub role_specific: Option<String>,
    pub updated_at: Option<String>,
}

impl Profile {
    pub fn skill_list(&self) -> Vec<String> {
        self.skills
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default()
    }
}

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Cv {
    pub id: String,
    pub user_id: String,
    pub filename: String,
    pub original_name: Option<String>,
    pub size_bytes: i64,
    pub mime_type: Option<String>,
    pub label: Option<String>,
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub phone: Option<String>,
    pub location: Option<String>,
    pub website: Option<String>,
    pub summary: Option<String>,
    pub skills: Option<Vec<String>>,
    pub role_specific: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCvLabelRequest {
    pub label: String,
}

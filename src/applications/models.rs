// src/applications/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// Application Models
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: String,
    pub job_id: String,
    pub candidate_id: String,
    pub cover_letter: String,
    /// Stored as a JSON string, exposed as an array
    #[serde(
        serialize_with = "crate::common::helpers::serialize_string_list",
        deserialize_with = "crate::common::helpers::deserialize_string_list"
    )]
    pub skills: Option<String>,
    /// JSON array of CvSnapshot records
    pub selected_cvs: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_location: Option<String>,
    pub status: String,
    pub applied_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StatusHistoryEntry {
    pub id: String,
    pub application_id: String,
    pub status: String,
    pub changed_by: String,
    pub message: Option<String>,
    /// JSON object with interview scheduling detail, set only on
    /// interview-related transitions
    pub interview_details: Option<String>,
    pub changed_at: Option<String>,
}

/// Immutable snapshot of a CV file at submission time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CvSnapshot {
    pub cv_id: String,
    pub filename: String,
    pub original_name: Option<String>,
    pub size_bytes: i64,
    pub mime_type: Option<String>,
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReferenceEntry {
    pub id: String,
    pub application_id: String,
    pub position: i64,
    pub provided_as_document: i64,
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>,
    pub document_filename: Option<String>,
    pub document_original_name: Option<String>,
    pub document_size_bytes: Option<i64>,
    pub document_mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkExperienceEntry {
    pub id: String,
    pub application_id: String,
    pub position: i64,
    pub provided_as_document: i64,
    pub title: Option<String>,
    pub company: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: Option<String>,
    pub document_filename: Option<String>,
    pub document_original_name: Option<String>,
    pub document_size_bytes: Option<i64>,
    pub document_mime_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationAttachment {
    pub id: String,
    pub application_id: String,
    pub kind: String,
    pub filename: String,
    pub original_name: Option<String>,
    pub size_bytes: i64,
    pub mime_type: Option<String>,
    pub uploaded_at: Option<String>,
}

// ============================================================================
// Submission input (parsed out of the multipart body)
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

/// One reference entry as submitted by the client.
///
/// Either a structured form (name/company/...) or an uploaded document;
/// when `provided_as_document` is true, `document_key` must name the
/// multipart field carrying the file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceInput {
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub relationship: Option<String>,
    #[serde(alias = "providedAsDocument")]
    pub provided_as_document: bool,
    #[serde(alias = "documentKey")]
    pub document_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkExperienceInput {
    pub title: Option<String>,
    pub company: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "providedAsDocument")]
    pub provided_as_document: bool,
    #[serde(alias = "documentKey")]
    pub document_key: Option<String>,
}

/// All submission fields after multipart parsing
#[derive(Debug, Clone, Default)]
pub struct SubmissionFields {
    pub cover_letter: String,
    pub skills: Vec<String>,
    pub selected_cv_ids: Vec<String>,
    pub contact_info: ContactInfo,
    pub references: Vec<ReferenceInput>,
    pub work_experience: Vec<WorkExperienceInput>,
}

/// A file part buffered in memory until validation passes
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub field_name: String,
    pub original_name: String,
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

// ============================================================================
// Request / response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
    pub message: Option<String>,
    pub interview_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct CompanyResponseRequest {
    pub response: String,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApplicationWithDetails {
    #[serde(flatten)]
    pub application: Application,
    pub references: Vec<ReferenceEntry>,
    pub work_experience: Vec<WorkExperienceEntry>,
    pub attachments: Vec<ApplicationAttachment>,
    pub status_history: Vec<StatusHistoryEntry>,
}

/// Listing row for GET /api/applications/my-applications
#[derive(Debug, Serialize)]
pub struct MyApplicationSummary {
    pub id: String,
    pub job_id: String,
    pub job_title: String,
    pub job_location: Option<String>,
    pub job_owner_type: String,
    pub status: String,
    pub applied_at: Option<String>,
    pub updated_at: Option<String>,
    pub status_history: Vec<StatusHistoryEntry>,
}

/// Listing row for GET /api/jobs/:id/applications
#[derive(Debug, Serialize)]
pub struct JobApplicationSummary {
    pub application_id: String,
    pub candidate_id: String,
    pub candidate_name: Option<String>,
    pub candidate_email: String,
    pub status: String,
    pub applied_at: Option<String>,
    pub cover_letter: String,
}

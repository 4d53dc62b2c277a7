// src/jobs/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::ResourceOwner;

// ============================================================================
// Job Models
// ============================================================================

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Job {
    pub id: String,
    /// 'company' or 'organization' - a job always has exactly one owner
    pub owner_type: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub status: String,
    pub application_deadline: Option<String>,
    /// Cached counter, maintained in the same transaction as the
    /// application insert; admin reports recount from source rows.
    pub application_count: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl Job {
    pub fn owner(&self) -> Option<ResourceOwner> {
        ResourceOwner::from_pair(&self.owner_type, &self.owner_id)
    }

    /// True when the application deadline exists and is in the past.
    /// An unparseable deadline never blocks submissions.
    pub fn deadline_passed(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        match self.application_deadline.as_deref() {
            Some(raw) => match chrono::DateTime::parse_from_rfc3339(raw) {
                Ok(deadline) => deadline.with_timezone(&chrono::Utc) < now,
                Err(_) => false,
            },
            None => false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub status: Option<String>,
    pub application_deadline: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateJobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub status: Option<String>,
    pub application_deadline: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
}

#[derive(Serialize, Debug)]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}

// src/admin/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Tender {
    pub id: String,
    pub company_id: String,
    pub title: String,
    pub description: Option<String>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub deadline: Option<String>,
    pub status: String,
    pub moderated: i64,
    pub moderation_reason: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTenderRequest {
    pub title: String,
    pub description: Option<String>,
    pub budget_min: Option<i64>,
    pub budget_max: Option<i64>,
    pub deadline: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ModerateTenderRequest {
    pub moderated: bool,
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct UserListQuery {
    pub role: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingRequest {
    pub key: String,
    pub value: String,
}

/// Entity counts plus counter drift, for the reports endpoint
#[derive(Debug, Serialize)]
pub struct PlatformReport {
    pub users: i64,
    pub jobs: i64,
    pub applications: i64,
    pub organizations: i64,
    pub companies: i64,
    pub posts: i64,
    pub tenders: i64,
    pub application_count_drift: Vec<CounterDrift>,
}

/// A job whose cached application counter disagrees with a recount
#[derive(Debug, Serialize)]
pub struct CounterDrift {
    pub job_id: String,
    pub cached: i64,
    pub actual: i64,
}

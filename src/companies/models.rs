// src/companies/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Company {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
    pub logo_path: Option<String>,
    pub follower_count: i64,
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCompanyRequest {
    pub name: String,
    pub website: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCompanyRequest {
    pub name: Option<String>,
    pub website: Option<String>,
    pub industry: Option<String>,
}

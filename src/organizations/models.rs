// src/organizations/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Organization {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub logo_path: Option<String>,
    pub banner_path: Option<String>,
    pub follower_count: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrganizationRequest {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrganizationRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub website: Option<String>,
}

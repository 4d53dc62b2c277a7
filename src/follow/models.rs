// src/follow/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const FOLLOW_TARGET_TYPES: [&str; 3] = ["user", "company", "organization"];

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Follow {
    pub id: String,
    pub follower_id: String,
    pub target_type: String,
    pub target_id: String,
    pub status: String,
    pub created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FollowToggleRequest {
    pub target_type: String,
}

#[derive(Debug, Serialize)]
pub struct FollowToggleResponse {
    pub following: bool,
    pub target_type: String,
    pub target_id: String,
}

/// One row in the followers/following listings
#[derive(Debug, Serialize)]
pub struct FollowListEntry {
    pub target_type: String,
    pub target_id: String,
    pub name: Option<String>,
    pub followed_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FollowStats {
    pub followers: i64,
    pub following: i64,
}

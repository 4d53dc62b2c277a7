//! Authentication data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// JWT claims structure
#[derive(Serialize, Deserialize, Debug)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// User database model
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: String,
    pub avatar_path: Option<String>,
    pub follower_count: i64,
    pub following_count: i64,
    pub created_at: Option<String>,
}

/// Registration payload
#[derive(Deserialize, Debug)]
pub struct RegisterRequest {
    pub email: String,
    pub name: Option<String>,
    pub role: String,
}

/// Token + user envelope returned by registration
#[derive(Serialize, Debug)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

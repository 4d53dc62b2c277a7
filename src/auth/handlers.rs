//! Authentication handlers

use axum::extract::{Extension, Json};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::extractors::AuthedUser;
use super::models::{AuthResponse, Claims, RegisterRequest, User};
use crate::common::{generate_user_id, safe_email_log, ApiError, AppState};

const VALID_ROLES: [&str; 3] = ["candidate", "company", "organization"];

/// Issue a signed HS256 token for a user id, valid for 30 days
pub fn issue_token(user_id: &str, jwt_secret: &str) -> Result<String, ApiError> {
    let exp = Utc::now() + Duration::days(30);
    let claims = Claims {
        sub: user_id.to_string(),
        exp: exp.timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| ApiError::InternalServer(format!("Failed to sign token: {}", e)))
}

/// POST /api/auth/register - create a user and return a bearer token
///
/// The admin role cannot be self-assigned; admins are designated through
/// ADMIN_EMAILS or by editing the user row directly.
pub async fn register(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::ValidationError(
            "A valid email address is required".to_string(),
        ));
    }

    if !VALID_ROLES.contains(&payload.role.as_str()) {
        return Err(ApiError::ValidationError(format!(
            "Role must be one of: {}",
            VALID_ROLES.join(", ")
        )));
    }

    let existing: Option<String> = sqlx::query_scalar("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if existing.is_some() {
        warn!(email = %safe_email_log(&email), "Registration rejected: email already in use");
        return Err(ApiError::BadRequest(
            "An account with this email already exists".to_string(),
        ));
    }

    let user_id = generate_user_id();
    sqlx::query("INSERT INTO users (id, email, name, role) VALUES (?, ?, ?, ?)")
        .bind(&user_id)
        .bind(&email)
        .bind(payload.name.as_deref())
        .bind(&payload.role)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    // Candidates get an empty profile row up front so submission-time
    // profile loads never miss.
    if payload.role == "candidate" {
        sqlx::query("INSERT INTO profiles (user_id) VALUES (?)")
            .bind(&user_id)
            .execute(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let token = issue_token(&user_id, &state.jwt_secret)?;

    info!(
        user_id = %user_id,
        email = %safe_email_log(&email),
        role = %payload.role,
        "User registered"
    );

    Ok(Json(AuthResponse { token, user }))
}

/// GET /api/auth/me - current authenticated user
pub async fn me(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<User>, ApiError> {
    let state = state_lock.read().await.clone();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    match user {
        Some(u) => Ok(Json(u)),
        // Dev-mode user may not have a row yet
        None if state.dev_mode.is_enabled() => Ok(Json(state.dev_mode.create_dev_user())),
        None => Err(ApiError::NotFound("User not found".to_string())),
    }
}

// src/admin/handlers/settings.rs

use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::require_admin;
use crate::admin::models::UpdateSettingRequest;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

/// GET /api/admin/settings
pub async fn get_settings(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    require_admin(&authed)?;

    let settings = state.settings_service.all_settings().await?;
    let body: serde_json::Map<String, serde_json::Value> = settings
        .into_iter()
        .map(|(key, value)| (key, serde_json::Value::String(value)))
        .collect();

    Ok(Json(serde_json::json!({ "settings": body })))
}

/// PUT /api/admin/settings
pub async fn update_setting(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<UpdateSettingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    require_admin(&authed)?;

    if payload.key.trim().is_empty() {
        return Err(ApiError::BadRequest("Setting key is required".to_string()));
    }

    state
        .settings_service
        .set_setting(payload.key.trim(), &payload.value)
        .await?;

    info!(key = %payload.key, "Setting updated");

    Ok(Json(serde_json::json!({
        "key": payload.key.trim(),
        "value": payload.value,
    })))
}

// src/admin/handlers/tenders.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::require_admin;
use crate::admin::models::{CreateTenderRequest, ModerateTenderRequest, Tender};
use crate::auth::AuthedUser;
use crate::common::{generate_tender_id, ApiError, AppState};

/// POST /api/tenders - Company publishes a tender
pub async fn create_tender(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<CreateTenderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    if authed.role != "company" {
        return Err(ApiError::Forbidden(
            "Only companies can publish tenders".to_string(),
        ));
    }

    if payload.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Tender title is required".to_string()));
    }
    if let (Some(min), Some(max)) = (payload.budget_min, payload.budget_max) {
        if min > max {
            return Err(ApiError::BadRequest(
                "Minimum budget cannot exceed maximum budget".to_string(),
            ));
        }
    }

    let company_id: String = sqlx::query_scalar("SELECT id FROM companies WHERE user_id = ?")
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::BadRequest("Company profile not found".to_string()))?;

    let tender_id = generate_tender_id();
    sqlx::query(
        r#"
        INSERT INTO tenders (id, company_id, title, description, budget_min, budget_max, deadline)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&tender_id)
    .bind(&company_id)
    .bind(payload.title.trim())
    .bind(payload.description.as_deref())
    .bind(payload.budget_min)
    .bind(payload.budget_max)
    .bind(payload.deadline.as_deref())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, tender_id = %tender_id, "Tender created");

    let tender = sqlx::query_as::<_, Tender>("SELECT * FROM tenders WHERE id = ?")
        .bind(&tender_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok((StatusCode::CREATED, Json(tender)))
}

/// GET /api/admin/tenders - All tenders, newest first
pub async fn list_tenders(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    require_admin(&authed)?;

    let tenders = sqlx::query_as::<_, Tender>("SELECT * FROM tenders ORDER BY created_at DESC")
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({ "tenders": tenders })))
}

/// PUT /api/admin/tenders/:id/moderate
pub async fn moderate_tender(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(tender_id): Path<String>,
    Json(payload): Json<ModerateTenderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    require_admin(&authed)?;

    let updated = sqlx::query(
        "UPDATE tenders SET moderated = ?, moderation_reason = ? WHERE id = ?",
    )
    .bind(payload.moderated as i64)
    .bind(payload.reason.as_deref())
    .bind(&tender_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::NotFound("Tender not found".to_string()));
    }

    info!(
        tender_id = %tender_id,
        moderated = payload.moderated,
        "Tender moderation updated"
    );

    let tender = sqlx::query_as::<_, Tender>("SELECT * FROM tenders WHERE id = ?")
        .bind(&tender_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(tender))
}

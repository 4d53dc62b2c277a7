// src/applications/handlers/status.rs
//! Status transitions: owner-driven updates, the company response shortcut,
//! and candidate withdrawal. Every transition lands in the history log.

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::applications::models::{
    Application, CompanyResponseRequest, UpdateStatusRequest, WithdrawRequest,
};
use crate::applications::status::{can_withdraw, company_response_status};
use crate::applications::validators::{StatusUpdateValidator, MAX_MESSAGE_CHARS};
use crate::auth::AuthedUser;
use crate::common::{
    generate_history_id, require_owner, ApiError, AppState, Validator,
};
use crate::jobs::models::Job;

use super::queries::fetch_application_details;

async fn load_application(db: &sqlx::SqlitePool, id: &str) -> Result<Application, ApiError> {
    sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))
}

async fn load_job_for(db: &sqlx::SqlitePool, application: &Application) -> Result<Job, ApiError> {
    sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(&application.job_id)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))
}

/// Writes the new status and its history entry in one transaction.
async fn record_transition(
    db: &sqlx::SqlitePool,
    application_id: &str,
    new_status: &str,
    changed_by: &str,
    message: Option<&str>,
    interview_details: Option<&str>,
) -> Result<(), ApiError> {
    let mut tx = db.begin().await.map_err(ApiError::DatabaseError)?;

    sqlx::query("UPDATE applications SET status = ?, updated_at = datetime('now') WHERE id = ?")
        .bind(new_status)
        .bind(application_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

    sqlx::query(
        r#"
        INSERT INTO application_status_history
            (id, application_id, status, changed_by, message, interview_details)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(generate_history_id())
    .bind(application_id)
    .bind(new_status)
    .bind(changed_by)
    .bind(message)
    .bind(interview_details)
    .execute(&mut *tx)
    .await
    .map_err(ApiError::DatabaseError)?;

    tx.commit().await.map_err(ApiError::DatabaseError)?;
    Ok(())
}

fn check_message_length(message: Option<&str>) -> Result<(), ApiError> {
    if let Some(msg) = message {
        if msg.chars().count() > MAX_MESSAGE_CHARS {
            return Err(ApiError::BadRequest(
                "Message must be less than 1000 characters".to_string(),
            ));
        }
    }
    Ok(())
}

/// PUT /api/applications/:id/status - Job owner sets any valid status
pub async fn update_status(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(application_id): Path<String>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = StatusUpdateValidator.validate(&payload);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let application = load_application(&state.db, &application_id).await?;
    let job = load_job_for(&state.db, &application).await?;

    let owner = job
        .owner()
        .ok_or_else(|| ApiError::InternalServer("Job has no resolvable owner".to_string()))?;
    require_owner(&state.db, &authed, &owner, "update this application").await?;

    // Interview details travel with the history entry, not the application row
    let interview_details = payload
        .interview_details
        .as_ref()
        .map(|v| {
            serde_json::to_string(v).map_err(|e| {
                ApiError::BadRequest(format!("Invalid interview details: {}", e))
            })
        })
        .transpose()?;

    record_transition(
        &state.db,
        &application_id,
        &payload.status,
        &authed.id,
        payload.message.as_deref(),
        interview_details.as_deref(),
    )
    .await?;

    info!(
        application_id = %application_id,
        status = %payload.status,
        changed_by = %authed.id,
        "Application status updated"
    );

    let details = fetch_application_details(&state.db, &application_id).await?;
    Ok(Json(details))
}

/// POST /api/applications/:id/company-response - Canned owner responses that
/// collapse onto the status channel
pub async fn company_response(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(application_id): Path<String>,
    Json(payload): Json<CompanyResponseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = StatusUpdateValidator.validate(&payload);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }
    let new_status = company_response_status(&payload.response).ok_or_else(|| {
        ApiError::BadRequest("Invalid company response value".to_string())
    })?;

    let application = load_application(&state.db, &application_id).await?;
    let job = load_job_for(&state.db, &application).await?;

    let owner = job
        .owner()
        .ok_or_else(|| ApiError::InternalServer("Job has no resolvable owner".to_string()))?;
    require_owner(&state.db, &authed, &owner, "respond to this application").await?;

    record_transition(
        &state.db,
        &application_id,
        new_status,
        &authed.id,
        payload.message.as_deref(),
        None,
    )
    .await?;

    info!(
        application_id = %application_id,
        response = %payload.response,
        status = %new_status,
        "Company response recorded"
    );

    let details = fetch_application_details(&state.db, &application_id).await?;
    Ok(Json(details))
}

/// POST /api/applications/:id/withdraw - Candidate pulls their application
pub async fn withdraw_application(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(application_id): Path<String>,
    Json(payload): Json<WithdrawRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    check_message_length(payload.message.as_deref())?;

    let application = load_application(&state.db, &application_id).await?;
    if application.candidate_id != authed.id && !authed.is_admin {
        return Err(ApiError::Forbidden(
            "You are not allowed to withdraw this application".to_string(),
        ));
    }

    if let Err(reason) = can_withdraw(&application.status) {
        warn!(
            application_id = %application_id,
            status = %application.status,
            "Withdrawal refused"
        );
        return Err(ApiError::BadRequest(reason));
    }

    record_transition(
        &state.db,
        &application_id,
        "withdrawn",
        &authed.id,
        payload.message.as_deref(),
        None,
    )
    .await?;

    info!(application_id = %application_id, "Application withdrawn");

    let details = fetch_application_details(&state.db, &application_id).await?;
    Ok(Json(details))
}

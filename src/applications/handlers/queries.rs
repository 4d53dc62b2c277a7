// src/applications/handlers/queries.rs
//! Read paths: candidate listings, the owner's per-job view, and the single
//! application detail assembly shared with the write handlers.

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::applications::models::{
    Application, ApplicationAttachment, ApplicationWithDetails, JobApplicationSummary,
    MyApplicationSummary, ReferenceEntry, StatusHistoryEntry, WorkExperienceEntry,
};
use crate::auth::AuthedUser;
use crate::common::{is_valid_entity_id, require_owner, ApiError, AppState, ResourceOwner};
use crate::jobs::models::Job;

/// Assembles an application with its child rows. Used by every handler that
/// returns a full application payload.
pub async fn fetch_application_details(
    db: &sqlx::SqlitePool,
    application_id: &str,
) -> Result<ApplicationWithDetails, ApiError> {
    let application = sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = ?")
        .bind(application_id)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Application not found".to_string()))?;

    let references = sqlx::query_as::<_, ReferenceEntry>(
        "SELECT * FROM application_references WHERE application_id = ? ORDER BY position",
    )
    .bind(application_id)
    .fetch_all(db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let work_experience = sqlx::query_as::<_, WorkExperienceEntry>(
        "SELECT * FROM application_work_experience WHERE application_id = ? ORDER BY position",
    )
    .bind(application_id)
    .fetch_all(db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let attachments = sqlx::query_as::<_, ApplicationAttachment>(
        "SELECT * FROM application_attachments WHERE application_id = ? ORDER BY uploaded_at",
    )
    .bind(application_id)
    .fetch_all(db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let status_history = sqlx::query_as::<_, StatusHistoryEntry>(
        "SELECT * FROM application_status_history WHERE application_id = ? ORDER BY changed_at",
    )
    .bind(application_id)
    .fetch_all(db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(ApplicationWithDetails {
        application,
        references,
        work_experience,
        attachments,
        status_history,
    })
}

/// GET /api/applications/my-applications - Candidate's own applications,
/// newest first, each with its full status trail
pub async fn my_applications(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let rows = sqlx::query_as::<_, Application>(
        "SELECT * FROM applications WHERE candidate_id = ? ORDER BY applied_at DESC",
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let mut summaries = Vec::with_capacity(rows.len());
    for application in rows {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
            .bind(&application.job_id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        let status_history = sqlx::query_as::<_, StatusHistoryEntry>(
            "SELECT * FROM application_status_history WHERE application_id = ? ORDER BY changed_at",
        )
        .bind(&application.id)
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        summaries.push(MyApplicationSummary {
            id: application.id,
            job_id: application.job_id,
            job_title: job
                .as_ref()
                .map(|j| j.title.clone())
                .unwrap_or_else(|| "(deleted job)".to_string()),
            job_location: job.as_ref().and_then(|j| j.location.clone()),
            job_owner_type: job
                .as_ref()
                .map(|j| j.owner_type.clone())
                .unwrap_or_default(),
            status: application.status,
            applied_at: application.applied_at,
            updated_at: application.updated_at,
            status_history,
        });
    }

    Ok(Json(serde_json::json!({ "applications": summaries })))
}

/// GET /api/applications/:id - Full detail, visible to the candidate who
/// applied, the job owner, and admins
pub async fn get_application(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(application_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    if !is_valid_entity_id(&application_id) {
        return Err(ApiError::BadRequest("Invalid application id".to_string()));
    }

    let details = fetch_application_details(&state.db, &application_id).await?;

    if details.application.candidate_id != authed.id && !authed.is_admin {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
            .bind(&details.application.job_id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

        let owner = job
            .owner()
            .unwrap_or(ResourceOwner::Candidate(String::new()));
        require_owner(&state.db, &authed, &owner, "view this application").await?;
    }

    Ok(Json(details))
}

/// GET /api/jobs/:id/applications - Owner's view of who applied
pub async fn job_applications(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(&job_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    let owner = job
        .owner()
        .ok_or_else(|| ApiError::InternalServer("Job has no resolvable owner".to_string()))?;
    require_owner(&state.db, &authed, &owner, "view applications for this job").await?;

    let rows = sqlx::query_as::<_, (String, String, Option<String>, String, String, Option<String>, String)>(
        r#"
        SELECT a.id, a.candidate_id, u.name, u.email, a.status, a.applied_at, a.cover_letter
        FROM applications a
        JOIN users u ON u.id = a.candidate_id
        WHERE a.job_id = ?
        ORDER BY a.applied_at DESC
        "#,
    )
    .bind(&job_id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let applications: Vec<JobApplicationSummary> = rows
        .into_iter()
        .map(
            |(application_id, candidate_id, candidate_name, candidate_email, status, applied_at, cover_letter)| {
                JobApplicationSummary {
                    application_id,
                    candidate_id,
                    candidate_name,
                    candidate_email,
                    status,
                    applied_at,
                    cover_letter,
                }
            },
        )
        .collect();

    Ok(Json(serde_json::json!({
        "job_id": job_id,
        "total": applications.len(),
        "applications": applications,
    })))
}

// src/jobs/handlers.rs

use axum::extract::{Extension, Json, Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{CreateJobRequest, Job, JobListQuery, JobListResponse, UpdateJobRequest};
use super::validators::JobValidator;
use crate::auth::AuthedUser;
use crate::common::{
    authz, generate_job_id, ApiError, AppState, ResourceOwner, Validator,
};

/// Resolves the company/organization owner pair for the calling user.
async fn owner_for_actor(
    db: &sqlx::SqlitePool,
    authed: &AuthedUser,
) -> Result<ResourceOwner, ApiError> {
    match authed.role.as_str() {
        "company" => {
            let company_id: Option<String> =
                sqlx::query_scalar("SELECT id FROM companies WHERE user_id = ?")
                    .bind(&authed.id)
                    .fetch_optional(db)
                    .await
                    .map_err(ApiError::DatabaseError)?;
            company_id
                .map(ResourceOwner::Company)
                .ok_or_else(|| ApiError::BadRequest("No company profile found".to_string()))
        }
        "organization" => {
            let organization_id: Option<String> =
                sqlx::query_scalar("SELECT id FROM organizations WHERE user_id = ?")
                    .bind(&authed.id)
                    .fetch_optional(db)
                    .await
                    .map_err(ApiError::DatabaseError)?;
            organization_id
                .map(ResourceOwner::Organization)
                .ok_or_else(|| ApiError::BadRequest("No organization profile found".to_string()))
        }
        _ => Err(ApiError::Forbidden(
            "Only companies and organizations can post jobs".to_string(),
        )),
    }
}

/// POST /api/jobs - Create a job posting
pub async fn create_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<CreateJobRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = JobValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let owner = owner_for_actor(&state.db, &authed).await?;
    let (owner_type, owner_id) = match &owner {
        ResourceOwner::Company(id) => ("company", id.clone()),
        ResourceOwner::Organization(id) => ("organization", id.clone()),
        ResourceOwner::Candidate(_) => unreachable!("owner_for_actor rejects candidates"),
    };

    let job_id = generate_job_id();
    let status = request.status.unwrap_or_else(|| "draft".to_string());

    sqlx::query(
        r#"
        INSERT INTO jobs (id, owner_type, owner_id, title, description, location,
                          employment_type, salary_min, salary_max, status, application_deadline)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&job_id)
    .bind(owner_type)
    .bind(&owner_id)
    .bind(request.title.trim())
    .bind(request.description.as_deref())
    .bind(request.location.as_deref())
    .bind(request.employment_type.as_deref())
    .bind(request.salary_min)
    .bind(request.salary_max)
    .bind(&status)
    .bind(request.application_deadline.as_deref())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(&job_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %authed.id,
        job_id = %job_id,
        owner_type = %owner_type,
        "Job created"
    );

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/jobs - Public listing of active jobs
pub async fn list_jobs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(query): Query<JobListQuery>,
) -> Result<Json<JobListResponse>, ApiError> {
    let state = state_lock.read().await.clone();

    let page = query.page.unwrap_or(1).max(1);
    let page_size = query.page_size.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * page_size;

    let location_filter = query.location.as_deref().unwrap_or("");
    let employment_filter = query.employment_type.as_deref().unwrap_or("");

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM jobs
        WHERE status = 'active'
          AND (? = '' OR location = ?)
          AND (? = '' OR employment_type = ?)
        "#,
    )
    .bind(location_filter)
    .bind(location_filter)
    .bind(employment_filter)
    .bind(employment_filter)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let jobs = sqlx::query_as::<_, Job>(
        r#"
        SELECT * FROM jobs
        WHERE status = 'active'
          AND (? = '' OR location = ?)
          AND (? = '' OR employment_type = ?)
        ORDER BY created_at DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(location_filter)
    .bind(location_filter)
    .bind(employment_filter)
    .bind(employment_filter)
    .bind(page_size)
    .bind(offset)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(JobListResponse {
        jobs,
        total,
        page,
        page_size,
    }))
}

/// GET /api/jobs/:id
pub async fn get_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Path(job_id): Path<String>,
) -> Result<Json<Job>, ApiError> {
    let state = state_lock.read().await.clone();

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(&job_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    Ok(Json(job))
}

/// PUT /api/jobs/:id - Update a job (owner or admin)
pub async fn update_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
    Json(request): Json<UpdateJobRequest>,
) -> Result<Json<Job>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = JobValidator.validate(&request);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(&job_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    let owner = job
        .owner()
        .ok_or_else(|| ApiError::InternalServer("Job has an unknown owner type".to_string()))?;
    authz::require_owner(&state.db, &authed, &owner, "update this job").await?;

    sqlx::query(
        r#"
        UPDATE jobs
        SET title = COALESCE(?, title),
            description = COALESCE(?, description),
            location = COALESCE(?, location),
            employment_type = COALESCE(?, employment_type),
            salary_min = COALESCE(?, salary_min),
            salary_max = COALESCE(?, salary_max),
            status = COALESCE(?, status),
            application_deadline = COALESCE(?, application_deadline),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(request.title.as_deref().map(str::trim))
    .bind(request.description.as_deref())
    .bind(request.location.as_deref())
    .bind(request.employment_type.as_deref())
    .bind(request.salary_min)
    .bind(request.salary_max)
    .bind(request.status.as_deref())
    .bind(request.application_deadline.as_deref())
    .bind(&job_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let updated = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(&job_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, job_id = %job_id, "Job updated");

    Ok(Json(updated))
}

/// DELETE /api/jobs/:id - Delete a job (owner or admin)
///
/// Refused while applications that were not withdrawn still reference the job.
pub async fn delete_job(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(job_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = ?")
        .bind(&job_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Job not found".to_string()))?;

    let owner = job
        .owner()
        .ok_or_else(|| ApiError::InternalServer("Job has an unknown owner type".to_string()))?;
    authz::require_owner(&state.db, &authed, &owner, "delete this job").await?;

    let live_applications: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM applications WHERE job_id = ? AND status != 'withdrawn'",
    )
    .bind(&job_id)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if live_applications > 0 {
        warn!(
            job_id = %job_id,
            live_applications = live_applications,
            "Job deletion refused: applications still attached"
        );
        return Err(ApiError::BadRequest(format!(
            "Cannot delete job: {} application(s) still reference it",
            live_applications
        )));
    }

    sqlx::query("DELETE FROM jobs WHERE id = ?")
        .bind(&job_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, job_id = %job_id, "Job deleted");

    Ok(Json(json!({ "message": "Job deleted" })))
}

// src/profile/handlers.rs

use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::models::{Cv, Profile, UpdateCvLabelRequest, UpdateProfileRequest};
use crate::auth::AuthedUser;
use crate::common::{generate_cv_id, ApiError, AppState};

const MAX_CVS: i64 = 5;
const MAX_CV_BYTES: usize = 10 * 1024 * 1024;

/// GET /api/profile - own profile
pub async fn get_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Profile>, ApiError> {
    let state = state_lock.read().await.clone();
    load_profile(&state.db, &authed.id).await.map(Json)
}

/// GET /api/profile/:user_id - public profile view
pub async fn get_public_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedUser,
    Path(user_id): Path<String>,
) -> Result<Json<Profile>, ApiError> {
    let state = state_lock.read().await.clone();
    load_profile(&state.db, &user_id).await.map(Json)
}

pub async fn load_profile(db: &sqlx::SqlitePool, user_id: &str) -> Result<Profile, ApiError> {
    sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Profile not found".to_string()))
}

/// PUT /api/profile - update own profile
pub async fn update_profile(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<Profile>, ApiError> {
    let state = state_lock.read().await.clone();

    if let Some(summary) = &request.summary {
        if summary.chars().count() > 2000 {
            return Err(ApiError::ValidationError(
                "Summary must be less than 2000 characters".to_string(),
            ));
        }
    }

    let skills_json = match &request.skills {
        Some(skills) => Some(
            serde_json::to_string(skills)
                .map_err(|e| ApiError::InternalServer(format!("Failed to encode skills: {}", e)))?,
        ),
        None => None,
    };
    let role_specific_json = match &request.role_specific {
        Some(value) => Some(value.to_string()),
        None => None,
    };

    // Upsert keeps first-time profile writes simple
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, phone, location, website, summary, skills, role_specific, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, datetime('now'))
        ON CONFLICT(user_id) DO UPDATE SET
            phone = COALESCE(excluded.phone, phone),
            location = COALESCE(excluded.location, location),
            website = COALESCE(excluded.website, website),
            summary = COALESCE(excluded.summary, summary),
            skills = COALESCE(excluded.skills, skills),
            role_specific = COALESCE(excluded.role_specific, role_specific),
            updated_at = datetime('now')
        "#,
    )
    .bind(&authed.id)
    .bind(request.phone.as_deref())
    .bind(request.location.as_deref())
    .bind(request.website.as_deref())
    .bind(request.summary.as_deref())
    .bind(skills_json.as_deref())
    .bind(role_specific_json.as_deref())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, "Profile updated");

    load_profile(&state.db, &authed.id).await.map(Json)
}

/// POST /api/profile/cvs - upload a CV (PDF, max 5 per candidate)
pub async fn upload_cv(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    if authed.role != "candidate" {
        return Err(ApiError::Forbidden(
            "Only candidates can upload CVs".to_string(),
        ));
    }

    let cv_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cvs WHERE user_id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if cv_count >= MAX_CVS {
        warn!(
            user_id = %authed.id,
            current_count = cv_count,
            "CV upload limit reached"
        );
        return Err(ApiError::BadRequest(format!(
            "CV limit reached. You can upload a maximum of {} CVs. Please delete an existing CV before uploading a new one.",
            MAX_CVS
        )));
    }

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed multipart body".to_string()))?
    {
        if field.name() == Some("cv") {
            let original_name = field.file_name().unwrap_or("cv.pdf").to_string();

            let data = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("Invalid file".to_string()))?;

            if data.len() > MAX_CV_BYTES {
                return Err(ApiError::BadRequest(
                    "CV file exceeds the 10 MB limit".to_string(),
                ));
            }

            // Content check, not extension check
            let is_pdf = infer::get(&data)
                .map(|kind| kind.mime_type() == "application/pdf")
                .unwrap_or(false);
            if !is_pdf {
                return Err(ApiError::BadRequest(
                    "Only PDF files are allowed".to_string(),
                ));
            }

            let cv_id = generate_cv_id();
            let safe_filename = format!("{}.pdf", cv_id);
            let file_path = state.cv_dir.join(&safe_filename);

            tokio::fs::write(&file_path, &data).await.map_err(|e| {
                error!(error = %e, "Failed to save CV");
                ApiError::InternalServer("Failed to save CV".to_string())
            })?;

            sqlx::query(
                r#"
                INSERT INTO cvs (id, user_id, filename, original_name, size_bytes, mime_type)
                VALUES (?, ?, ?, ?, ?, 'application/pdf')
                "#,
            )
            .bind(&cv_id)
            .bind(&authed.id)
            .bind(&safe_filename)
            .bind(&original_name)
            .bind(data.len() as i64)
            .execute(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            info!(user_id = %authed.id, cv_id = %cv_id, "CV uploaded");

            return Ok((
                StatusCode::CREATED,
                Json(json!({
                    "id": cv_id,
                    "filename": safe_filename,
                    "original_name": original_name,
                    "message": "CV uploaded successfully"
                })),
            ));
        }
    }

    Err(ApiError::BadRequest("No CV file provided".to_string()))
}

/// GET /api/profile/cvs - list own CVs
pub async fn list_cvs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<Vec<Cv>>, ApiError> {
    let state = state_lock.read().await.clone();

    let cvs = sqlx::query_as::<_, Cv>(
        "SELECT * FROM cvs WHERE user_id = ? ORDER BY uploaded_at DESC",
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(cvs))
}

/// PUT /api/profile/cvs/:id/label
pub async fn update_cv_label(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(cv_id): Path<String>,
    Json(request): Json<UpdateCvLabelRequest>,
) -> Result<Json<Cv>, ApiError> {
    let state = state_lock.read().await.clone();

    let updated = sqlx::query("UPDATE cvs SET label = ? WHERE id = ? AND user_id = ?")
        .bind(request.label.trim())
        .bind(&cv_id)
        .bind(&authed.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if updated.rows_affected() == 0 {
        return Err(ApiError::NotFound("CV not found".to_string()));
    }

    let cv = sqlx::query_as::<_, Cv>("SELECT * FROM cvs WHERE id = ?")
        .bind(&cv_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(cv))
}

/// DELETE /api/profile/cvs/:id
///
/// Deletion is allowed only when every application referencing the CV is
/// withdrawn or rejected.
pub async fn delete_cv(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(cv_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let cv = sqlx::query_as::<_, Cv>("SELECT * FROM cvs WHERE id = ? AND user_id = ?")
        .bind(&cv_id)
        .bind(&authed.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("CV not found".to_string()))?;

    // Selected CVs are stored as JSON snapshots on the application row
    let active_application_count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM applications
        WHERE candidate_id = ?
          AND selected_cvs LIKE '%' || ? || '%'
          AND status NOT IN ('withdrawn', 'rejected')
        "#,
    )
    .bind(&authed.id)
    .bind(&cv_id)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    if active_application_count > 0 {
        warn!(
            user_id = %authed.id,
            cv_id = %cv_id,
            active_application_count = active_application_count,
            "Cannot delete CV: attached to active applications"
        );
        return Err(ApiError::BadRequest(format!(
            "Cannot delete CV. It is attached to {} active application(s).",
            active_application_count
        )));
    }

    sqlx::query("DELETE FROM cvs WHERE id = ?")
        .bind(&cv_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let file_path = state.cv_dir.join(&cv.filename);
    if let Err(e) = tokio::fs::remove_file(&file_path).await {
        warn!(error = %e, cv_id = %cv_id, "CV file removal failed after row delete");
    }

    info!(user_id = %authed.id, cv_id = %cv_id, "CV deleted");

    Ok(Json(json!({ "message": "CV deleted" })))
}

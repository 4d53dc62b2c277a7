// src/companies/handlers.rs

use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{Company, CreateCompanyRequest, UpdateCompanyRequest};
use crate::auth::AuthedUser;
use crate::common::{
    generate_company_id, require_owner, ApiError, AppState, ResourceOwner, ValidationResult,
};

const MAX_NAME_CHARS: usize = 200;
const MAX_LOGO_BYTES: usize = 5 * 1024 * 1024;

fn validate_name(name: &str) -> Result<(), ApiError> {
    let mut result = ValidationResult::new();
    if name.trim().is_empty() {
        result.add_error("name", "Company name is required");
    } else if name.chars().count() > MAX_NAME_CHARS {
        result.add_error("name", "Company name cannot exceed 200 characters");
    }
    if result.is_valid {
        Ok(())
    } else {
        Err(ApiError::from(result))
    }
}

async fn company_for_user(
    db: &sqlx::SqlitePool,
    user_id: &str,
) -> Result<Option<Company>, ApiError> {
    sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)
}

/// GET /api/company - The caller's own company profile
pub async fn get_my_company(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let company = company_for_user(&state.db, &authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company profile not found".to_string()))?;

    Ok(Json(company))
}

/// POST /api/company - Create the caller's company profile
pub async fn create_company(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<CreateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    if authed.role != "company" {
        return Err(ApiError::Forbidden(
            "Only company accounts can create a company profile".to_string(),
        ));
    }
    validate_name(&payload.name)?;

    if company_for_user(&state.db, &authed.id).await?.is_some() {
        return Err(ApiError::BadRequest(
            "You already have a company profile".to_string(),
        ));
    }

    let company_id = generate_company_id();
    sqlx::query("INSERT INTO companies (id, user_id, name, website, industry) VALUES (?, ?, ?, ?, ?)")
        .bind(&company_id)
        .bind(&authed.id)
        .bind(payload.name.trim())
        .bind(payload.website.as_deref())
        .bind(payload.industry.as_deref())
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, company_id = %company_id, "Company profile created");

    let company = company_for_user(&state.db, &authed.id)
        .await?
        .ok_or_else(|| ApiError::InternalServer("Company not found after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(company)))
}

/// PUT /api/company/:id - Owner or admin update
pub async fn update_company(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(company_id): Path<String>,
    Json(payload): Json<UpdateCompanyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    if let Some(name) = &payload.name {
        validate_name(name)?;
    }

    let existing = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = ?")
        .bind(&company_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Company profile not found".to_string()))?;

    require_owner(
        &state.db,
        &authed,
        &ResourceOwner::Company(existing.id.clone()),
        "update this company",
    )
    .await?;

    sqlx::query(
        r#"
        UPDATE companies
        SET name = COALESCE(?, name),
            website = COALESCE(?, website),
            industry = COALESCE(?, industry)
        WHERE id = ?
        "#,
    )
    .bind(payload.name.as_deref().map(str::trim))
    .bind(payload.website.as_deref())
    .bind(payload.industry.as_deref())
    .bind(&company_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let company = sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = ?")
        .bind(&company_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(company))
}

/// POST /api/company/upload/logo
pub async fn upload_logo(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let company = company_for_user(&state.db, &authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Company profile not found".to_string()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed multipart body".to_string()))?
    {
        if field.file_name().is_none() {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest("Invalid file upload".to_string()))?;

        if data.len() > MAX_LOGO_BYTES {
            return Err(ApiError::AttachmentError(
                "Image exceeds the 5 MB limit".to_string(),
            ));
        }

        let extension = match infer::get(&data).map(|kind| kind.mime_type()) {
            Some("image/png") => "png",
            Some("image/jpeg") => "jpg",
            _ => {
                return Err(ApiError::AttachmentError(
                    "Only PNG and JPEG images are accepted".to_string(),
                ))
            }
        };

        let filename = format!("{}_logo.{}", company.id, extension);
        let path = state.org_assets_dir.join(&filename);
        tokio::fs::write(&path, &data).await.map_err(|e| {
            warn!(error = %e, filename = %filename, "Failed to store company logo");
            ApiError::InternalServer("Failed to store image".to_string())
        })?;

        sqlx::query("UPDATE companies SET logo_path = ? WHERE id = ?")
            .bind(&filename)
            .bind(&company.id)
            .execute(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

        info!(company_id = %company.id, filename = %filename, "Company logo updated");

        return Ok(Json(serde_json::json!({ "logo_path": filename })));
    }

    Err(ApiError::BadRequest("No image file in request".to_string()))
}

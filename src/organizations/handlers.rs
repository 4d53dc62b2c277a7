// src/organizations/handlers.rs

use axum::{
    extract::{Extension, Multipart, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::models::{CreateOrganizationRequest, Organization, UpdateOrganizationRequest};
use super::validators::OrganizationValidator;
use crate::auth::AuthedUser;
use crate::common::{
    generate_organization_id, require_owner, ApiError, AppState, ResourceOwner, Validator,
};

const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

async fn organization_for_user(
    db: &sqlx::SqlitePool,
    user_id: &str,
) -> Result<Option<Organization>, ApiError> {
    sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)
}

/// GET /api/organization - The caller's own organization profile
pub async fn get_my_organization(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let organization = organization_for_user(&state.db, &authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization profile not found".to_string()))?;

    Ok(Json(organization))
}

/// POST /api/organization - Create the caller's organization profile
pub async fn create_organization(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<CreateOrganizationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    if authed.role != "organization" {
        return Err(ApiError::Forbidden(
            "Only organization accounts can create an organization profile".to_string(),
        ));
    }

    let validation_result = OrganizationValidator.validate(&payload);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    // One profile per account, enforced here and by the UNIQUE constraint
    if organization_for_user(&state.db, &authed.id).await?.is_some() {
        return Err(ApiError::BadRequest(
            "You already have an organization profile".to_string(),
        ));
    }

    let organization_id = generate_organization_id();
    sqlx::query(
        "INSERT INTO organizations (id, user_id, name, description, website) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&organization_id)
    .bind(&authed.id)
    .bind(payload.name.trim())
    .bind(payload.description.as_deref())
    .bind(payload.website.as_deref())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, organization_id = %organization_id, "Organization profile created");

    let organization = organization_for_user(&state.db, &authed.id)
        .await?
        .ok_or_else(|| ApiError::InternalServer("Organization not found after insert".to_string()))?;

    Ok((StatusCode::CREATED, Json(organization)))
}

/// PUT /api/organization/:id - Owner or admin update
pub async fn update_organization(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(organization_id): Path<String>,
    Json(payload): Json<UpdateOrganizationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = OrganizationValidator.validate(&payload);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let existing = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = ?")
        .bind(&organization_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Organization profile not found".to_string()))?;

    require_owner(
        &state.db,
        &authed,
        &ResourceOwner::Organization(existing.id.clone()),
        "update this organization",
    )
    .await?;

    sqlx::query(
        r#"
        UPDATE organizations
        SET name = COALESCE(?, name),
            description = COALESCE(?, description),
            website = COALESCE(?, website),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(payload.name.as_deref().map(str::trim))
    .bind(payload.description.as_deref())
    .bind(payload.website.as_deref())
    .bind(&organization_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let organization = sqlx::query_as::<_, Organization>("SELECT * FROM organizations WHERE id = ?")
        .bind(&organization_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(organization))
}

#[derive(Clone, Copy)]
enum ImageSlot {
    Logo,
    Banner,
}

impl ImageSlot {
    fn column(self) -> &'static str {
        match self {
            ImageSlot::Logo => "logo_path",
            ImageSlot::Banner => "banner_path",
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            ImageSlot::Logo => "logo",
            ImageSlot::Banner => "banner",
        }
    }
}

async fn upload_image(
    state: AppState,
    authed: AuthedUser,
    mut multipart: Multipart,
    slot: ImageSlot,
) -> Result<impl IntoResponse, ApiError> {
    let organization = organization_for_user(&state.db, &authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Organization profile not found".to_string()))?;

    let mut image: Option<(Vec<u8>, &'static str)> = None;
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

        if data.len() > MAX_IMAGE_BYTES {
            return Err(ApiError::AttachmentError(
                "Image exceeds the 5 MB limit".to_string(),
            ));
        }

        // Trust the bytes, not the declared content type
        let extension = match infer::get(&data).map(|kind| kind.mime_type()) {
            Some("image/png") => "png",
            Some("image/jpeg") => "jpg",
            _ => {
                return Err(ApiError::AttachmentError(
                    "Only PNG and JPEG images are accepted".to_string(),
                ))
            }
        };

        image = Some((data.to_vec(), extension));
        break;
    }

    let (bytes, extension) =
        image.ok_or_else(|| ApiError::BadRequest("No image file in request".to_string()))?;

    let filename = format!("{}_{}.{}", organization.id, slot.suffix(), extension);
    let path = state.org_assets_dir.join(&filename);
    tokio::fs::write(&path, &bytes).await.map_err(|e| {
        warn!(error = %e, filename = %filename, "Failed to store organization image");
        ApiError::InternalServer("Failed to store image".to_string())
    })?;

    sqlx::query(&format!(
        "UPDATE organizations SET {} = ?, updated_at = datetime('now') WHERE id = ?",
        slot.column()
    ))
    .bind(&filename)
    .bind(&organization.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(organization_id = %organization.id, filename = %filename, "Organization image updated");

    let mut body = serde_json::Map::new();
    body.insert(
        slot.column().to_string(),
        serde_json::Value::String(filename),
    );
    Ok(Json(serde_json::Value::Object(body)))
}

/// POST /api/organization/upload/logo
pub async fn upload_logo(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    upload_image(state, authed, multipart, ImageSlot::Logo).await
}

/// POST /api/organization/upload/banner
pub async fn upload_banner(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    upload_image(state, authed, multipart, ImageSlot::Banner).await
}

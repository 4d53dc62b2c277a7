// src/files/handlers.rs
//! Serves stored uploads. Folder names map to configured directories; the
//! filename is checked against traversal before any filesystem access.

use axum::{
    extract::{Extension, Path},
    http::{header, StatusCode},
    response::IntoResponse,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::warn;

use crate::auth::AuthedUser;
use crate::common::{helpers::is_safe_filename, ApiError, AppState};

fn folder_dir(state: &AppState, folder: &str) -> Option<PathBuf> {
    match folder {
        "cv" => Some(state.cv_dir.clone()),
        "applications" => Some(state.applications_dir.clone()),
        _ => None,
    }
}

fn content_type_for(filename: &str, bytes: &[u8]) -> &'static str {
    if let Some(kind) = infer::get(bytes) {
        return match kind.mime_type() {
            "application/pdf" => "application/pdf",
            "image/png" => "image/png",
            "image/jpeg" => "image/jpeg",
            _ => "application/octet-stream",
        };
    }
    if filename.ends_with(".txt") {
        "text/plain; charset=utf-8"
    } else {
        "application/octet-stream"
    }
}

/// Inline rendering is limited to types a browser can display safely
fn viewable(content_type: &str) -> bool {
    matches!(
        content_type,
        "application/pdf" | "image/png" | "image/jpeg" | "text/plain; charset=utf-8"
    )
}

async fn read_stored_file(
    state: &AppState,
    folder: &str,
    filename: &str,
) -> Result<(Vec<u8>, &'static str), ApiError> {
    if !is_safe_filename(filename) {
        warn!(folder = %folder, filename = %filename, "Rejected unsafe file path");
        return Err(ApiError::BadRequest("Invalid filename".to_string()));
    }

    let dir = folder_dir(state, folder)
        .ok_or_else(|| ApiError::BadRequest("Unknown upload folder".to_string()))?;

    let path = dir.join(filename);
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::NotFound("File not found".to_string()))?;

    let content_type = content_type_for(filename, &bytes);
    Ok((bytes, content_type))
}

/// GET /uploads/:folder/:filename - Download as attachment
pub async fn download_file(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedUser,
    Path((folder, filename)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let (bytes, content_type) = read_stored_file(&state, &folder, &filename).await?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    ))
}

/// GET /uploads/:folder/view/:filename - Inline for pdf/image/text
pub async fn view_file(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    _authed: AuthedUser,
    Path((folder, filename)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let (bytes, content_type) = read_stored_file(&state, &folder, &filename).await?;

    if !viewable(content_type) {
        return Err(ApiError::BadRequest(
            "This file type cannot be viewed inline".to_string(),
        ));
    }

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, "inline".to_string()),
        ],
        bytes,
    ))
}

#[cfg(test)]
mod tests {
    use super::{content_type_for, viewable};

    #[test]
    fn test_content_type_sniffed_from_bytes() {
        assert_eq!(content_type_for("x.bin", b"%PDF-1.7 rest"), "application/pdf");
        assert_eq!(
            content_type_for("notes.txt", b"plain old text"),
            "text/plain; charset=utf-8"
        );
        assert_eq!(
            content_type_for("mystery", b"\x00\x01\x02\x03"),
            "application/octet-stream"
        );
    }

    #[test]
    fn test_inline_view_allowlist() {
        assert!(viewable("application/pdf"));
        assert!(viewable("image/png"));
        assert!(!viewable("application/octet-stream"));
    }
}

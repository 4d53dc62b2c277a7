// src/files/routes.rs

use axum::{routing::get, Router};

use super::handlers::{download_file, view_file};

pub fn file_routes() -> Router {
    Router::new()
        .route("/uploads/:folder/:filename", get(download_file))
        .route("/uploads/:folder/view/:filename", get(view_file))
}

// src/organizations/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    create_organization, get_my_organization, update_organization, upload_banner, upload_logo,
};

pub fn organization_routes() -> Router {
    Router::new()
        .route(
            "/api/organization",
            get(get_my_organization).post(create_organization),
        )
        .route("/api/organization/:id", put(update_organization))
        .route("/api/organization/upload/logo", post(upload_logo))
        .route("/api/organization/upload/banner", post(upload_banner))
}

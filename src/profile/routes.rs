// src/profile/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers;

pub fn profile_routes() -> Router {
    Router::new()
        .route(
            "/api/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route("/api/profile/cvs", post(handlers::upload_cv).get(handlers::list_cvs))
        .route(
            "/api/profile/cvs/:id",
            axum::routing::delete(handlers::delete_cv),
        )
        .route("/api/profile/cvs/:id/label", put(handlers::update_cv_label))
        .route("/api/profile/:user_id", get(handlers::get_public_profile))
}

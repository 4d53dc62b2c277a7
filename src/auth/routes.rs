// src/auth/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/register", post(handlers::register))
        .route("/api/auth/me", get(handlers::me))
}

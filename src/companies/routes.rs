// src/companies/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{create_company, get_my_company, update_company, upload_logo};

pub fn company_routes() -> Router {
    Router::new()
        .route("/api/company", get(get_my_company).post(create_company))
        .route("/api/company/:id", put(update_company))
        .route("/api/company/upload/logo", post(upload_logo))
}

// src/admin/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    create_tender, get_settings, list_tenders, list_users, moderate_tender, platform_report,
    update_setting,
};

pub fn admin_routes() -> Router {
    Router::new()
        .route("/api/admin/users", get(list_users))
        .route("/api/admin/tenders", get(list_tenders))
        .route("/api/admin/tenders/:id/moderate", put(moderate_tender))
        .route("/api/admin/reports", get(platform_report))
        .route("/api/admin/settings", get(get_settings).put(update_setting))
        .route("/api/tenders", post(create_tender))
}

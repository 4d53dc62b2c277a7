// src/applications/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{
    apply_for_job, company_response, get_application, job_applications, my_applications,
    update_status, withdraw_application,
};

pub fn application_routes() -> Router {
    Router::new()
        .route("/api/applications/job/:job_id", post(apply_for_job))
        .route("/api/applications/my-applications", get(my_applications))
        .route("/api/applications/:id", get(get_application))
        .route("/api/applications/:id/status", put(update_status))
        .route("/api/applications/:id/company-response", put(company_response))
        .route("/api/applications/:id/withdraw", put(withdraw_application))
        .route("/api/jobs/:id/applications", get(job_applications))
}

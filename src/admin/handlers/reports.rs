// src/admin/handlers/reports.rs

use axum::{extract::Extension, response::IntoResponse, Json};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::require_admin;
use crate::admin::models::{CounterDrift, PlatformReport};
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

async fn count(db: &sqlx::SqlitePool, table: &str) -> Result<i64, ApiError> {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(db)
        .await
        .map_err(ApiError::DatabaseError)
}

/// GET /api/admin/reports - Entity counts plus a recount of the cached
/// per-job application counters
pub async fn platform_report(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    require_admin(&authed)?;

    let drift_rows = sqlx::query_as::<_, (String, i64, i64)>(
        r#"
        SELECT j.id, j.application_count,
               (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id) AS actual
        FROM jobs j
        WHERE j.application_count !=
              (SELECT COUNT(*) FROM applications a WHERE a.job_id = j.id)
        "#,
    )
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let report = PlatformReport {
        users: count(&state.db, "users").await?,
        jobs: count(&state.db, "jobs").await?,
        applications: count(&state.db, "applications").await?,
        organizations: count(&state.db, "organizations").await?,
        companies: count(&state.db, "companies").await?,
        posts: count(&state.db, "posts").await?,
        tenders: count(&state.db, "tenders").await?,
        application_count_drift: drift_rows
            .into_iter()
            .map(|(job_id, cached, actual)| CounterDrift {
                job_id,
                cached,
                actual,
            })
            .collect(),
    };

    Ok(Json(report))
}

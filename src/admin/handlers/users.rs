// src/admin/handlers/users.rs

use axum::{
    extract::{Extension, Query},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::require_admin;
use crate::admin::models::UserListQuery;
use crate::auth::{AuthedUser, User};
use crate::common::{ApiError, AppState};

/// GET /api/admin/users - Paginated user listing, optional role filter
pub async fn list_users(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Query(query): Query<UserListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();
    require_admin(&authed)?;

    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    let (users, total): (Vec<User>, i64) = match &query.role {
        Some(role) => {
            let users = sqlx::query_as::<_, User>(
                "SELECT * FROM users WHERE role = ? ORDER BY created_at DESC LIMIT ? OFFSET ?",
            )
            .bind(role)
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            let total = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
                .bind(role)
                .fetch_one(&state.db)
                .await
                .map_err(ApiError::DatabaseError)?;

            (users, total)
        }
        None => {
            let users = sqlx::query_as::<_, User>(
                "SELECT * FROM users ORDER BY created_at DESC LIMIT ? OFFSET ?",
            )
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?;

            let total = sqlx::query_scalar("SELECT COUNT(*) FROM users")
                .fetch_one(&state.db)
                .await
                .map_err(ApiError::DatabaseError)?;

            (users, total)
        }
    };

    Ok(Json(serde_json::json!({
        "users": users,
        "total": total,
        "page": page,
        "limit": limit,
    })))
}

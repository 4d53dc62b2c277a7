// src/follow/handlers.rs
//! Follow relations over three target kinds. The toggle writes the relation
//! and both cached counters in one transaction, so repeating it is an exact
//! inverse.

use axum::{
    extract::{Extension, Path},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{
    Follow, FollowListEntry, FollowStats, FollowToggleRequest, FollowToggleResponse,
    FOLLOW_TARGET_TYPES,
};
use crate::auth::AuthedUser;
use crate::common::{generate_follow_id, ApiError, AppState};

pub(crate) fn counter_table(target_type: &str) -> &'static str {
    match target_type {
        "company" => "companies",
        "organization" => "organizations",
        _ => "users",
    }
}

async fn target_exists(
    db: &sqlx::SqlitePool,
    target_type: &str,
    target_id: &str,
) -> Result<bool, ApiError> {
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(*) FROM {} WHERE id = ?",
        counter_table(target_type)
    ))
    .bind(target_id)
    .fetch_one(db)
    .await
    .map_err(ApiError::DatabaseError)?;
    Ok(count > 0)
}

/// POST /api/follow/:target_id - Toggle a follow relation
pub async fn toggle_follow(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(target_id): Path<String>,
    Json(payload): Json<FollowToggleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    if !FOLLOW_TARGET_TYPES.contains(&payload.target_type.as_str()) {
        return Err(ApiError::BadRequest("Invalid follow target type".to_string()));
    }
    if payload.target_type == "user" && target_id == authed.id {
        return Err(ApiError::BadRequest("You cannot follow yourself".to_string()));
    }
    if !target_exists(&state.db, &payload.target_type, &target_id).await? {
        return Err(ApiError::NotFound("Follow target not found".to_string()));
    }

    let existing = sqlx::query_as::<_, Follow>(
        "SELECT * FROM follows WHERE follower_id = ? AND target_type = ? AND target_id = ?",
    )
    .bind(&authed.id)
    .bind(&payload.target_type)
    .bind(&target_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let mut tx = state.db.begin().await.map_err(ApiError::DatabaseError)?;
    let following = match existing {
        Some(relation) => {
            sqlx::query("DELETE FROM follows WHERE id = ?")
                .bind(&relation.id)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;

            sqlx::query(
                "UPDATE users SET following_count = MAX(following_count - 1, 0) WHERE id = ?",
            )
            .bind(&authed.id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

            sqlx::query(&format!(
                "UPDATE {} SET follower_count = MAX(follower_count - 1, 0) WHERE id = ?",
                counter_table(&payload.target_type)
            ))
            .bind(&target_id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

            false
        }
        None => {
            sqlx::query(
                r#"
                INSERT INTO follows (id, follower_id, target_type, target_id, status)
                VALUES (?, ?, ?, ?, 'accepted')
                "#,
            )
            .bind(generate_follow_id())
            .bind(&authed.id)
            .bind(&payload.target_type)
            .bind(&target_id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

            sqlx::query("UPDATE users SET following_count = following_count + 1 WHERE id = ?")
                .bind(&authed.id)
                .execute(&mut *tx)
                .await
                .map_err(ApiError::DatabaseError)?;

            sqlx::query(&format!(
                "UPDATE {} SET follower_count = follower_count + 1 WHERE id = ?",
                counter_table(&payload.target_type)
            ))
            .bind(&target_id)
            .execute(&mut *tx)
            .await
            .map_err(ApiError::DatabaseError)?;

            true
        }
    };
    tx.commit().await.map_err(ApiError::DatabaseError)?;

    info!(
        user_id = %authed.id,
        target_type = %payload.target_type,
        target_id = %target_id,
        following = following,
        "Follow toggled"
    );

    Ok(Json(FollowToggleResponse {
        following,
        target_type: payload.target_type,
        target_id,
    }))
}

/// GET /api/follow/followers - Who follows the caller (and any company or
/// organization profile they own)
pub async fn list_followers(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let mut targets: Vec<(String, String)> = vec![("user".to_string(), authed.id.clone())];
    if let Some(company_id) =
        sqlx::query_scalar::<_, String>("SELECT id FROM companies WHERE user_id = ?")
            .bind(&authed.id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?
    {
        targets.push(("company".to_string(), company_id));
    }
    if let Some(organization_id) =
        sqlx::query_scalar::<_, String>("SELECT id FROM organizations WHERE user_id = ?")
            .bind(&authed.id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?
    {
        targets.push(("organization".to_string(), organization_id));
    }

    let mut followers = Vec::new();
    for (target_type, target_id) in &targets {
        let rows = sqlx::query_as::<_, (String, Option<String>, Option<String>)>(
            r#"
            SELECT f.follower_id, u.name, f.created_at
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.target_type = ? AND f.target_id = ? AND f.status = 'accepted'
            ORDER BY f.created_at DESC
            "#,
        )
        .bind(target_type)
        .bind(target_id)
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        followers.extend(rows.into_iter().map(|(follower_id, name, followed_at)| {
            FollowListEntry {
                target_type: "user".to_string(),
                target_id: follower_id,
                name,
                followed_at,
            }
        }));
    }

    Ok(Json(serde_json::json!({ "followers": followers })))
}

/// GET /api/follow/following - Everything the caller follows
pub async fn list_following(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let rows = sqlx::query_as::<_, (String, String, Option<String>)>(
        r#"
        SELECT f.target_type, f.target_id, f.created_at
        FROM follows f
        WHERE f.follower_id = ? AND f.status = 'accepted'
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let mut following = Vec::new();
    for (target_type, target_id, followed_at) in rows {
        // users.name is nullable, companies/organizations are not
        let name: Option<String> = sqlx::query_scalar::<_, Option<String>>(&format!(
            "SELECT name FROM {} WHERE id = ?",
            counter_table(&target_type)
        ))
        .bind(&target_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?
        .flatten();

        following.push(FollowListEntry {
            target_type,
            target_id,
            name,
            followed_at,
        });
    }

    Ok(Json(serde_json::json!({ "following": following })))
}

/// GET /api/follow/pending - Relations awaiting acceptance. The toggle
/// writes accepted relations directly, so this only surfaces rows from
/// imports or older data.
pub async fn list_pending(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let rows = sqlx::query_as::<_, (String, Option<String>, Option<String>)>(
        r#"
        SELECT f.follower_id, u.name, f.created_at
        FROM follows f
        JOIN users u ON u.id = f.follower_id
        WHERE f.target_type = 'user' AND f.target_id = ? AND f.status = 'pending'
        ORDER BY f.created_at DESC
        "#,
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let pending: Vec<FollowListEntry> = rows
        .into_iter()
        .map(|(follower_id, name, followed_at)| FollowListEntry {
            target_type: "user".to_string(),
            target_id: follower_id,
            name,
            followed_at,
        })
        .collect();

    Ok(Json(serde_json::json!({ "pending": pending })))
}

/// GET /api/follow/suggestions - Users not yet followed, most recent first
pub async fn follow_suggestions(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let rows = sqlx::query_as::<_, (String, Option<String>)>(
        r#"
        SELECT u.id, u.name
        FROM users u
        WHERE u.id != ?
          AND u.id NOT IN (
              SELECT target_id FROM follows
              WHERE follower_id = ? AND target_type = 'user'
          )
        ORDER BY u.created_at DESC
        LIMIT 10
        "#,
    )
    .bind(&authed.id)
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let suggestions: Vec<FollowListEntry> = rows
        .into_iter()
        .map(|(target_id, name)| FollowListEntry {
            target_type: "user".to_string(),
            target_id,
            name,
            followed_at: None,
        })
        .collect();

    Ok(Json(serde_json::json!({ "suggestions": suggestions })))
}

/// GET /api/follow/stats - Recounted from the relation table; the cached
/// counters on the entity rows are a denormalization, never ground truth
pub async fn follow_stats(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let followers: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM follows WHERE target_type = 'user' AND target_id = ? AND status = 'accepted'",
    )
    .bind(&authed.id)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let following: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM follows WHERE follower_id = ? AND status = 'accepted'",
    )
    .bind(&authed.id)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(FollowStats {
        followers,
        following,
    }))
}

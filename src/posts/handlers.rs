// src/posts/handlers.rs

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{
    CreatePostRequest, FeedEntry, Post, SharePostRequest, UpdatePostRequest,
};
use super::validators::PostValidator;
use crate::auth::AuthedUser;
use crate::common::{generate_post_id, ApiError, AppState, Validator};

async fn load_post(db: &sqlx::SqlitePool, id: &str) -> Result<Post, ApiError> {
    sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
        .bind(id)
        .fetch_optional(db)
        .await
        .map_err(ApiError::DatabaseError)?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
}

/// POST /api/posts - Publish a post
pub async fn create_post(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = PostValidator.validate(&payload);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let post_id = generate_post_id();
    sqlx::query("INSERT INTO posts (id, author_id, content, visibility) VALUES (?, ?, ?, ?)")
        .bind(&post_id)
        .bind(&authed.id)
        .bind(payload.content.trim())
        .bind(payload.visibility.as_deref().unwrap_or("public"))
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, post_id = %post_id, "Post created");

    let post = load_post(&state.db, &post_id).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/posts/feed - Own posts plus posts from followed authors
pub async fn feed(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    // Followed companies and organizations surface posts through the user
    // account that owns them.
    let posts = sqlx::query_as::<_, Post>(
        r#"
        SELECT p.* FROM posts p
        WHERE p.author_id = ?
           OR p.author_id IN (
              SELECT f.target_id FROM follows f
              WHERE f.follower_id = ? AND f.target_type = 'user' AND f.status = 'accepted'
           )
           OR p.author_id IN (
              SELECT c.user_id FROM follows f
              JOIN companies c ON c.id = f.target_id
              WHERE f.follower_id = ? AND f.target_type = 'company' AND f.status = 'accepted'
           )
           OR p.author_id IN (
              SELECT o.user_id FROM follows f
              JOIN organizations o ON o.id = f.target_id
              WHERE f.follower_id = ? AND f.target_type = 'organization' AND f.status = 'accepted'
           )
        ORDER BY p.created_at DESC
        LIMIT 50
        "#,
    )
    .bind(&authed.id)
    .bind(&authed.id)
    .bind(&authed.id)
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let mut entries = Vec::with_capacity(posts.len());
    for post in posts {
        let author_name: Option<String> = sqlx::query_scalar::<_, Option<String>>("SELECT name FROM users WHERE id = ?")
            .bind(&post.author_id)
            .fetch_optional(&state.db)
            .await
            .map_err(ApiError::DatabaseError)?
            .flatten();

        let shared_post = match &post.shared_post_id {
            Some(original_id) => {
                sqlx::query_as::<_, Post>("SELECT * FROM posts WHERE id = ?")
                    .bind(original_id)
                    .fetch_optional(&state.db)
                    .await
                    .map_err(ApiError::DatabaseError)?
            }
            None => None,
        };

        entries.push(FeedEntry {
            post,
            author_name,
            shared_post,
        });
    }

    Ok(Json(serde_json::json!({ "posts": entries })))
}

/// PUT /api/posts/:id - Author or admin edit
pub async fn update_post(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(post_id): Path<String>,
    Json(payload): Json<UpdatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let validation_result = PostValidator.validate(&payload);
    if !validation_result.is_valid {
        return Err(ApiError::from(validation_result));
    }

    let post = load_post(&state.db, &post_id).await?;
    if post.author_id != authed.id && !authed.is_admin {
        return Err(ApiError::Forbidden(
            "You are not allowed to edit this post".to_string(),
        ));
    }

    sqlx::query(
        r#"
        UPDATE posts
        SET content = COALESCE(?, content),
            visibility = COALESCE(?, visibility),
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(payload.content.as_deref().map(str::trim))
    .bind(payload.visibility.as_deref())
    .bind(&post_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let post = load_post(&state.db, &post_id).await?;
    Ok(Json(post))
}

/// DELETE /api/posts/:id - Author or admin
pub async fn delete_post(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(post_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let post = load_post(&state.db, &post_id).await?;
    if post.author_id != authed.id && !authed.is_admin {
        return Err(ApiError::Forbidden(
            "You are not allowed to delete this post".to_string(),
        ));
    }

    // Shares of this post keep their own row with the reference cleared;
    // clients render that as "original removed".
    let mut tx = state.db.begin().await.map_err(ApiError::DatabaseError)?;
    sqlx::query("UPDATE posts SET shared_post_id = NULL WHERE shared_post_id = ?")
        .bind(&post_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;
    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(&post_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;
    tx.commit().await.map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, post_id = %post_id, "Post deleted");

    Ok(Json(serde_json::json!({ "deleted": post_id })))
}

/// POST /api/posts/:id/share - Create a share referencing the original;
/// the original's share counter moves in the same transaction
pub async fn share_post(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(post_id): Path<String>,
    Json(payload): Json<SharePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let original = load_post(&state.db, &post_id).await?;

    // Shares always point at the root post, never at another share
    let root_id = original.shared_post_id.clone().unwrap_or(original.id);

    let share_id = generate_post_id();
    let mut tx = state.db.begin().await.map_err(ApiError::DatabaseError)?;

    sqlx::query(
        "INSERT INTO posts (id, author_id, content, visibility, shared_post_id) VALUES (?, ?, ?, 'public', ?)",
    )
    .bind(&share_id)
    .bind(&authed.id)
    .bind(payload.content.as_deref().map(str::trim).unwrap_or(""))
    .bind(&root_id)
    .execute(&mut *tx)
    .await
    .map_err(ApiError::DatabaseError)?;

    sqlx::query("UPDATE posts SET share_count = share_count + 1 WHERE id = ?")
        .bind(&root_id)
        .execute(&mut *tx)
        .await
        .map_err(ApiError::DatabaseError)?;

    tx.commit().await.map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, post_id = %root_id, share_id = %share_id, "Post shared");

    let share = load_post(&state.db, &share_id).await?;
    Ok((StatusCode::CREATED, Json(share)))
}

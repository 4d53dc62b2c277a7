// src/posts/routes.rs

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{create_post, delete_post, feed, share_post, update_post};

pub fn post_routes() -> Router {
    Router::new()
        .route("/api/posts", post(create_post))
        .route("/api/posts/feed", get(feed))
        .route("/api/posts/:id", put(update_post).delete(delete_post))
        .route("/api/posts/:id/share", post(share_post))
}

// src/follow/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    follow_stats, follow_suggestions, list_followers, list_following, list_pending, toggle_follow,
};

pub fn follow_routes() -> Router {
    Router::new()
        .route("/api/follow/followers", get(list_followers))
        .route("/api/follow/following", get(list_following))
        .route("/api/follow/pending", get(list_pending))
        .route("/api/follow/suggestions", get(follow_suggestions))
        .route("/api/follow/stats", get(follow_stats))
        .route("/api/follow/:target_id", post(toggle_follow))
}

// src/posts/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const POST_VISIBILITIES: [&str; 2] = ["public", "followers"];

#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
pub struct Post {
    pub id: String,
    pub author_id: String,
    pub content: String,
    pub visibility: String,
    /// Set when this post is a share of another post
    pub shared_post_id: Option<String>,
    pub share_count: i64,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
    pub visibility: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub content: Option<String>,
    pub visibility: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct SharePostRequest {
    pub content: Option<String>,
}

/// Feed row: the post plus author identity and, for shares, the original
#[derive(Debug, Serialize)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub post: Post,
    pub author_name: Option<String>,
    pub shared_post: Option<Post>,
}

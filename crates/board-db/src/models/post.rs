//! Post database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for posts table
#[derive(Debug, Clone, FromRow)]
pub struct PostModel {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub view_count: i32,
    pub scrap_count: i32,
    pub search_count: i32,
    pub popularity_score: i32,
    pub author_id: Option<i64>,
    pub board_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Post row plus its `ts_rank` from a full-text search
#[derive(Debug, Clone, FromRow)]
pub struct RankedPostModel {
    #[sqlx(flatten)]
    pub post: PostModel,
    pub rank: f32,
}

//! Post entity - a board article with popularity counters

use chrono::{DateTime, Utc};

use crate::value_objects::{popularity_score, CounterDelta, Lifecycle};

/// Post entity.
///
/// `popularity_score` is derived from the view and scrap counters and is
/// maintained incrementally by the store; it is never recomputed on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub view_count: i32,
    pub scrap_count: i32,
    pub search_count: i32,
    pub popularity_score: i32,
    /// `None` once the author row is gone
    pub author_id: Option<i64>,
    pub board_id: i64,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with zeroed counters. The id is assigned by the store.
    pub fn new(title: String, content: String, author_id: i64, board_id: i64) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            title,
            content,
            view_count: 0,
            scrap_count: 0,
            search_count: 0,
            popularity_score: 0,
            author_id: Some(author_id),
            board_id,
            lifecycle: Lifecycle::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        !self.lifecycle.is_active()
    }

    /// Check whether `user_id` wrote this post
    pub fn is_authored_by(&self, user_id: i64) -> bool {
        self.author_id == Some(user_id)
    }

    /// Score implied by the current counters
    pub fn expected_popularity(&self) -> i32 {
        popularity_score(self.view_count, self.scrap_count)
    }

    /// Apply a counter delta the same way the store does: counters clamp at
    /// zero and the score moves by the effective change only.
    pub fn apply_counters(&mut self, delta: CounterDelta) {
        let views = (self.view_count + delta.views).max(0);
        let scraps = (self.scrap_count + delta.scraps).max(0);
        self.popularity_score += CounterDelta::new(views - self.view_count, scraps - self.scrap_count)
            .score_delta();
        self.view_count = views;
        self.scrap_count = scraps;
    }

    /// Replace title and/or content
    pub fn edit(&mut self, title: Option<String>, content: Option<String>) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(content) = content {
            self.content = content;
        }
        self.updated_at = Utc::now();
    }
}

/// A post returned from full-text search, with its relevance rank
#[derive(Debug, Clone, PartialEq)]
pub struct RankedPost {
    pub post: Post,
    pub rank: f32,
}

//! Scrap entity - a user's bookmark of a post

use chrono::{DateTime, Utc};

/// At most one scrap exists per (user, post) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scrap {
    pub user_id: i64,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

impl Scrap {
    pub fn new(user_id: i64, post_id: i64) -> Self {
        Self {
            user_id,
            post_id,
            created_at: Utc::now(),
        }
    }
}

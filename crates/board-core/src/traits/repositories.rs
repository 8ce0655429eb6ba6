//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.
//!
//! Every read that returns posts or users to clients filters soft-deleted
//! rows inside the query itself, so that LIMIT/OFFSET and counts stay
//! correct. `UserRepository::find_by_ids` is the one exception: it serves
//! author resolution and returns deleted users too.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Board, Post, RankedPost, Scrap, User};
use crate::error::DomainError;
use crate::value_objects::{CounterDelta, Page, SearchKeyword, UserRole};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find an active user by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>>;

    /// Find users by ID, deleted ones included. Order is unspecified.
    async fn find_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<User>>;

    /// Find an active user by email
    async fn find_active_by_email(&self, email: &str) -> RepoResult<Option<User>>;

    /// List all active users, newest first
    async fn list_active(&self) -> RepoResult<Vec<User>>;

    /// Check if an active user already holds this email
    async fn active_email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Insert a user and return it with its assigned ID
    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<User>;

    /// Persist profile changes of an active user
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Mark an active user as deleted
    async fn soft_delete(&self, id: i64, at: DateTime<Utc>) -> RepoResult<()>;

    /// Get password hash of an active user
    async fn get_password_hash(&self, id: i64) -> RepoResult<Option<String>>;
}

// ============================================================================
// Board Repository
// ============================================================================

/// Filters for board listings
#[derive(Debug, Clone, Default)]
pub struct BoardQuery {
    /// Board roles the viewer may see; empty means none
    pub roles: Vec<UserRole>,
    pub parent_id: Option<i64>,
    pub slug: Option<String>,
    /// Case-insensitive substring of the board name
    pub name_contains: Option<String>,
}

#[async_trait]
pub trait BoardRepository: Send + Sync {
    /// Find board by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Board>>;

    /// Find board by slug
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Board>>;

    /// Find boards by ID. Order is unspecified.
    async fn find_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<Board>>;

    /// All boards whose parent is one of `parent_ids`, ordered by ID
    async fn find_children(&self, parent_ids: &[i64]) -> RepoResult<Vec<Board>>;

    /// List boards matching the query, ordered by ID
    async fn list(&self, query: &BoardQuery) -> RepoResult<Vec<Board>>;

    /// Insert a board and return it with its assigned ID
    async fn create(&self, board: &Board) -> RepoResult<Board>;

    /// Update an existing board
    async fn update(&self, board: &Board) -> RepoResult<()>;
}

// ============================================================================
// Post Repository
// ============================================================================

/// Ordering applied to post listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    /// Newest first
    CreatedAtDesc,
    /// Most viewed first, newest first among equals
    ViewCountDesc,
}

/// Filters for post listings
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub board_id: Option<i64>,
    pub author_id: Option<i64>,
    /// Case-insensitive substring of title or content
    pub keyword: Option<String>,
    pub min_view_count: Option<i32>,
    pub min_scrap_count: Option<i32>,
    pub page: Page,
}

impl PostQuery {
    /// Filtering by views switches the listing to most-viewed order
    pub fn order(&self) -> PostOrder {
        if self.min_view_count.is_some() {
            PostOrder::ViewCountDesc
        } else {
            PostOrder::CreatedAtDesc
        }
    }
}

#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a live post by ID
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Post>>;

    /// List live posts matching the query
    async fn list(&self, query: &PostQuery) -> RepoResult<Vec<Post>>;

    /// Live posts with at least `min_views` views, highest score first
    async fn list_best(&self, min_views: i32, limit: i64) -> RepoResult<Vec<Post>>;

    /// Ranked full-text search over title and content of live posts
    async fn search(&self, keyword: &SearchKeyword, page: Page) -> RepoResult<Vec<RankedPost>>;

    /// Insert a post and return it with its assigned ID
    async fn create(&self, post: &Post) -> RepoResult<Post>;

    /// Persist title, content and board of a live post
    async fn update(&self, post: &Post) -> RepoResult<()>;

    /// Mark a live post as deleted
    async fn soft_delete(&self, id: i64, at: DateTime<Utc>) -> RepoResult<()>;

    /// Atomically apply a counter delta and the matching score change.
    /// Counters never drop below zero.
    async fn apply_counters(&self, id: i64, delta: CounterDelta) -> RepoResult<()>;

    /// Add one search hit to each post, returning the number of rows touched
    async fn increment_search_counts(&self, ids: &[i64]) -> RepoResult<u64>;

    /// Count live posts per board. Boards without posts are absent.
    async fn count_by_boards(&self, board_ids: &[i64]) -> RepoResult<HashMap<i64, i64>>;
}

// ============================================================================
// Scrap Repository
// ============================================================================

#[async_trait]
pub trait ScrapRepository: Send + Sync {
    /// Insert a scrap. Returns false if the pair already existed.
    async fn create(&self, scrap: &Scrap) -> RepoResult<bool>;

    /// Delete a scrap. Returns false if there was nothing to delete.
    async fn delete(&self, user_id: i64, post_id: i64) -> RepoResult<bool>;

    /// Check if a user scrapped a post
    async fn exists(&self, user_id: i64, post_id: i64) -> RepoResult<bool>;

    /// The subset of `post_ids` the user has scrapped
    async fn scrapped_post_ids(&self, user_id: i64, post_ids: &[i64]) -> RepoResult<Vec<i64>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_query_order() {
        let mut query = PostQuery::default();
        assert_eq!(query.order(), PostOrder::CreatedAtDesc);
        query.min_view_count = Some(0);
        assert_eq!(query.order(), PostOrder::ViewCountDesc);
    }
}

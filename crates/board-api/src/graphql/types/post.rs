use async_graphql::{Context, Object, Result};
use board_core::RankedPost;
use chrono::{DateTime, Utc};

use super::{Board, User};
use crate::error::ResultExt;
use crate::graphql::{loaders, viewer::Viewer};

/// A post on a board
#[derive(Debug, Clone)]
pub struct Post {
    post: board_core::Post,
    rank: Option<f32>,
}

impl From<board_core::Post> for Post {
    fn from(post: board_core::Post) -> Self {
        Self { post, rank: None }
    }
}

impl From<RankedPost> for Post {
    fn from(ranked: RankedPost) -> Self {
        Self {
            post: ranked.post,
            rank: Some(ranked.rank),
        }
    }
}

#[Object]
impl Post {
    async fn id(&self) -> i64 {
        self.post.id
    }

    async fn title(&self) -> &str {
        &self.post.title
    }

    async fn content(&self) -> &str {
        &self.post.content
    }

    async fn view_count(&self) -> i32 {
        self.post.view_count
    }

    async fn scrap_count(&self) -> i32 {
        self.post.scrap_count
    }

    async fn search_count(&self) -> i32 {
        self.post.search_count
    }

    async fn popularity_score(&self) -> i32 {
        self.post.popularity_score
    }

    async fn author_id(&self) -> Option<i64> {
        self.post.author_id
    }

    async fn board_id(&self) -> i64 {
        self.post.board_id
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.post.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.post.updated_at
    }

    async fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.post.lifecycle.deleted_at()
    }

    /// Search relevance. Only set on search results.
    async fn rank(&self) -> Option<f32> {
        self.rank
    }

    /// Comments are not stored yet
    async fn comment_count(&self) -> i32 {
        0
    }

    /// The author, even if their account has since been deleted
    async fn author(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let Some(author_id) = self.post.author_id else {
            return Ok(None);
        };
        Ok(loaders(ctx)?.user(author_id).await.extend_err()?.map(User))
    }

    /// The board the post belongs to. Posts are readable regardless of the
    /// board's required role; only the board itself is withheld, so this
    /// is null when the viewer's role cannot see it.
    async fn board(&self, ctx: &Context<'_>) -> Result<Option<Board>> {
        let role = Viewer::of(ctx).role();
        Ok(loaders(ctx)?
            .board(self.post.board_id)
            .await
            .extend_err()?
            .filter(|b| b.is_visible_to(role))
            .map(Board))
    }

    /// Whether the viewer has scrapped this post. Always false when
    /// signed out.
    async fn is_scrapped(&self, ctx: &Context<'_>) -> Result<bool> {
        let Some(viewer) = Viewer::of(ctx).user() else {
            return Ok(false);
        };
        loaders(ctx)?
            .is_scrapped(viewer.id, self.post.id)
            .await
            .extend_err()
    }
}

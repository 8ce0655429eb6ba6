//! Scrap (bookmark) service
//!
//! A scrap row changes the post's scrap counter exactly once: on the insert
//! that created it and on the delete that removed it.

use board_core::{DomainError, Post, Scrap};
use tracing::{info, instrument, warn};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::post::PostService;

/// Scrap service
pub struct ScrapService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ScrapService<'a> {
    /// Create a new ScrapService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Scrap a live post for `user_id`
    #[instrument(skip(self))]
    pub async fn scrap(&self, user_id: i64, post_id: i64) -> ServiceResult<Post> {
        let posts = PostService::new(self.ctx);
        let post = posts.get_post(post_id).await?;

        if !self
            .ctx
            .scrap_repo()
            .create(&Scrap::new(user_id, post_id))
            .await?
        {
            return Err(DomainError::AlreadyScrapped.into());
        }

        if let Err(e) = posts.increment_scrap_count(post_id).await {
            warn!(post_id, error = %e, "Scrap saved but counter update failed");
        }

        info!(user_id, post_id, "Post scrapped");
        self.refreshed(post).await
    }

    /// Remove a scrap. Fails with not-found if there was none.
    #[instrument(skip(self))]
    pub async fn unscrap(&self, user_id: i64, post_id: i64) -> ServiceResult<Post> {
        let posts = PostService::new(self.ctx);
        let post = posts.get_post(post_id).await?;

        if !self.ctx.scrap_repo().delete(user_id, post_id).await? {
            return Err(DomainError::ScrapNotFound { user_id, post_id }.into());
        }

        if let Err(e) = posts.decrement_scrap_count(post_id).await {
            warn!(post_id, error = %e, "Scrap removed but counter update failed");
        }

        info!(user_id, post_id, "Post unscrapped");
        self.refreshed(post).await
    }

    /// Whether `user_id` has scrapped `post_id`
    pub async fn is_scrapped(&self, user_id: i64, post_id: i64) -> ServiceResult<bool> {
        Ok(self.ctx.scrap_repo().exists(user_id, post_id).await?)
    }

    /// Re-read the post so its counters reflect the change, falling back to
    /// the earlier snapshot if it vanished in between
    async fn refreshed(&self, post: Post) -> ServiceResult<Post> {
        Ok(self
            .ctx
            .post_repo()
            .find_by_id(post.id)
            .await?
            .unwrap_or(post))
    }
}

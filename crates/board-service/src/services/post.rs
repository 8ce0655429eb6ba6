//! Post service
//!
//! Post reads and writes, and the popularity counters. View counts are
//! bumped in the background after the read has been served, so the returned
//! snapshot does not include the view it caused.

use board_core::{CounterDelta, DomainError, Lifecycle, Page, Post, User, BEST_POST_MIN_VIEWS};
use chrono::Utc;
use tracing::{info, instrument, warn, Instrument};
use validator::Validate;

use crate::dto::{CreatePostRequest, PostFilter, UpdatePostRequest};

use super::board::BoardService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Post service
pub struct PostService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> PostService<'a> {
    /// Create a new PostService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a live post. Counters are untouched.
    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: i64) -> ServiceResult<Post> {
        self.ctx
            .post_repo()
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Post", post_id))
    }

    /// Get a live post and count a view for it in the background
    #[instrument(skip(self))]
    pub async fn get_post_with_view_increment(&self, post_id: i64) -> ServiceResult<Post> {
        let post = self.get_post(post_id).await?;
        self.spawn_counter_update(post_id, CounterDelta::view());
        Ok(post)
    }

    /// Add one scrap to a post's counters
    #[instrument(skip(self))]
    pub async fn increment_scrap_count(&self, post_id: i64) -> ServiceResult<()> {
        self.ctx
            .post_repo()
            .apply_counters(post_id, CounterDelta::scrap())
            .await?;
        Ok(())
    }

    /// Remove one scrap from a post's counters. Never drops below zero.
    #[instrument(skip(self))]
    pub async fn decrement_scrap_count(&self, post_id: i64) -> ServiceResult<()> {
        self.ctx
            .post_repo()
            .apply_counters(post_id, CounterDelta::unscrap())
            .await?;
        Ok(())
    }

    /// Most popular posts that have been viewed at least
    /// [`BEST_POST_MIN_VIEWS`] times
    #[instrument(skip(self))]
    pub async fn list_best_posts(&self, take: Option<i64>) -> ServiceResult<Vec<Post>> {
        let page = Page::new(None, take);
        Ok(self
            .ctx
            .post_repo()
            .list_best(BEST_POST_MIN_VIEWS, page.take)
            .await?)
    }

    /// Filtered, paginated post listing
    #[instrument(skip(self, filter))]
    pub async fn list_posts(&self, filter: PostFilter) -> ServiceResult<Vec<Post>> {
        filter.validate()?;
        Ok(self.ctx.post_repo().list(&filter.into_query()).await?)
    }

    /// Write a post as `author` into a board the author can see
    #[instrument(skip(self, author, request), fields(author_id = %author.id, board_id = %request.board_id))]
    pub async fn create_post(&self, author: &User, request: CreatePostRequest) -> ServiceResult<Post> {
        request.validate()?;

        BoardService::new(self.ctx)
            .get_board(Some(author), request.board_id)
            .await?;

        let post = Post::new(request.title, request.content, author.id, request.board_id);
        let post = self.ctx.post_repo().create(&post).await?;

        info!(post_id = %post.id, "Post created");
        Ok(post)
    }

    /// Edit a post. Only its author may do this.
    #[instrument(skip(self, viewer, request), fields(post_id = %request.id))]
    pub async fn update_post(&self, viewer: &User, request: UpdatePostRequest) -> ServiceResult<Post> {
        request.validate()?;

        let mut post = self.get_post(request.id).await?;
        Self::ensure_author(viewer, &post)?;

        if let Some(board_id) = request.board_id {
            if board_id != post.board_id {
                BoardService::new(self.ctx)
                    .get_board(Some(viewer), board_id)
                    .await?;
                post.board_id = board_id;
            }
        }
        post.edit(request.title, request.content);

        self.ctx.post_repo().update(&post).await?;
        info!(post_id = %post.id, "Post updated");

        Ok(post)
    }

    /// Soft-delete a post. Only its author may do this.
    ///
    /// Returns the post as it looks after deletion.
    #[instrument(skip(self, viewer))]
    pub async fn delete_post(&self, viewer: &User, post_id: i64) -> ServiceResult<Post> {
        let mut post = self.get_post(post_id).await?;
        Self::ensure_author(viewer, &post)?;

        let now = Utc::now();
        self.ctx.post_repo().soft_delete(post_id, now).await?;
        post.lifecycle = Lifecycle::deleted(now);
        post.updated_at = now;

        info!(post_id = %post_id, "Post deleted");
        Ok(post)
    }

    fn ensure_author(viewer: &User, post: &Post) -> ServiceResult<()> {
        if post.is_authored_by(viewer.id) {
            Ok(())
        } else {
            Err(DomainError::NotPostAuthor.into())
        }
    }

    /// Apply `delta` without making the caller wait. Failures are logged only.
    fn spawn_counter_update(&self, post_id: i64, delta: CounterDelta) {
        let repo = self.ctx.shared_post_repo();
        self.ctx.spawner().spawn(Box::pin(
            async move {
                if let Err(e) = repo.apply_counters(post_id, delta).await {
                    warn!(post_id, error = %e, "Failed to update post counters");
                }
            }
            .in_current_span(),
        ));
    }
}

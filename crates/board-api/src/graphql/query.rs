//! Query root

use async_graphql::{Context, Object, Result};
use board_service::{BoardService, PostService, SearchService, UserService};

use super::types::{Board, BoardFilterInput, Post, PostFilterInput, User};
use super::viewer::Viewer;
use super::services;
use crate::error::ResultExt;

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Filtered, paginated posts. Newest first, or most viewed first when
    /// `minViewCount` is set.
    async fn posts(&self, ctx: &Context<'_>, filter: Option<PostFilterInput>) -> Result<Vec<Post>> {
        let posts = PostService::new(services(ctx)?)
            .list_posts(filter.unwrap_or_default().into())
            .await
            .extend_err()?;
        Ok(posts.into_iter().map(Post::from).collect())
    }

    /// A post, without counting a view
    async fn post(&self, ctx: &Context<'_>, id: i64) -> Result<Post> {
        PostService::new(services(ctx)?)
            .get_post(id)
            .await
            .map(Post::from)
            .extend_err()
    }

    /// A post, counting one view
    async fn view_post(&self, ctx: &Context<'_>, id: i64) -> Result<Post> {
        PostService::new(services(ctx)?)
            .get_post_with_view_increment(id)
            .await
            .map(Post::from)
            .extend_err()
    }

    /// Most popular posts with at least 10 views
    async fn best_posts(&self, ctx: &Context<'_>, take: Option<i64>) -> Result<Vec<Post>> {
        let posts = PostService::new(services(ctx)?)
            .list_best_posts(take)
            .await
            .extend_err()?;
        Ok(posts.into_iter().map(Post::from).collect())
    }

    /// Full-text search, most relevant first
    async fn search_posts(
        &self,
        ctx: &Context<'_>,
        keyword: String,
        take: Option<i64>,
        skip: Option<i64>,
    ) -> Result<Vec<Post>> {
        let results = SearchService::new(services(ctx)?)
            .search(&keyword, take, skip)
            .await
            .extend_err()?;
        Ok(results.into_iter().map(Post::from).collect())
    }

    /// Boards the viewer's role may see
    async fn boards(
        &self,
        ctx: &Context<'_>,
        filter: Option<BoardFilterInput>,
    ) -> Result<Vec<Board>> {
        let boards = BoardService::new(services(ctx)?)
            .list_boards(Viewer::of(ctx).role(), filter.unwrap_or_default().into())
            .await
            .extend_err()?;
        Ok(boards.into_iter().map(Board).collect())
    }

    async fn board(&self, ctx: &Context<'_>, id: i64) -> Result<Board> {
        BoardService::new(services(ctx)?)
            .get_board(Viewer::of(ctx).user(), id)
            .await
            .map(Board)
            .extend_err()
    }

    async fn board_by_slug(&self, ctx: &Context<'_>, slug: String) -> Result<Board> {
        BoardService::new(services(ctx)?)
            .get_board_by_slug(Viewer::of(ctx).user(), &slug)
            .await
            .map(Board)
            .extend_err()
    }

    /// Active users, newest first
    async fn users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let users = UserService::new(services(ctx)?)
            .list_active_users()
            .await
            .extend_err()?;
        Ok(users.into_iter().map(User).collect())
    }

    async fn user(&self, ctx: &Context<'_>, id: i64) -> Result<User> {
        UserService::new(services(ctx)?)
            .get_user(id)
            .await
            .map(User)
            .extend_err()
    }

    /// The signed-in user
    async fn me(&self, ctx: &Context<'_>) -> Result<User> {
        let viewer = Viewer::of(ctx).require().extend_err()?;
        Ok(User(viewer.clone()))
    }
}

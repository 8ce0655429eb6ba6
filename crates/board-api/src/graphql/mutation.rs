//! Mutation root

use async_graphql::{Context, Object, Result};
use board_service::dto::RefreshTokenRequest;
use board_service::{AuthService, BoardService, PostService, ScrapService, UserService};

use super::services;
use super::types::{
    AuthPayload, Board, CreateBoardInput, CreatePostInput, CreateUserInput, LoginInput, Post,
    UpdateBoardInput, UpdatePostInput, UpdateUserInput, User,
};
use super::viewer::Viewer;
use crate::error::ResultExt;

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn login(&self, ctx: &Context<'_>, input: LoginInput) -> Result<AuthPayload> {
        AuthService::new(services(ctx)?)
            .login(input.into())
            .await
            .map(AuthPayload::from)
            .extend_err()
    }

    async fn refresh_token(&self, ctx: &Context<'_>, refresh_token: String) -> Result<AuthPayload> {
        AuthService::new(services(ctx)?)
            .refresh_tokens(RefreshTokenRequest { refresh_token })
            .await
            .map(AuthPayload::from)
            .extend_err()
    }

    /// Sign up. Creating an admin requires an admin viewer.
    async fn create_user(&self, ctx: &Context<'_>, input: CreateUserInput) -> Result<User> {
        UserService::new(services(ctx)?)
            .create_user(Viewer::of(ctx).user(), input.into())
            .await
            .map(User)
            .extend_err()
    }

    async fn update_user(&self, ctx: &Context<'_>, input: UpdateUserInput) -> Result<User> {
        let viewer = Viewer::of(ctx).require().extend_err()?;
        UserService::new(services(ctx)?)
            .update_user(viewer, input.into())
            .await
            .map(User)
            .extend_err()
    }

    /// Soft-delete an account; returns it as deleted
    async fn delete_user(&self, ctx: &Context<'_>, id: i64) -> Result<User> {
        let viewer = Viewer::of(ctx).require().extend_err()?;
        UserService::new(services(ctx)?)
            .delete_user(viewer, id)
            .await
            .map(User)
            .extend_err()
    }

    async fn create_post(&self, ctx: &Context<'_>, input: CreatePostInput) -> Result<Post> {
        let viewer = Viewer::of(ctx).require().extend_err()?;
        PostService::new(services(ctx)?)
            .create_post(viewer, input.into())
            .await
            .map(Post::from)
            .extend_err()
    }

    async fn update_post(&self, ctx: &Context<'_>, input: UpdatePostInput) -> Result<Post> {
        let viewer = Viewer::of(ctx).require().extend_err()?;
        PostService::new(services(ctx)?)
            .update_post(viewer, input.into())
            .await
            .map(Post::from)
            .extend_err()
    }

    /// Soft-delete a post; returns it as deleted
    async fn delete_post(&self, ctx: &Context<'_>, id: i64) -> Result<Post> {
        let viewer = Viewer::of(ctx).require().extend_err()?;
        PostService::new(services(ctx)?)
            .delete_post(viewer, id)
            .await
            .map(Post::from)
            .extend_err()
    }

    async fn scrap_post(&self, ctx: &Context<'_>, post_id: i64) -> Result<Post> {
        let viewer = Viewer::of(ctx).require().extend_err()?;
        ScrapService::new(services(ctx)?)
            .scrap(viewer.id, post_id)
            .await
            .map(Post::from)
            .extend_err()
    }

    async fn unscrap_post(&self, ctx: &Context<'_>, post_id: i64) -> Result<Post> {
        let viewer = Viewer::of(ctx).require().extend_err()?;
        ScrapService::new(services(ctx)?)
            .unscrap(viewer.id, post_id)
            .await
            .map(Post::from)
            .extend_err()
    }

    async fn create_board(&self, ctx: &Context<'_>, input: CreateBoardInput) -> Result<Board> {
        let viewer = Viewer::of(ctx).require().extend_err()?;
        BoardService::new(services(ctx)?)
            .create_board(viewer, input.into())
            .await
            .map(Board)
            .extend_err()
    }

    async fn update_board(&self, ctx: &Context<'_>, input: UpdateBoardInput) -> Result<Board> {
        let viewer = Viewer::of(ctx).require().extend_err()?;
        BoardService::new(services(ctx)?)
            .update_board(viewer, input.into())
            .await
            .map(Board)
            .extend_err()
    }
}

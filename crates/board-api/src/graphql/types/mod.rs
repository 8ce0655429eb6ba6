//! GraphQL object, input and enum types

mod board;
mod inputs;
mod post;
mod user;

use async_graphql::{Enum, SimpleObject};
use board_service::dto::AuthResponse;

pub use board::Board;
pub use inputs::{
    BoardFilterInput, CreateBoardInput, CreatePostInput, CreateUserInput, LoginInput,
    PostFilterInput, UpdateBoardInput, UpdatePostInput, UpdateUserInput,
};
pub use post::Post;
pub use user::User;

/// Access level of a user, and the level a board requires
#[derive(Enum, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[graphql(remote = "board_core::UserRole")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

/// Tokens issued on login or refresh
#[derive(SimpleObject)]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

impl From<AuthResponse> for AuthPayload {
    fn from(response: AuthResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_in: response.expires_in,
            user: response.user.into(),
        }
    }
}

//! Business logic services
//!
//! Each service borrows the shared [`ServiceContext`] for the duration of a
//! call. Authorization decisions live here, not in the transport layer.

pub mod auth;
pub mod board;
pub mod context;
pub mod error;
pub mod post;
pub mod scrap;
pub mod search;
pub mod user;

pub use auth::AuthService;
pub use board::{BoardService, MAX_BOARD_DEPTH};
pub use context::{ServiceContext, ServiceContextBuilder, SharedRepos};
pub use error::{ServiceError, ServiceResult};
pub use post::PostService;
pub use scrap::ScrapService;
pub use search::SearchService;
pub use user::UserService;

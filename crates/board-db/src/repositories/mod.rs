//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in board-core.
//! Each repository handles database operations for a specific domain entity.

mod board;
mod error;
mod post;
mod scrap;
mod user;

pub use board::PgBoardRepository;
pub use post::PgPostRepository;
pub use scrap::PgScrapRepository;
pub use user::PgUserRepository;

//! Database models - SQLx-compatible structs for PostgreSQL tables

mod board;
mod post;
mod user;

pub use board::BoardModel;
pub use post::{PostModel, RankedPostModel};
pub use user::UserModel;

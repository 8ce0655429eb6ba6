//! Domain entities - core business objects

mod board;
mod post;
mod scrap;
mod user;

pub use board::Board;
pub use post::{Post, RankedPost};
pub use scrap::Scrap;
pub use user::User;

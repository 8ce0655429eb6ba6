//! # board-core
//!
//! Domain layer containing entities, value objects and repository traits for
//! the community board. This crate has zero dependencies on infrastructure
//! (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{Board, Post, RankedPost, Scrap, User};
pub use error::DomainError;
pub use traits::{
    BoardQuery, BoardRepository, PostOrder, PostQuery, PostRepository, RepoResult,
    ScrapRepository, UserRepository,
};
pub use value_objects::{
    popularity_score, CounterDelta, Lifecycle, Page, SearchKeyword, UserRole,
    BEST_POST_MIN_VIEWS, MAX_KEYWORD_CHARS, SCRAP_WEIGHT, VIEW_WEIGHT,
};

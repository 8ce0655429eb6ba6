//! Repository traits (ports)

mod repositories;

pub use repositories::{
    BoardQuery, BoardRepository, PostOrder, PostQuery, PostRepository, RepoResult,
    ScrapRepository, UserRepository,
};

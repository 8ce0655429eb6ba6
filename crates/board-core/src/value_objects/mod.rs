//! Value objects - immutable types that represent domain concepts

mod lifecycle;
mod page;
mod popularity;
mod role;
mod search_keyword;

pub use lifecycle::Lifecycle;
pub use page::{Page, DEFAULT_TAKE, MAX_TAKE};
pub use popularity::{
    popularity_score, CounterDelta, BEST_POST_MIN_VIEWS, SCRAP_WEIGHT, VIEW_WEIGHT,
};
pub use role::UserRole;
pub use search_keyword::{SearchKeyword, MAX_KEYWORD_CHARS};

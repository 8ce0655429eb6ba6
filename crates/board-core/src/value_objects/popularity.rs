//! Popularity scoring
//!
//! A post's score is `views * VIEW_WEIGHT + scraps * SCRAP_WEIGHT`. The store
//! keeps it up to date by applying the same weighted delta whenever a counter
//! moves, so reads never recompute it.

/// Score added per view
pub const VIEW_WEIGHT: i32 = 5;

/// Score added per scrap
pub const SCRAP_WEIGHT: i32 = 50;

/// Minimum views for a post to be listed as a best post
pub const BEST_POST_MIN_VIEWS: i32 = 10;

/// Score implied by a pair of counters
pub fn popularity_score(views: i32, scraps: i32) -> i32 {
    views * VIEW_WEIGHT + scraps * SCRAP_WEIGHT
}

/// Signed change to a post's view and scrap counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CounterDelta {
    pub views: i32,
    pub scraps: i32,
}

impl CounterDelta {
    pub const fn new(views: i32, scraps: i32) -> Self {
        Self { views, scraps }
    }

    /// One view
    pub const fn view() -> Self {
        Self::new(1, 0)
    }

    /// One scrap added
    pub const fn scrap() -> Self {
        Self::new(0, 1)
    }

    /// One scrap removed
    pub const fn unscrap() -> Self {
        Self::new(0, -1)
    }

    /// Change in popularity score implied by this delta
    pub fn score_delta(&self) -> i32 {
        popularity_score(self.views, self.scraps)
    }

    pub fn is_zero(&self) -> bool {
        self.views == 0 && self.scraps == 0
    }
}

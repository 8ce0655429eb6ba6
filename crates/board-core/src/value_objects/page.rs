//! Offset pagination

/// Rows returned when no `take` is given
pub const DEFAULT_TAKE: i64 = 20;

/// Upper bound on `take`
pub const MAX_TAKE: i64 = 100;

/// Normalized skip/take pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub skip: i64,
    pub take: i64,
}

impl Page {
    /// Apply defaults and clamp: `skip >= 0`, `1 <= take <= MAX_TAKE`
    pub fn new(skip: Option<i64>, take: Option<i64>) -> Self {
        Self {
            skip: skip.unwrap_or(0).max(0),
            take: take.unwrap_or(DEFAULT_TAKE).clamp(1, MAX_TAKE),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

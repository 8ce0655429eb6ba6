//! Soft-delete state shared by users and posts

use chrono::{DateTime, Utc};

/// Whether a row is live or has been soft-deleted.
///
/// Stored as `is_deleted` + `deleted_at` for users and as a nullable
/// `deleted_at` for posts; both map onto this one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    #[default]
    Active,
    Deleted { at: DateTime<Utc> },
}

impl Lifecycle {
    pub fn deleted(at: DateTime<Utc>) -> Self {
        Self::Deleted { at }
    }

    /// Build from a nullable deletion timestamp
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            Some(at) => Self::Deleted { at },
            None => Self::Active,
        }
    }

    /// Build from a flag + timestamp pair. A set flag without a timestamp is
    /// still treated as deleted, stamped with the Unix epoch.
    pub fn from_flag(is_deleted: bool, deleted_at: Option<DateTime<Utc>>) -> Self {
        match (is_deleted, deleted_at) {
            (false, _) => Self::Active,
            (true, Some(at)) => Self::Deleted { at },
            (true, None) => Self::Deleted {
                at: DateTime::<Utc>::UNIX_EPOCH,
            },
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    #[inline]
    pub fn is_deleted(&self) -> bool {
        !self.is_active()
    }

    /// Deletion timestamp, if deleted
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Active => None,
            Self::Deleted { at } => Some(*at),
        }
    }
}

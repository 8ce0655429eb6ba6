//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::UserRole;

/// Domain layer errors.
///
/// `Clone` so results can be shared by batched loaders.
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Post not found: {0}")]
    PostNotFound(i64),

    #[error("Board not found: {0}")]
    BoardNotFound(i64),

    #[error("Board not found: slug {0}")]
    BoardSlugNotFound(String),

    #[error("Post {post_id} is not scrapped by user {user_id}")]
    ScrapNotFound { user_id: i64, post_id: i64 },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Search keyword too long: max {max} characters")]
    SearchKeywordTooLong { max: usize },

    #[error("Password too weak: {0}")]
    WeakPassword(String),

    #[error("Board {board_id} cannot be placed under {parent_id}: would create a cycle")]
    BoardCycle { board_id: i64, parent_id: i64 },

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Not post author")]
    NotPostAuthor,

    #[error("Not account owner")]
    NotAccountOwner,

    #[error("Requires role {0}")]
    InsufficientRole(UserRole),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Email already in use: {0}")]
    EmailAlreadyExists(String),

    #[error("Board slug already in use: {0}")]
    SlugAlreadyExists(String),

    #[error("Post already scrapped")]
    AlreadyScrapped,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::BoardNotFound(_) | Self::BoardSlugNotFound(_) => "UNKNOWN_BOARD",
            Self::ScrapNotFound { .. } => "UNKNOWN_SCRAP",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::SearchKeywordTooLong { .. } => "SEARCH_KEYWORD_TOO_LONG",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::BoardCycle { .. } => "BOARD_CYCLE",

            // Authorization
            Self::NotPostAuthor => "NOT_POST_AUTHOR",
            Self::NotAccountOwner => "NOT_ACCOUNT_OWNER",
            Self::InsufficientRole(_) => "INSUFFICIENT_ROLE",

            // Conflict
            Self::EmailAlreadyExists(_) => "EMAIL_ALREADY_EXISTS",
            Self::SlugAlreadyExists(_) => "SLUG_ALREADY_EXISTS",
            Self::AlreadyScrapped => "ALREADY_SCRAPPED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::PostNotFound(_)
                | Self::BoardNotFound(_)
                | Self::BoardSlugNotFound(_)
                | Self::ScrapNotFound { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::SearchKeywordTooLong { .. }
                | Self::WeakPassword(_)
                | Self::BoardCycle { .. }
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotPostAuthor | Self::NotAccountOwner | Self::InsufficientRole(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::EmailAlreadyExists(_) | Self::SlugAlreadyExists(_) | Self::AlreadyScrapped
        )
    }
}

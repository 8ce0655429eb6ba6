//! Request DTOs for service operations
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use board_common::auth::validate_password_strength;
use board_core::{Page, PostQuery, UserRole};
use serde::Deserialize;
use validator::{Validate, ValidationError};

// ============================================================================
// Auth Requests
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

// ============================================================================
// User Requests
// ============================================================================

/// Sign-up request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,

    #[validate(length(min = 1, max = 20, message = "Name must be 1-20 characters"))]
    pub name: String,

    #[serde(default)]
    pub user_role: UserRole,
}

/// Profile update. Absent fields are left unchanged.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: i64,

    #[validate(length(min = 1, max = 20, message = "Name must be 1-20 characters"))]
    pub name: Option<String>,

    pub subscribe_email: Option<bool>,

    pub subscribe_sms: Option<bool>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.subscribe_email.is_none() && self.subscribe_sms.is_none()
    }
}

// ============================================================================
// Board Requests
// ============================================================================

/// Board listing filter
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BoardFilter {
    pub parent_id: Option<i64>,

    pub slug: Option<String>,

    #[validate(length(min = 2, message = "Search keyword must be at least 2 characters"))]
    pub search_keyword: Option<String>,
}

/// Create board request
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardRequest {
    #[validate(length(min = 1, max = 50, message = "Board name must be 1-50 characters"))]
    pub name: String,

    #[validate(custom(function = "validate_slug"))]
    pub slug: String,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    pub parent_id: Option<i64>,

    #[serde(default)]
    pub required_role: UserRole,
}

/// Update board request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBoardRequest {
    pub id: i64,

    #[validate(length(min = 1, max = 50, message = "Board name must be 1-50 characters"))]
    pub name: Option<String>,

    #[validate(custom(function = "validate_slug"))]
    pub slug: Option<String>,

    #[validate(length(max = 500, message = "Description must be at most 500 characters"))]
    pub description: Option<String>,

    /// `Some(None)` moves the board to the top level
    #[serde(default)]
    pub parent_id: Option<Option<i64>>,

    pub required_role: Option<UserRole>,
}

// ============================================================================
// Post Requests
// ============================================================================

/// Post listing filter
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PostFilter {
    pub board_id: Option<i64>,

    pub author_id: Option<i64>,

    /// Case-insensitive substring of title or content
    pub search_keyword: Option<String>,

    #[validate(range(min = 0, message = "minViewCount must not be negative"))]
    pub min_view_count: Option<i32>,

    #[validate(range(min = 0, message = "minScrapCount must not be negative"))]
    pub min_scrap_count: Option<i32>,

    pub skip: Option<i64>,

    pub take: Option<i64>,
}

impl PostFilter {
    /// Build the repository query. A blank keyword filters nothing.
    pub fn into_query(self) -> PostQuery {
        PostQuery {
            board_id: self.board_id,
            author_id: self.author_id,
            keyword: self
                .search_keyword
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            min_view_count: self.min_view_count,
            min_scrap_count: self.min_scrap_count,
            page: Page::new(self.skip, self.take),
        }
    }
}

/// Create post request. The author is the authenticated viewer.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(length(min = 2, max = 100, message = "Title must be 2-100 characters"))]
    pub title: String,

    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    pub content: String,

    pub board_id: i64,
}

/// Update post request. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    pub id: i64,

    #[validate(length(min = 2, max = 100, message = "Title must be 2-100 characters"))]
    pub title: Option<String>,

    #[validate(length(min = 10, message = "Content must be at least 10 characters"))]
    pub content: Option<String>,

    pub board_id: Option<i64>,
}

// ============================================================================
// Custom validators
// ============================================================================

fn validate_password(password: &str) -> Result<(), ValidationError> {
    validate_password_strength(password).map_err(|e| {
        ValidationError::new("password_strength").with_message(e.to_string().into())
    })
}

/// Slugs are 1-50 lowercase ASCII letters, digits and single hyphens
fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let well_formed = (1..=50).contains(&slug.len())
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && !slug.contains("--");

    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("slug").with_message(
            "Slug must be 1-50 lowercase letters, digits or single hyphens".into(),
        ))
    }
}

//! API error type and its GraphQL error extensions
//!
//! Every resolver error leaves the API with `extensions.code`,
//! `extensions.timestamp` and whatever metadata the service attached.

use async_graphql::ErrorExtensions;
use board_core::DomainError;
use board_service::ServiceError;
use chrono::Utc;
use thiserror::Error;
use tracing::error;

/// Codes for the `extensions.code` field of a GraphQL error
pub mod code {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const CONFLICT: &str = "CONFLICT";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
}

/// API error type for consistent error responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Service(#[from] ServiceError),

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Internal server error")]
    Internal(String),
}

impl ApiError {
    /// HTTP-equivalent status of this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Service(e) => e.status_code(),
            Self::Unauthenticated => 401,
            Self::Internal(_) => 500,
        }
    }

    /// GraphQL error code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self.status_code() {
            400 | 422 => code::BAD_REQUEST,
            401 => code::UNAUTHORIZED,
            403 => code::FORBIDDEN,
            404 => code::NOT_FOUND,
            409 => code::CONFLICT,
            _ => code::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Message shown to clients. Server-side details stay in the logs.
    fn public_message(&self) -> String {
        if self.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        }
    }

    fn metadata(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Service(e) => e.metadata(),
            _ => Vec::new(),
        }
    }

    /// Create an internal error from a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::Service(err.into())
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        if self.is_server_error() {
            error!(error = %self, "Server error occurred");
        }

        let code = self.code();
        let metadata = self.metadata();
        async_graphql::Error::new(self.public_message()).extend_with(|_err, e| {
            e.set("code", code);
            e.set("timestamp", Utc::now().to_rfc3339());
            for (key, value) in metadata {
                e.set(key, value);
            }
        })
    }
}

/// Converts service results into GraphQL results carrying error extensions
pub trait ResultExt<T> {
    fn extend_err(self) -> async_graphql::Result<T>;
}

impl<T, E: Into<ApiError>> ResultExt<T> for Result<T, E> {
    fn extend_err(self) -> async_graphql::Result<T> {
        self.map_err(|e| e.into().extend())
    }
}

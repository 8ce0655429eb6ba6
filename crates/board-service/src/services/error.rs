//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use std::fmt;

use board_common::AppError;
use board_core::DomainError;
use validator::ValidationErrors;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation
    Domain(DomainError),

    /// Application error (auth, config, etc.)
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// No valid credentials were presented
    Unauthorized(String),

    /// Authenticated, but not allowed
    Forbidden(String),

    /// Invalid input, optionally tied to one input field
    BadRequest {
        message: String,
        field: Option<String>,
    },

    /// Conflict (e.g., duplicate resource)
    Conflict(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
            Self::BadRequest { message, .. } => write!(f, "Bad request: {message}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    /// Create a bad request error not tied to a field
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a bad request error for one input field
    pub fn invalid_field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::BadRequest {
            message: msg.into(),
            field: Some(field.into()),
        }
    }

    /// Create a conflict error
    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_authorization() {
                    403
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } => 404,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::BadRequest { .. } => 400,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest { .. } => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Structured details for clients: which resource, id, email or field
    /// the error is about
    pub fn metadata(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::NotFound { resource, id } => {
                vec![("resource", (*resource).to_string()), ("id", id.clone())]
            }
            Self::BadRequest {
                field: Some(field), ..
            } => vec![("field", field.clone())],
            Self::Domain(e) => domain_metadata(e),
            Self::App(AppError::Domain(e)) => domain_metadata(e),
            _ => Vec::new(),
        }
    }

    /// Server-side failures are logged; client errors are not
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }
}

fn domain_metadata(err: &DomainError) -> Vec<(&'static str, String)> {
    let resource = |name: &str, id: String| vec![("resource", name.to_string()), ("id", id)];

    match err {
        DomainError::UserNotFound(id) => resource("User", id.to_string()),
        DomainError::PostNotFound(id) => resource("Post", id.to_string()),
        DomainError::BoardNotFound(id) => resource("Board", id.to_string()),
        DomainError::BoardSlugNotFound(slug) => {
            vec![("resource", "Board".to_string()), ("slug", slug.clone())]
        }
        DomainError::ScrapNotFound { post_id, .. } => resource("Scrap", post_id.to_string()),
        DomainError::EmailAlreadyExists(email) => vec![("email", email.clone())],
        DomainError::SearchKeywordTooLong { .. } => vec![("field", "keyword".to_string())],
        DomainError::WeakPassword(_) => vec![("field", "password".to_string())],
        DomainError::SlugAlreadyExists(_) => vec![("field", "slug".to_string())],
        DomainError::BoardCycle { .. } => vec![("field", "parentId".to_string())],
        _ => Vec::new(),
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Validation(msg) => Self::bad_request(msg),
            other => Self::App(other),
        }
    }
}

impl From<ValidationErrors> for ServiceError {
    /// Reports the first failing field (alphabetically, for stable output)
    fn from(errors: ValidationErrors) -> Self {
        let first = errors
            .field_errors()
            .into_iter()
            .min_by(|a, b| a.0.cmp(&b.0))
            .and_then(|(field, errs)| errs.first().map(|e| (field.to_string(), e.clone())));

        match first {
            Some((field, err)) => {
                let message = err
                    .message
                    .map_or_else(|| format!("invalid {field}: {}", err.code), |m| m.to_string());
                Self::invalid_field(field, message)
            }
            None => Self::bad_request(errors.to_string()),
        }
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::Unauthorized(_) => AppError::MissingAuth,
            ServiceError::Forbidden(_) => AppError::InsufficientPermissions,
            ServiceError::BadRequest { message, .. } => AppError::Validation(message),
            ServiceError::Conflict(msg) => AppError::Conflict(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

//! Custom Axum extractors

mod auth;

pub use auth::{bearer_token, ViewerRejection};

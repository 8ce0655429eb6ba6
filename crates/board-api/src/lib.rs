//! # board-api
//!
//! GraphQL API server for the community board, built on Axum and
//! async-graphql.

pub mod error;
pub mod extractors;
pub mod graphql;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use graphql::{build_schema, BoardSchema};
pub use server::{create_app, create_app_state, run, serve};
pub use state::AppState;

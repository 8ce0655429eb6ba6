//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{graphql, health};
use crate::state::AppState;

/// The GraphQL endpoint, with GraphiQL on GET when `playground` is set
pub fn graphql_routes(playground: bool) -> Router<AppState> {
    let endpoint = post(graphql::graphql_handler);
    let endpoint = if playground {
        endpoint.get(graphql::graphiql)
    } else {
        endpoint
    };

    Router::new().route("/graphql", endpoint)
}

/// Health check routes (kept apart so rate limiting does not apply)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

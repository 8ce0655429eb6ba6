//! GraphQL endpoint
//!
//! POST /graphql executes a request; GET /graphql serves GraphiQL when the
//! playground is enabled.

use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{extract::State, response::Html};

use crate::graphql::{request_data, Viewer};
use crate::state::AppState;

/// Execute one GraphQL request with its own viewer and loaders
pub async fn graphql_handler(
    State(state): State<AppState>,
    viewer: Viewer,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let (viewer, loaders) = request_data(state.service_context(), viewer);
    let req = req.into_inner().data(viewer).data(loaders);
    state.schema().execute(req).await.into()
}

/// GraphiQL IDE
pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

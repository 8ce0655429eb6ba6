//! Authentication extractor
//!
//! Resolves the bearer token on the request into a [`Viewer`]. A missing or
//! unusable token leaves the viewer anonymous; operations that need a
//! signed-in user reject it later. Any other failure while resolving the
//! token rejects the request.

use async_graphql::{ErrorExtensions, Pos};
use async_graphql_axum::GraphQLResponse;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use board_service::AuthService;
use tracing::{debug, error};

use crate::error::ApiError;
use crate::graphql::Viewer;
use crate::state::AppState;

/// The bearer token on the request, if any
pub async fn bearer_token<S: Send + Sync>(parts: &mut Parts, state: &S) -> Option<String> {
    TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
        .await
        .ok()
        .map(|TypedHeader(Authorization(bearer))| bearer.token().to_string())
}

/// The viewer could not be resolved. Rendered as a GraphQL error response.
#[derive(Debug)]
pub struct ViewerRejection(pub ApiError);

impl IntoResponse for ViewerRejection {
    fn into_response(self) -> Response {
        let error = self.0.extend().into_server_error(Pos::default());
        GraphQLResponse::from(async_graphql::Response::from_errors(vec![error])).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ViewerRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts, state).await else {
            return Ok(Viewer::anonymous());
        };

        let app_state = AppState::from_ref(state);
        match AuthService::new(app_state.service_context())
            .authenticate(&token)
            .await
        {
            Ok(user) => Ok(Viewer::signed_in(user)),
            Err(e) if e.status_code() == 401 => {
                debug!(error = %e, "Ignoring unusable access token");
                Ok(Viewer::anonymous())
            }
            Err(e) => {
                error!(error = %e, "Failed to resolve access token");
                Err(ViewerRejection(e.into()))
            }
        }
    }
}

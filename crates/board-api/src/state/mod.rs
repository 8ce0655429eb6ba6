//! Application state
//!
//! Holds the shared state for the Axum application: the service context, the
//! GraphQL schema built over it, the database pool for readiness checks and
//! the configuration.

use std::sync::Arc;

use board_common::AppConfig;
use board_db::PgPool;
use board_service::ServiceContext;

use crate::graphql::{build_schema, BoardSchema};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    schema: BoardSchema,
    pool: PgPool,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState, building the schema from `config.graphql`
    pub fn new(service_context: Arc<ServiceContext>, pool: PgPool, config: AppConfig) -> Self {
        let schema = build_schema(service_context.clone(), &config.graphql);
        Self {
            service_context,
            schema,
            pool,
            config: Arc::new(config),
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    pub fn schema(&self) -> &BoardSchema {
        &self.schema
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .finish()
    }
}

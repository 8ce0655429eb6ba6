//! Service context - dependency container for services
//!
//! Holds all repositories, auth helpers and the background task spawner.

use std::sync::Arc;

use board_common::auth::{JwtService, PasswordService};
use board_core::traits::{BoardRepository, PostRepository, ScrapRepository, UserRepository};

use super::error::{ServiceError, ServiceResult};
use crate::tasks::{TaskSpawner, TokioSpawner};

/// Service context containing all dependencies
///
/// This is the main dependency container that gets passed to all services.
/// It is cheap to clone; every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    user_repo: Arc<dyn UserRepository>,
    board_repo: Arc<dyn BoardRepository>,
    post_repo: Arc<dyn PostRepository>,
    scrap_repo: Arc<dyn ScrapRepository>,

    // Auth
    jwt_service: Arc<JwtService>,
    password_service: PasswordService,

    // Detached counter updates
    spawner: Arc<dyn TaskSpawner>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        board_repo: Arc<dyn BoardRepository>,
        post_repo: Arc<dyn PostRepository>,
        scrap_repo: Arc<dyn ScrapRepository>,
        jwt_service: Arc<JwtService>,
        spawner: Arc<dyn TaskSpawner>,
    ) -> Self {
        Self {
            user_repo,
            board_repo,
            post_repo,
            scrap_repo,
            jwt_service,
            password_service: PasswordService::new(),
            spawner,
        }
    }

    // === Repositories ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the board repository
    pub fn board_repo(&self) -> &dyn BoardRepository {
        self.board_repo.as_ref()
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Owned handle to the post repository, for work that outlives the request
    pub fn shared_post_repo(&self) -> Arc<dyn PostRepository> {
        Arc::clone(&self.post_repo)
    }

    /// Get the scrap repository
    pub fn scrap_repo(&self) -> &dyn ScrapRepository {
        self.scrap_repo.as_ref()
    }

    /// Owned repository handles for request-scoped batch loaders
    pub fn shared_repos(&self) -> SharedRepos {
        SharedRepos {
            users: Arc::clone(&self.user_repo),
            boards: Arc::clone(&self.board_repo),
            posts: Arc::clone(&self.post_repo),
            scraps: Arc::clone(&self.scrap_repo),
        }
    }

    // === Services ===

    /// Get the JWT service
    pub fn jwt_service(&self) -> &JwtService {
        self.jwt_service.as_ref()
    }

    /// Get the password service
    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    /// Get the background task spawner
    pub fn spawner(&self) -> &dyn TaskSpawner {
        self.spawner.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("jwt_service", &"JwtService")
            .finish()
    }
}

/// Owned repository handles, detached from the context lifetime
#[derive(Clone)]
pub struct SharedRepos {
    pub users: Arc<dyn UserRepository>,
    pub boards: Arc<dyn BoardRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub scraps: Arc<dyn ScrapRepository>,
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    board_repo: Option<Arc<dyn BoardRepository>>,
    post_repo: Option<Arc<dyn PostRepository>>,
    scrap_repo: Option<Arc<dyn ScrapRepository>>,
    jwt_service: Option<Arc<JwtService>>,
    spawner: Option<Arc<dyn TaskSpawner>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn board_repo(mut self, repo: Arc<dyn BoardRepository>) -> Self {
        self.board_repo = Some(repo);
        self
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn scrap_repo(mut self, repo: Arc<dyn ScrapRepository>) -> Self {
        self.scrap_repo = Some(repo);
        self
    }

    pub fn jwt_service(mut self, service: Arc<JwtService>) -> Self {
        self.jwt_service = Some(service);
        self
    }

    /// Override the task spawner. Defaults to [`TokioSpawner`].
    pub fn spawner(mut self, spawner: Arc<dyn TaskSpawner>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        let missing = |name: &str| ServiceError::internal(format!("{name} is required"));

        Ok(ServiceContext::new(
            self.user_repo.ok_or_else(|| missing("user_repo"))?,
            self.board_repo.ok_or_else(|| missing("board_repo"))?,
            self.post_repo.ok_or_else(|| missing("post_repo"))?,
            self.scrap_repo.ok_or_else(|| missing("scrap_repo"))?,
            self.jwt_service.ok_or_else(|| missing("jwt_service"))?,
            self.spawner.unwrap_or_else(|| Arc::new(TokioSpawner)),
        ))
    }
}

//! Authentication service
//!
//! Handles login, token refresh and resolving bearer tokens to users.

use board_common::auth::TokenSubject;
use board_common::AppError;
use board_core::User;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{AuthResponse, LoginRequest, RefreshTokenRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Login with email and password
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;

        // Find user by email
        let user = self
            .ctx
            .user_repo()
            .find_active_by_email(&request.email)
            .await?
            .ok_or_else(|| {
                warn!(email = %request.email, "Login failed: user not found");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        // Get password hash
        let password_hash = self
            .ctx
            .user_repo()
            .get_password_hash(user.id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user.id, "Login failed: no password hash");
                ServiceError::App(AppError::InvalidCredentials)
            })?;

        // Verify password
        self.ctx
            .password_service()
            .verify_or_error(&request.password, &password_hash)
            .inspect_err(|_| warn!(user_id = %user.id, "Login failed: invalid password"))?;

        info!(user_id = %user.id, "User logged in successfully");

        self.issue_tokens(user)
    }

    /// Exchange a refresh token for a new token pair
    #[instrument(skip(self, request))]
    pub async fn refresh_tokens(
        &self,
        request: RefreshTokenRequest,
    ) -> ServiceResult<AuthResponse> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_refresh_token(&request.refresh_token)
            .map_err(|e| ServiceError::unauthorized(e.to_string()))?;
        let user_id = claims
            .user_id()
            .map_err(|e| ServiceError::unauthorized(e.to_string()))?;

        // Deleted accounts cannot refresh
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("account is no longer active"))?;

        info!(user_id = %user.id, "Tokens refreshed successfully");

        self.issue_tokens(user)
    }

    /// Resolve an access token to the active user it was issued for
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<User> {
        let claims = self
            .ctx
            .jwt_service()
            .validate_access_token(token)
            .map_err(|e| ServiceError::unauthorized(e.to_string()))?;
        let user_id = claims
            .user_id()
            .map_err(|e| ServiceError::unauthorized(e.to_string()))?;

        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::unauthorized("account is no longer active"))
    }

    fn issue_tokens(&self, user: User) -> ServiceResult<AuthResponse> {
        let tokens = self
            .ctx
            .jwt_service()
            .generate_token_pair(TokenSubject {
                user_id: user.id,
                email: &user.email,
                role: user.role,
            })
            .map_err(|e| ServiceError::internal(e.to_string()))?;

        Ok(AuthResponse::new(user, tokens))
    }
}

#[cfg(test)]
mod tests {
    use board_core::traits::UserRepository;
    use board_core::UserRole;

    use super::*;
    use crate::testing::{TestContext, TEST_PASSWORD};

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_login_issues_tokens_for_the_user() {
        let t = TestContext::new();
        let user = t.seed_user("reader@example.com", UserRole::User).await;

        let auth = AuthService::new(&t.ctx)
            .login(login("reader@example.com", TEST_PASSWORD))
            .await
            .unwrap();

        assert_eq!(auth.user.id, user.id);
        assert_eq!(auth.expires_in, 3600);
        let claims = TestContext::jwt_service()
            .validate_access_token(&auth.access_token)
            .unwrap();
        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.role, UserRole::User);
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password_and_unknown_email() {
        let t = TestContext::new();
        t.seed_user("reader@example.com", UserRole::User).await;
        let service = AuthService::new(&t.ctx);

        let err = service
            .login(login("reader@example.com", "Wr0ngpass!"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);

        let err = service
            .login(login("nobody@example.com", TEST_PASSWORD))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_refresh_and_authenticate() {
        let t = TestContext::new();
        let user = t.seed_user("reader@example.com", UserRole::Admin).await;
        let service = AuthService::new(&t.ctx);
        let auth = service
            .login(login("reader@example.com", TEST_PASSWORD))
            .await
            .unwrap();

        let refreshed = service
            .refresh_tokens(RefreshTokenRequest {
                refresh_token: auth.refresh_token.clone(),
            })
            .await
            .unwrap();
        assert_eq!(refreshed.user.id, user.id);

        let me = service.authenticate(&refreshed.access_token).await.unwrap();
        assert_eq!(me.id, user.id);

        // Token kinds are not interchangeable
        let err = service.authenticate(&auth.refresh_token).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
    }

    #[tokio::test]
    async fn test_deleted_user_cannot_authenticate() {
        let t = TestContext::new();
        let user = t.seed_user("gone@example.com", UserRole::User).await;
        let service = AuthService::new(&t.ctx);
        let auth = service
            .login(login("gone@example.com", TEST_PASSWORD))
            .await
            .unwrap();

        t.users
            .soft_delete(user.id, chrono::Utc::now())
            .await
            .unwrap();

        let err = service.authenticate(&auth.access_token).await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
        let err = service
            .refresh_tokens(RefreshTokenRequest {
                refresh_token: auth.refresh_token,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized(_)));
    }
}

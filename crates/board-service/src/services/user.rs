//! User service
//!
//! Handles sign-up, profile updates and account deletion.

use board_core::{DomainError, User};
use chrono::Utc;
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{CreateUserRequest, UpdateUserRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get an active user by ID
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: i64) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id))
    }

    /// All active users, newest first
    #[instrument(skip(self))]
    pub async fn list_active_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.ctx.user_repo().list_active().await?)
    }

    /// Register a new account.
    ///
    /// Only an admin may create another admin. An email held by a deleted
    /// account can be registered again.
    #[instrument(skip(self, viewer, request), fields(email = %request.email))]
    pub async fn create_user(
        &self,
        viewer: Option<&User>,
        request: CreateUserRequest,
    ) -> ServiceResult<User> {
        request.validate()?;

        if request.user_role.is_admin() && !viewer.is_some_and(User::is_admin) {
            return Err(DomainError::InsufficientRole(request.user_role).into());
        }

        if self
            .ctx
            .user_repo()
            .active_email_exists(&request.email)
            .await?
        {
            return Err(DomainError::EmailAlreadyExists(request.email).into());
        }

        let password_hash = self.ctx.password_service().hash(&request.password)?;

        // The partial unique index still guards a concurrent sign-up
        let user = self
            .ctx
            .user_repo()
            .create(
                &User::new(request.email, request.name, request.user_role),
                &password_hash,
            )
            .await?;

        info!(user_id = %user.id, "User registered successfully");
        Ok(user)
    }

    /// Update a profile. Allowed for the account owner or an admin.
    #[instrument(skip(self, viewer, request), fields(user_id = %request.id))]
    pub async fn update_user(&self, viewer: &User, request: UpdateUserRequest) -> ServiceResult<User> {
        request.validate()?;
        Self::ensure_owner_or_admin(viewer, request.id)?;

        let mut user = self.get_user(request.id).await?;
        if request.is_empty() {
            return Ok(user);
        }

        if let Some(name) = request.name {
            user.set_name(name);
        }
        if let Some(subscribe) = request.subscribe_email {
            user.subscribe_email = subscribe;
        }
        if let Some(subscribe) = request.subscribe_sms {
            user.subscribe_sms = subscribe;
        }
        user.updated_at = Utc::now();

        self.ctx.user_repo().update(&user).await?;
        info!(user_id = %user.id, "User profile updated");

        Ok(user)
    }

    /// Soft-delete an account. Allowed for the account owner or an admin.
    ///
    /// Returns the account as it looks after deletion.
    #[instrument(skip(self, viewer))]
    pub async fn delete_user(&self, viewer: &User, user_id: i64) -> ServiceResult<User> {
        Self::ensure_owner_or_admin(viewer, user_id)?;

        let mut user = self.get_user(user_id).await?;
        let now = Utc::now();
        self.ctx.user_repo().soft_delete(user_id, now).await?;

        user.soft_delete(now);

        info!(user_id = %user_id, "User account deleted");
        Ok(user)
    }

    fn ensure_owner_or_admin(viewer: &User, user_id: i64) -> ServiceResult<()> {
        if viewer.id == user_id || viewer.is_admin() {
            Ok(())
        } else {
            Err(DomainError::NotAccountOwner.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use board_core::traits::UserRepository;
    use board_core::UserRole;

    use super::*;
    use crate::testing::{TestContext, TEST_PASSWORD};

    fn sign_up(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            password: TEST_PASSWORD.to_string(),
            name: "Reader".to_string(),
            user_role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_create_user_hashes_password() {
        let t = TestContext::new();
        let user = UserService::new(&t.ctx)
            .create_user(None, sign_up("new@example.com"))
            .await
            .unwrap();

        assert!(user.id > 0);
        assert_eq!(user.role, UserRole::User);
        let hash = t.users.get_password_hash(user.id).await.unwrap().unwrap();
        assert_ne!(hash, TEST_PASSWORD);
        assert!(hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_duplicate_active_email_conflicts() {
        let t = TestContext::new();
        let service = UserService::new(&t.ctx);
        service.create_user(None, sign_up("dup@example.com")).await.unwrap();

        let err = service
            .create_user(None, sign_up("dup@example.com"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
        assert_eq!(err.metadata(), vec![("email", "dup@example.com".to_string())]);
    }

    #[tokio::test]
    async fn test_deleted_email_can_be_reused() {
        let t = TestContext::new();
        let service = UserService::new(&t.ctx);
        let first = service.create_user(None, sign_up("back@example.com")).await.unwrap();

        let deleted = service.delete_user(&first, first.id).await.unwrap();
        assert!(deleted.lifecycle.is_deleted());
        assert!(deleted.lifecycle.deleted_at().is_some());

        let second = service.create_user(None, sign_up("back@example.com")).await.unwrap();
        assert_ne!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_deleted_user_leaves_listings_but_stays_referenceable() {
        let t = TestContext::new();
        let service = UserService::new(&t.ctx);
        let keep = t.seed_user("keep@example.com", UserRole::User).await;
        let gone = t.seed_user("gone@example.com", UserRole::User).await;

        service.delete_user(&gone, gone.id).await.unwrap();

        let active: Vec<i64> = service
            .list_active_users()
            .await
            .unwrap()
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(active, vec![keep.id]);
        assert!(service.get_user(gone.id).await.unwrap_err().status_code() == 404);

        let referenced = t.users.find_by_ids(&[gone.id]).await.unwrap();
        assert_eq!(referenced.len(), 1);
        assert!(referenced[0].lifecycle.is_deleted());
    }

    #[tokio::test]
    async fn test_weak_password_is_bad_request() {
        let t = TestContext::new();
        let mut request = sign_up("weak@example.com");
        request.password = "alllowercase".to_string();

        let err = UserService::new(&t.ctx)
            .create_user(None, request)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.metadata(), vec![("field", "password".to_string())]);
    }

    #[tokio::test]
    async fn test_only_admin_creates_admin() {
        let t = TestContext::new();
        let service = UserService::new(&t.ctx);
        let mut request = sign_up("boss@example.com");
        request.user_role = UserRole::Admin;

        let err = service.create_user(None, request.clone()).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        let admin = t.seed_user("admin@example.com", UserRole::Admin).await;
        let created = service.create_user(Some(&admin), request).await.unwrap();
        assert!(created.is_admin());
    }

    #[tokio::test]
    async fn test_update_requires_owner_or_admin() {
        let t = TestContext::new();
        let service = UserService::new(&t.ctx);
        let alice = t.seed_user("alice@example.com", UserRole::User).await;
        let bob = t.seed_user("bob@example.com", UserRole::User).await;
        let admin = t.seed_user("admin@example.com", UserRole::Admin).await;

        let rename = |name: &str| UpdateUserRequest {
            id: alice.id,
            name: Some(name.to_string()),
            subscribe_email: None,
            subscribe_sms: Some(true),
        };

        let err = service.update_user(&bob, rename("Mallory")).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        let updated = service.update_user(&alice, rename("Alice")).await.unwrap();
        assert_eq!(updated.name, "Alice");
        assert!(updated.subscribe_sms);

        let updated = service.update_user(&admin, rename("Moderated")).await.unwrap();
        assert_eq!(updated.name, "Moderated");
        assert_eq!(t.users.raw(alice.id).unwrap().name, "Moderated");

        let err = service.delete_user(&bob, alice.id).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
    }
}

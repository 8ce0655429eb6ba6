use async_graphql::{Context, Object};
use chrono::{DateTime, Utc};

use super::UserRole;
use crate::graphql::viewer::{visibility_of, Viewer, USER_FIELD_VISIBILITY};

/// A member of the community
#[derive(Debug, Clone)]
pub struct User(pub board_core::User);

impl User {
    /// `value` if the viewer may see `field`, null otherwise
    fn gated<T>(&self, ctx: &Context<'_>, field: &str, value: T) -> Option<T> {
        let visibility = visibility_of(USER_FIELD_VISIBILITY, field);
        Viewer::of(ctx)
            .can_see(visibility, self.0.id)
            .then_some(value)
    }
}

impl From<board_core::User> for User {
    fn from(user: board_core::User) -> Self {
        Self(user)
    }
}

#[Object]
impl User {
    async fn id(&self) -> i64 {
        self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn user_role(&self) -> UserRole {
        self.0.role.into()
    }

    /// Visible to the user themself and to admins
    async fn email(&self, ctx: &Context<'_>) -> Option<&str> {
        self.gated(ctx, "email", self.0.email.as_str())
    }

    /// Visible to the user themself and to admins
    async fn subscribe_email(&self, ctx: &Context<'_>) -> Option<bool> {
        self.gated(ctx, "subscribeEmail", self.0.subscribe_email)
    }

    /// Visible to the user themself and to admins
    async fn subscribe_sms(&self, ctx: &Context<'_>) -> Option<bool> {
        self.gated(ctx, "subscribeSms", self.0.subscribe_sms)
    }

    /// Visible to admins
    async fn is_deleted(&self, ctx: &Context<'_>) -> Option<bool> {
        self.gated(ctx, "isDeleted", self.0.lifecycle.is_deleted())
    }

    /// Visible to admins
    async fn deleted_at(&self, ctx: &Context<'_>) -> Option<DateTime<Utc>> {
        self.gated(ctx, "deletedAt", self.0.lifecycle.deleted_at())
            .flatten()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

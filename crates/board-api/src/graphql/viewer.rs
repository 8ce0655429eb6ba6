//! The requesting user and the per-field visibility rules applied to them

use async_graphql::Context;
use board_core::{User, UserRole};

use crate::error::ApiError;

static ANONYMOUS: Viewer = Viewer { user: None };

/// Who is making the request. Attached to every GraphQL request by the
/// HTTP handler.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    user: Option<User>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// The viewer attached to `ctx`, anonymous if none was attached
    pub fn of<'a>(ctx: &Context<'a>) -> &'a Viewer {
        ctx.data_opt::<Viewer>().unwrap_or(&ANONYMOUS)
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Role used for role-gated reads. Anonymous viewers read as `USER`.
    pub fn role(&self) -> UserRole {
        self.user.as_ref().map_or(UserRole::User, |u| u.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role().is_admin()
    }

    /// The signed-in user, or `UNAUTHORIZED`
    pub fn require(&self) -> Result<&User, ApiError> {
        self.user.as_ref().ok_or(ApiError::Unauthenticated)
    }

    /// Whether a field with `visibility` on an object owned by `owner_id`
    /// may be shown to this viewer
    pub fn can_see(&self, visibility: Visibility, owner_id: i64) -> bool {
        match visibility {
            Visibility::Public => true,
            Visibility::OwnerOrAdmin => self
                .user
                .as_ref()
                .is_some_and(|u| u.id == owner_id || u.is_admin()),
            Visibility::Admin => self.is_admin(),
        }
    }
}

/// Who may see a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    OwnerOrAdmin,
    Admin,
}

/// Field visibility of the `User` type. Fields not listed are public.
/// Hidden fields resolve to null.
pub const USER_FIELD_VISIBILITY: &[(&str, Visibility)] = &[
    ("email", Visibility::OwnerOrAdmin),
    ("subscribeEmail", Visibility::OwnerOrAdmin),
    ("subscribeSms", Visibility::OwnerOrAdmin),
    ("isDeleted", Visibility::Admin),
    ("deletedAt", Visibility::Admin),
];

/// Look up a field in a visibility table
pub fn visibility_of(table: &[(&str, Visibility)], field: &str) -> Visibility {
    table
        .iter()
        .find(|(name, _)| *name == field)
        .map_or(Visibility::Public, |(_, v)| *v)
}

//! User entity - represents a registered board member

use chrono::{DateTime, Utc};

use crate::value_objects::{Lifecycle, UserRole};

/// User account.
///
/// The password hash is never part of the entity; repositories expose it
/// separately for authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: UserRole,
    pub subscribe_email: bool,
    pub subscribe_sms: bool,
    pub lifecycle: Lifecycle,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new active user. The id is assigned by the store on insert.
    pub fn new(email: String, name: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            email,
            name,
            role,
            subscribe_email: false,
            subscribe_sms: false,
            lifecycle: Lifecycle::Active,
            created_at: now,
            updated_at: now,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.lifecycle.is_active()
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Rename the user
    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Mark the user as deleted. Already-deleted users keep their original timestamp.
    pub fn soft_delete(&mut self, at: DateTime<Utc>) {
        if self.lifecycle.is_active() {
            self.lifecycle = Lifecycle::deleted(at);
            self.updated_at = at;
        }
    }
}

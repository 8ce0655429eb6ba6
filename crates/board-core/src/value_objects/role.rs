//! User roles

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Access level of a user. Boards carry the level required to see them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    User,
    Admin,
}

impl UserRole {
    /// Board roles visible to a viewer holding this role
    pub fn allowed_roles(self) -> &'static [UserRole] {
        match self {
            Self::Admin => &[Self::User, Self::Admin],
            Self::User => &[Self::User],
        }
    }

    #[inline]
    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }

    /// Database / wire representation
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            other => Err(DomainError::ValidationError(format!(
                "unknown user role: {other}"
            ))),
        }
    }
}

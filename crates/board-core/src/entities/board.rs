//! Board entity - a category posts are written into

use chrono::{DateTime, Utc};

use crate::value_objects::UserRole;

/// Board. Boards form a tree through `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub required_role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Board {
    pub fn new(name: String, slug: String, required_role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            name,
            slug,
            description: None,
            parent_id: None,
            required_role,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if this board has no parent
    #[inline]
    pub fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Check if a viewer with `role` may see this board
    pub fn is_visible_to(&self, role: UserRole) -> bool {
        role.allowed_roles().contains(&self.required_role)
    }
}

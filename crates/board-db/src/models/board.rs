//! Board database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for boards table
#[derive(Debug, Clone, FromRow)]
pub struct BoardModel {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub required_role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

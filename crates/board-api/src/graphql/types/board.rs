use async_graphql::{Context, Object, Result};
use chrono::{DateTime, Utc};

use super::UserRole;
use crate::error::ResultExt;
use crate::graphql::{loaders, viewer::Viewer};

/// A board posts are written to. Boards nest through `parentId`.
#[derive(Debug, Clone)]
pub struct Board(pub board_core::Board);

impl From<board_core::Board> for Board {
    fn from(board: board_core::Board) -> Self {
        Self(board)
    }
}

#[Object]
impl Board {
    async fn id(&self) -> i64 {
        self.0.id
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn slug(&self) -> &str {
        &self.0.slug
    }

    async fn description(&self) -> Option<&str> {
        self.0.description.as_deref()
    }

    async fn parent_id(&self) -> Option<i64> {
        self.0.parent_id
    }

    async fn required_role(&self) -> UserRole {
        self.0.required_role.into()
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    /// Null for top-level boards and for parents the viewer may not see
    async fn parent_board(&self, ctx: &Context<'_>) -> Result<Option<Board>> {
        let Some(parent_id) = self.0.parent_id else {
            return Ok(None);
        };

        let role = Viewer::of(ctx).role();
        Ok(loaders(ctx)?
            .board(parent_id)
            .await
            .extend_err()?
            .filter(|b| b.is_visible_to(role))
            .map(Board))
    }

    /// Direct children visible to the viewer, ordered by ID
    async fn child_boards(&self, ctx: &Context<'_>) -> Result<Vec<Board>> {
        let role = Viewer::of(ctx).role();
        Ok(loaders(ctx)?
            .child_boards(self.0.id)
            .await
            .extend_err()?
            .into_iter()
            .filter(|b| b.is_visible_to(role))
            .map(Board)
            .collect())
    }

    /// Number of live posts on this board
    async fn post_count(&self, ctx: &Context<'_>) -> Result<i64> {
        loaders(ctx)?.post_count(self.0.id).await.extend_err()
    }
}

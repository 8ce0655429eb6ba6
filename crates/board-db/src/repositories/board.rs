//! PostgreSQL implementation of BoardRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use board_core::entities::Board;
use board_core::error::DomainError;
use board_core::traits::{BoardQuery, BoardRepository, RepoResult};

use crate::models::BoardModel;

use super::error::{like_pattern, map_db_error, map_unique_violation, try_map_all};

const BOARD_COLUMNS: &str =
    "id, name, slug, description, parent_id, required_role, created_at, updated_at";

/// Advisory lock key serializing changes to the board hierarchy
const BOARD_TREE_LOCK: i64 = 0x626f_6172_6473;

/// PostgreSQL implementation of BoardRepository
#[derive(Clone)]
pub struct PgBoardRepository {
    pool: PgPool,
}

impl PgBoardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BoardRepository for PgBoardRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Board>> {
        let result = sqlx::query_as::<_, BoardModel>(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Board::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Board>> {
        let result = sqlx::query_as::<_, BoardModel>(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Board::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<Board>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, BoardModel>(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE id = ANY($1)"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        try_map_all(rows)
    }

    #[instrument(skip(self))]
    async fn find_children(&self, parent_ids: &[i64]) -> RepoResult<Vec<Board>> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, BoardModel>(&format!(
            "SELECT {BOARD_COLUMNS} FROM boards WHERE parent_id = ANY($1) ORDER BY id"
        ))
        .bind(parent_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        try_map_all(rows)
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &BoardQuery) -> RepoResult<Vec<Board>> {
        let roles: Vec<&str> = query.roles.iter().map(|r| r.as_str()).collect();

        let rows = sqlx::query_as::<_, BoardModel>(&format!(
            r"
            SELECT {BOARD_COLUMNS}
            FROM boards
            WHERE required_role = ANY($1)
              AND ($2::BIGINT IS NULL OR parent_id = $2)
              AND ($3::TEXT IS NULL OR slug = $3)
              AND ($4::TEXT IS NULL OR name ILIKE $4)
            ORDER BY id
            "
        ))
        .bind(&roles)
        .bind(query.parent_id)
        .bind(query.slug.as_deref())
        .bind(query.name_contains.as_deref().map(like_pattern))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        try_map_all(rows)
    }

    #[instrument(skip(self))]
    async fn create(&self, board: &Board) -> RepoResult<Board> {
        let model = sqlx::query_as::<_, BoardModel>(&format!(
            r"
            INSERT INTO boards (name, slug, description, parent_id, required_role, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {BOARD_COLUMNS}
            "
        ))
        .bind(&board.name)
        .bind(&board.slug)
        .bind(&board.description)
        .bind(board.parent_id)
        .bind(board.required_role.as_str())
        .bind(board.created_at)
        .bind(board.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, board))?;

        Board::try_from(model)
    }

    /// Re-parenting takes a transaction-scoped advisory lock and checks the
    /// new parent's ancestry in the same transaction, so concurrent moves
    /// cannot together close a cycle.
    #[instrument(skip(self))]
    async fn update(&self, board: &Board) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        if let Some(parent_id) = board.parent_id {
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(BOARD_TREE_LOCK)
                .execute(&mut *tx)
                .await
                .map_err(map_db_error)?;

            let closes_cycle = sqlx::query_scalar::<_, bool>(
                r"
                WITH RECURSIVE ancestors AS (
                    SELECT id, parent_id FROM boards WHERE id = $2
                    UNION
                    SELECT b.id, b.parent_id
                    FROM boards b
                    JOIN ancestors a ON b.id = a.parent_id
                )
                SELECT EXISTS (SELECT 1 FROM ancestors WHERE id = $1)
                ",
            )
            .bind(board.id)
            .bind(parent_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

            if closes_cycle {
                return Err(DomainError::BoardCycle {
                    board_id: board.id,
                    parent_id,
                });
            }
        }

        let result = sqlx::query(
            r"
            UPDATE boards
            SET name = $2, slug = $3, description = $4, parent_id = $5, required_role = $6,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(board.id)
        .bind(&board.name)
        .bind(&board.slug)
        .bind(&board.description)
        .bind(board.parent_id)
        .bind(board.required_role.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, board))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::BoardNotFound(board.id));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}

/// A dangling parent reference or a taken slug become domain errors
fn map_write_error(e: sqlx::Error, board: &Board) -> DomainError {
    let dangling_parent = e
        .as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation());

    match board.parent_id {
        Some(parent_id) if dangling_parent => DomainError::BoardNotFound(parent_id),
        _ => map_unique_violation(e, || DomainError::SlugAlreadyExists(board.slug.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgBoardRepository>();
    }
}

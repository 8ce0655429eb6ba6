//! PostgreSQL implementation of ScrapRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use board_core::entities::Scrap;
use board_core::error::DomainError;
use board_core::traits::{RepoResult, ScrapRepository};

use super::error::map_db_error;

/// PostgreSQL implementation of ScrapRepository
#[derive(Clone)]
pub struct PgScrapRepository {
    pool: PgPool,
}

impl PgScrapRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScrapRepository for PgScrapRepository {
    #[instrument(skip(self))]
    async fn create(&self, scrap: &Scrap) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO scraps (user_id, post_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, post_id) DO NOTHING
            ",
        )
        .bind(scrap.user_id)
        .bind(scrap.post_id)
        .bind(scrap.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db_err| db_err.is_foreign_key_violation())
            {
                DomainError::PostNotFound(scrap.post_id)
            } else {
                map_db_error(e)
            }
        })?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn delete(&self, user_id: i64, post_id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM scraps WHERE user_id = $1 AND post_id = $2
            ",
        )
        .bind(user_id)
        .bind(post_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip(self))]
    async fn exists(&self, user_id: i64, post_id: i64) -> RepoResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS(SELECT 1 FROM scraps WHERE user_id = $1 AND post_id = $2)
            ",
        )
        .bind(user_id)
        .bind(post_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self), fields(count = post_ids.len()))]
    async fn scrapped_post_ids(&self, user_id: i64, post_ids: &[i64]) -> RepoResult<Vec<i64>> {
        if post_ids.is_empty() {
            return Ok(Vec::new());
        }

        sqlx::query_scalar::<_, i64>(
            r"
            SELECT post_id FROM scraps WHERE user_id = $1 AND post_id = ANY($2)
            ",
        )
        .bind(user_id)
        .bind(post_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)
    }
}

//! PostgreSQL implementation of PostRepository
//!
//! All reads filter `deleted_at IS NULL` in SQL. Counter updates are single
//! `UPDATE` statements applying a delta, never read-modify-write.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use board_core::entities::{Post, RankedPost};
use board_core::error::DomainError;
use board_core::traits::{PostOrder, PostQuery, PostRepository, RepoResult};
use board_core::value_objects::{CounterDelta, Page, SearchKeyword, SCRAP_WEIGHT, VIEW_WEIGHT};

use crate::models::{PostModel, RankedPostModel};

use super::error::{like_pattern, map_db_error};

const POST_COLUMNS: &str = "id, title, content, view_count, scrap_count, search_count, \
                            popularity_score, author_id, board_id, created_at, updated_at, deleted_at";

/// Document searched by full text; matches the GIN index expression
const SEARCH_DOCUMENT: &str =
    "to_tsvector('simple', COALESCE(title, '') || ' ' || COALESCE(content, ''))";

/// PostgreSQL implementation of PostRepository
#[derive(Clone)]
pub struct PgPostRepository {
    pool: PgPool,
}

impl PgPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostRepository for PgPostRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Post>> {
        let result = sqlx::query_as::<_, PostModel>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Post::from))
    }

    #[instrument(skip(self))]
    async fn list(&self, query: &PostQuery) -> RepoResult<Vec<Post>> {
        // A CASE that is NULL for every row leaves the secondary keys in charge
        let by_views = query.order() == PostOrder::ViewCountDesc;

        let rows = sqlx::query_as::<_, PostModel>(&format!(
            r"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE deleted_at IS NULL
              AND ($1::BIGINT IS NULL OR board_id = $1)
              AND ($2::BIGINT IS NULL OR author_id = $2)
              AND ($3::TEXT IS NULL OR title ILIKE $3 OR content ILIKE $3)
              AND ($4::INT IS NULL OR view_count >= $4)
              AND ($5::INT IS NULL OR scrap_count >= $5)
            ORDER BY CASE WHEN $6 THEN view_count END DESC NULLS LAST,
                     created_at DESC,
                     id DESC
            LIMIT $7 OFFSET $8
            "
        ))
        .bind(query.board_id)
        .bind(query.author_id)
        .bind(query.keyword.as_deref().map(like_pattern))
        .bind(query.min_view_count)
        .bind(query.min_scrap_count)
        .bind(by_views)
        .bind(query.page.take)
        .bind(query.page.skip)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_best(&self, min_views: i32, limit: i64) -> RepoResult<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostModel>(&format!(
            r"
            SELECT {POST_COLUMNS}
            FROM posts
            WHERE deleted_at IS NULL AND view_count >= $1
            ORDER BY popularity_score DESC, created_at DESC
            LIMIT $2
            "
        ))
        .bind(min_views)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(Post::from).collect())
    }

    #[instrument(skip(self))]
    async fn search(&self, keyword: &SearchKeyword, page: Page) -> RepoResult<Vec<RankedPost>> {
        let rows = sqlx::query_as::<_, RankedPostModel>(&format!(
            r"
            SELECT {POST_COLUMNS},
                   ts_rank({SEARCH_DOCUMENT}, plainto_tsquery('simple', $1)) AS rank
            FROM posts
            WHERE deleted_at IS NULL
              AND {SEARCH_DOCUMENT} @@ plainto_tsquery('simple', $1)
            ORDER BY rank DESC, created_at DESC
            LIMIT $2 OFFSET $3
            "
        ))
        .bind(keyword.as_str())
        .bind(page.take)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(RankedPost::from).collect())
    }

    #[instrument(skip(self, post), fields(board_id = post.board_id))]
    async fn create(&self, post: &Post) -> RepoResult<Post> {
        let model = sqlx::query_as::<_, PostModel>(&format!(
            r"
            INSERT INTO posts (title, content, author_id, board_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {POST_COLUMNS}
            "
        ))
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.author_id)
        .bind(post.board_id)
        .bind(post.created_at)
        .bind(post.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db_err| db_err.is_foreign_key_violation())
            {
                DomainError::BoardNotFound(post.board_id)
            } else {
                map_db_error(e)
            }
        })?;

        Ok(Post::from(model))
    }

    #[instrument(skip(self, post), fields(post_id = post.id))]
    async fn update(&self, post: &Post) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET title = $2, content = $3, board_id = $4, updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.board_id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(post.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: i64, at: DateTime<Utc>) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE posts
            SET deleted_at = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn apply_counters(&self, id: i64, delta: CounterDelta) -> RepoResult<()> {
        // Right-hand sides see the pre-update row, so the score moves by the
        // effective (clamped) change of each counter.
        let result = sqlx::query(
            r"
            UPDATE posts
            SET view_count = GREATEST(view_count + $2, 0),
                scrap_count = GREATEST(scrap_count + $3, 0),
                popularity_score = popularity_score
                    + (GREATEST(view_count + $2, 0) - view_count) * $4
                    + (GREATEST(scrap_count + $3, 0) - scrap_count) * $5
            WHERE id = $1 AND deleted_at IS NULL
            ",
        )
        .bind(id)
        .bind(delta.views)
        .bind(delta.scraps)
        .bind(VIEW_WEIGHT)
        .bind(SCRAP_WEIGHT)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::PostNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self), fields(count = ids.len()))]
    async fn increment_search_counts(&self, ids: &[i64]) -> RepoResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query(
            r"
            UPDATE posts
            SET search_count = search_count + 1
            WHERE id = ANY($1) AND deleted_at IS NULL
            ",
        )
        .bind(ids)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    async fn count_by_boards(&self, board_ids: &[i64]) -> RepoResult<HashMap<i64, i64>> {
        if board_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT board_id, COUNT(*)
            FROM posts
            WHERE deleted_at IS NULL AND board_id = ANY($1)
            GROUP BY board_id
            ",
        )
        .bind(board_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgPostRepository>();
    }
}

//! Full-text post search
//!
//! Every post returned by a search gets its search counter bumped once, in
//! the background.

use board_core::{DomainError, Page, RankedPost, SearchKeyword};
use tracing::{debug, instrument, warn, Instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Search service
pub struct SearchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SearchService<'a> {
    /// Create a new SearchService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Ranked search over live posts.
    ///
    /// A blank keyword, or one with nothing searchable left after
    /// sanitizing, yields no results. Keywords over 100 characters are
    /// rejected.
    #[instrument(skip(self, keyword))]
    pub async fn search(
        &self,
        keyword: &str,
        take: Option<i64>,
        skip: Option<i64>,
    ) -> ServiceResult<Vec<RankedPost>> {
        let keyword = match SearchKeyword::parse(keyword) {
            Ok(Some(keyword)) => keyword,
            Ok(None) => return Ok(Vec::new()),
            Err(e @ DomainError::SearchKeywordTooLong { .. }) => {
                return Err(ServiceError::invalid_field("keyword", e.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let results = self
            .ctx
            .post_repo()
            .search(&keyword, Page::new(skip, take))
            .await?;

        debug!(keyword = keyword.as_str(), hits = results.len(), "Search completed");

        if !results.is_empty() {
            self.spawn_search_count_update(results.iter().map(|r| r.post.id).collect());
        }

        Ok(results)
    }

    fn spawn_search_count_update(&self, ids: Vec<i64>) {
        let repo = self.ctx.shared_post_repo();
        self.ctx.spawner().spawn(Box::pin(
            async move {
                if let Err(e) = repo.increment_search_counts(&ids).await {
                    warn!(count = ids.len(), error = %e, "Failed to update search counts");
                }
            }
            .in_current_span(),
        ));
    }
}

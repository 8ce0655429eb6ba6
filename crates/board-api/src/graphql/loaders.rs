//! Request-scoped batched loaders
//!
//! A fresh [`Loaders`] is built for every HTTP request. Lookups issued while
//! one response is being resolved are collected into a single repository
//! call per key type and cached until the request ends.

use std::collections::HashMap;

use async_graphql::dataloader::{DataLoader, HashMapCache, Loader};
use board_core::{Board, DomainError, User};
use board_service::services::SharedRepos;

/// User by ID. Resolves deleted users too, so old posts keep their author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserKey(pub i64);

/// Board by ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoardKey(pub i64);

/// Direct children of a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildBoardsKey(pub i64);

/// Number of live posts on a board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PostCountKey(pub i64);

/// Whether a user has scrapped a post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScrapKey {
    pub user_id: i64,
    pub post_id: i64,
}

/// Batch reader over the repositories
pub struct RepoReader {
    repos: SharedRepos,
}

impl RepoReader {
    pub fn new(repos: SharedRepos) -> Self {
        Self { repos }
    }
}

fn ids<K: Copy>(keys: &[K], id: impl Fn(K) -> i64) -> Vec<i64> {
    keys.iter().map(|k| id(*k)).collect()
}

#[async_trait::async_trait]
impl Loader<UserKey> for RepoReader {
    type Value = User;
    type Error = DomainError;

    async fn load(&self, keys: &[UserKey]) -> Result<HashMap<UserKey, User>, DomainError> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let users = self.repos.users.find_by_ids(&ids(keys, |k| k.0)).await?;
        Ok(users.into_iter().map(|u| (UserKey(u.id), u)).collect())
    }
}

#[async_trait::async_trait]
impl Loader<BoardKey> for RepoReader {
    type Value = Board;
    type Error = DomainError;

    async fn load(&self, keys: &[BoardKey]) -> Result<HashMap<BoardKey, Board>, DomainError> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let boards = self.repos.boards.find_by_ids(&ids(keys, |k| k.0)).await?;
        Ok(boards.into_iter().map(|b| (BoardKey(b.id), b)).collect())
    }
}

#[async_trait::async_trait]
impl Loader<ChildBoardsKey> for RepoReader {
    type Value = Vec<Board>;
    type Error = DomainError;

    async fn load(
        &self,
        keys: &[ChildBoardsKey],
    ) -> Result<HashMap<ChildBoardsKey, Vec<Board>>, DomainError> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let mut grouped: HashMap<ChildBoardsKey, Vec<Board>> =
            keys.iter().map(|k| (*k, Vec::new())).collect();

        for board in self.repos.boards.find_children(&ids(keys, |k| k.0)).await? {
            if let Some(children) = board
                .parent_id
                .and_then(|parent| grouped.get_mut(&ChildBoardsKey(parent)))
            {
                children.push(board);
            }
        }

        for children in grouped.values_mut() {
            children.sort_by_key(|b| b.id);
        }

        Ok(grouped)
    }
}

#[async_trait::async_trait]
impl Loader<PostCountKey> for RepoReader {
    type Value = i64;
    type Error = DomainError;

    async fn load(&self, keys: &[PostCountKey]) -> Result<HashMap<PostCountKey, i64>, DomainError> {
        if keys.is_empty() {
            return Ok(HashMap::new());
        }

        let counts = self.repos.posts.count_by_boards(&ids(keys, |k| k.0)).await?;
        Ok(keys
            .iter()
            .map(|k| (*k, counts.get(&k.0).copied().unwrap_or(0)))
            .collect())
    }
}

#[async_trait::async_trait]
impl Loader<ScrapKey> for RepoReader {
    type Value = bool;
    type Error = DomainError;

    async fn load(&self, keys: &[ScrapKey]) -> Result<HashMap<ScrapKey, bool>, DomainError> {
        // Almost always a single viewer, so one query
        let mut by_user: HashMap<i64, Vec<i64>> = HashMap::new();
        for key in keys {
            by_user.entry(key.user_id).or_default().push(key.post_id);
        }

        let mut result: HashMap<ScrapKey, bool> = keys.iter().map(|k| (*k, false)).collect();
        for (user_id, post_ids) in by_user {
            for post_id in self.repos.scraps.scrapped_post_ids(user_id, &post_ids).await? {
                result.insert(ScrapKey { user_id, post_id }, true);
            }
        }

        Ok(result)
    }
}

/// Every loader one request needs
pub struct Loaders {
    inner: DataLoader<RepoReader, HashMapCache>,
}

impl Loaders {
    pub fn new(repos: SharedRepos) -> Self {
        Self {
            inner: DataLoader::with_cache(
                RepoReader::new(repos),
                tokio::spawn,
                HashMapCache::default(),
            ),
        }
    }

    pub async fn user(&self, id: i64) -> Result<Option<User>, DomainError> {
        self.inner.load_one(UserKey(id)).await
    }

    /// Users for `ids`, in the same order, `None` where no row exists
    pub async fn users_in_order(&self, ids: &[i64]) -> Result<Vec<Option<User>>, DomainError> {
        let found = self.inner.load_many(ids.iter().copied().map(UserKey)).await?;
        Ok(ids.iter().map(|id| found.get(&UserKey(*id)).cloned()).collect())
    }

    pub async fn board(&self, id: i64) -> Result<Option<Board>, DomainError> {
        self.inner.load_one(BoardKey(id)).await
    }

    /// Boards for `ids`, in the same order, `None` where no row exists
    pub async fn boards_in_order(&self, ids: &[i64]) -> Result<Vec<Option<Board>>, DomainError> {
        let found = self.inner.load_many(ids.iter().copied().map(BoardKey)).await?;
        Ok(ids.iter().map(|id| found.get(&BoardKey(*id)).cloned()).collect())
    }

    /// Children of a board, ordered by ID
    pub async fn child_boards(&self, parent_id: i64) -> Result<Vec<Board>, DomainError> {
        Ok(self
            .inner
            .load_one(ChildBoardsKey(parent_id))
            .await?
            .unwrap_or_default())
    }

    pub async fn post_count(&self, board_id: i64) -> Result<i64, DomainError> {
        Ok(self
            .inner
            .load_one(PostCountKey(board_id))
            .await?
            .unwrap_or(0))
    }

    pub async fn is_scrapped(&self, user_id: i64, post_id: i64) -> Result<bool, DomainError> {
        Ok(self
            .inner
            .load_one(ScrapKey { user_id, post_id })
            .await?
            .unwrap_or(false))
    }
}

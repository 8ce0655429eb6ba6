//! In-memory repository implementations
//!
//! They follow the PostgreSQL repositories' filtering and ordering rules and
//! count calls per method, so tests can assert on batching.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use board_core::traits::{
    BoardQuery, BoardRepository, PostOrder, PostQuery, PostRepository, RepoResult,
    ScrapRepository, UserRepository,
};
use board_core::{
    Board, CounterDelta, DomainError, Lifecycle, Page, Post, RankedPost, Scrap, SearchKeyword,
    User,
};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

/// Per-method call counter
#[derive(Debug, Default)]
pub struct CallLog(Mutex<HashMap<&'static str, usize>>);

impl CallLog {
    fn record(&self, method: &'static str) {
        *self.0.lock().entry(method).or_default() += 1;
    }

    /// Number of calls made to `method`
    pub fn count(&self, method: &str) -> usize {
        self.0.lock().get(method).copied().unwrap_or(0)
    }

    pub fn reset(&self) {
        self.0.lock().clear();
    }
}

fn next_id<V>(rows: &BTreeMap<i64, V>) -> i64 {
    rows.keys().next_back().map_or(1, |id| id + 1)
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    rows: RwLock<BTreeMap<i64, (User, String)>>,
    fail_lookups: Mutex<bool>,
    pub calls: CallLog,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row by id regardless of lifecycle
    pub fn raw(&self, id: i64) -> Option<User> {
        self.rows.read().get(&id).map(|(user, _)| user.clone())
    }

    /// Make `find_by_id` fail with a database error
    pub fn fail_lookups(&self, fail: bool) {
        *self.fail_lookups.lock() = fail;
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<User>> {
        self.calls.record("find_by_id");
        if *self.fail_lookups.lock() {
            return Err(DomainError::DatabaseError("user lookup failed".to_string()));
        }
        Ok(self.raw(id).filter(User::is_active))
    }

    async fn find_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<User>> {
        self.calls.record("find_by_ids");
        let rows = self.rows.read();
        Ok(rows
            .values()
            .filter(|(user, _)| ids.contains(&user.id))
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn find_active_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        let rows = self.rows.read();
        Ok(rows
            .values()
            .map(|(user, _)| user)
            .find(|user| user.is_active() && user.email == email)
            .cloned())
    }

    async fn list_active(&self) -> RepoResult<Vec<User>> {
        let mut users: Vec<User> = self
            .rows
            .read()
            .values()
            .map(|(user, _)| user.clone())
            .filter(User::is_active)
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }

    async fn active_email_exists(&self, email: &str) -> RepoResult<bool> {
        Ok(self.find_active_by_email(email).await?.is_some())
    }

    async fn create(&self, user: &User, password_hash: &str) -> RepoResult<User> {
        let mut rows = self.rows.write();
        if rows
            .values()
            .any(|(u, _)| u.is_active() && u.email == user.email)
        {
            return Err(DomainError::EmailAlreadyExists(user.email.clone()));
        }

        let mut created = user.clone();
        created.id = next_id(&rows);
        rows.insert(created.id, (created.clone(), password_hash.to_string()));
        Ok(created)
    }

    async fn update(&self, user: &User) -> RepoResult<()> {
        let mut rows = self.rows.write();
        match rows.get_mut(&user.id) {
            Some((row, _)) if row.is_active() => {
                row.name.clone_from(&user.name);
                row.role = user.role;
                row.subscribe_email = user.subscribe_email;
                row.subscribe_sms = user.subscribe_sms;
                row.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(DomainError::UserNotFound(user.id)),
        }
    }

    async fn soft_delete(&self, id: i64, at: DateTime<Utc>) -> RepoResult<()> {
        let mut rows = self.rows.write();
        match rows.get_mut(&id) {
            Some((row, _)) if row.is_active() => {
                row.lifecycle = Lifecycle::deleted(at);
                row.updated_at = at;
                Ok(())
            }
            _ => Err(DomainError::UserNotFound(id)),
        }
    }

    async fn get_password_hash(&self, id: i64) -> RepoResult<Option<String>> {
        Ok(self
            .rows
            .read()
            .get(&id)
            .filter(|(user, _)| user.is_active())
            .map(|(_, hash)| hash.clone()))
    }
}

// ============================================================================
// Boards
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryBoardRepository {
    rows: RwLock<BTreeMap<i64, Board>>,
    pub calls: CallLog,
}

impl MemoryBoardRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_write(rows: &BTreeMap<i64, Board>, board: &Board) -> RepoResult<()> {
        if rows
            .values()
            .any(|b| b.id != board.id && b.slug == board.slug)
        {
            return Err(DomainError::SlugAlreadyExists(board.slug.clone()));
        }
        if let Some(parent_id) = board.parent_id {
            if !rows.contains_key(&parent_id) {
                return Err(DomainError::BoardNotFound(parent_id));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BoardRepository for MemoryBoardRepository {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Board>> {
        self.calls.record("find_by_id");
        Ok(self.rows.read().get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Board>> {
        Ok(self.rows.read().values().find(|b| b.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> RepoResult<Vec<Board>> {
        self.calls.record("find_by_ids");
        let rows = self.rows.read();
        Ok(ids.iter().filter_map(|id| rows.get(id).cloned()).collect())
    }

    async fn find_children(&self, parent_ids: &[i64]) -> RepoResult<Vec<Board>> {
        self.calls.record("find_children");
        Ok(self
            .rows
            .read()
            .values()
            .filter(|b| b.parent_id.is_some_and(|p| parent_ids.contains(&p)))
            .cloned()
            .collect())
    }

    async fn list(&self, query: &BoardQuery) -> RepoResult<Vec<Board>> {
        let needle = query.name_contains.as_deref().map(str::to_lowercase);
        Ok(self
            .rows
            .read()
            .values()
            .filter(|b| query.roles.contains(&b.required_role))
            .filter(|b| query.parent_id.map_or(true, |p| b.parent_id == Some(p)))
            .filter(|b| query.slug.as_deref().map_or(true, |s| b.slug == s))
            .filter(|b| {
                needle
                    .as_deref()
                    .map_or(true, |n| b.name.to_lowercase().contains(n))
            })
            .cloned()
            .collect())
    }

    async fn create(&self, board: &Board) -> RepoResult<Board> {
        let mut rows = self.rows.write();
        let mut created = board.clone();
        created.id = next_id(&rows);
        Self::check_write(&rows, &created)?;
        rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, board: &Board) -> RepoResult<()> {
        let mut rows = self.rows.write();
        if !rows.contains_key(&board.id) {
            return Err(DomainError::BoardNotFound(board.id));
        }
        Self::check_write(&rows, board)?;
        if let Some(parent_id) = board.parent_id {
            let mut cursor = Some(parent_id);
            while let Some(id) = cursor {
                if id == board.id {
                    return Err(DomainError::BoardCycle {
                        board_id: board.id,
                        parent_id,
                    });
                }
                cursor = rows.get(&id).and_then(|b| b.parent_id);
            }
        }
        let mut updated = board.clone();
        updated.updated_at = Utc::now();
        rows.insert(board.id, updated);
        Ok(())
    }
}

// ============================================================================
// Posts
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryPostRepository {
    rows: RwLock<BTreeMap<i64, Post>>,
    fail_counters: Mutex<bool>,
    pub calls: CallLog,
}

impl MemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row by id regardless of lifecycle
    pub fn raw(&self, id: i64) -> Option<Post> {
        self.rows.read().get(&id).cloned()
    }

    /// Make every counter update fail with a database error
    pub fn fail_counter_updates(&self, fail: bool) {
        *self.fail_counters.lock() = fail;
    }

    fn live(&self) -> Vec<Post> {
        self.rows
            .read()
            .values()
            .filter(|p| !p.is_deleted())
            .cloned()
            .collect()
    }

    fn page<T>(items: Vec<T>, page: Page) -> Vec<T> {
        items
            .into_iter()
            .skip(page.skip as usize)
            .take(page.take as usize)
            .collect()
    }
}

/// Lowercased words of a text, split the way the `simple` text-search
/// configuration splits them
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[async_trait]
impl PostRepository for MemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> RepoResult<Option<Post>> {
        self.calls.record("find_by_id");
        Ok(self.raw(id).filter(|p| !p.is_deleted()))
    }

    async fn list(&self, query: &PostQuery) -> RepoResult<Vec<Post>> {
        let keyword = query.keyword.as_deref().map(str::to_lowercase);
        let mut posts: Vec<Post> = self
            .live()
            .into_iter()
            .filter(|p| query.board_id.map_or(true, |b| p.board_id == b))
            .filter(|p| query.author_id.map_or(true, |a| p.author_id == Some(a)))
            .filter(|p| {
                keyword.as_deref().map_or(true, |k| {
                    p.title.to_lowercase().contains(k) || p.content.to_lowercase().contains(k)
                })
            })
            .filter(|p| query.min_view_count.map_or(true, |v| p.view_count >= v))
            .filter(|p| query.min_scrap_count.map_or(true, |s| p.scrap_count >= s))
            .collect();

        let newest = |a: &Post, b: &Post| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id));
        match query.order() {
            PostOrder::CreatedAtDesc => posts.sort_by(newest),
            PostOrder::ViewCountDesc => {
                posts.sort_by(|a, b| b.view_count.cmp(&a.view_count).then_with(|| newest(a, b)));
            }
        }

        Ok(Self::page(posts, query.page))
    }

    async fn list_best(&self, min_views: i32, limit: i64) -> RepoResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .live()
            .into_iter()
            .filter(|p| p.view_count >= min_views)
            .collect();
        posts.sort_by(|a, b| {
            b.popularity_score
                .cmp(&a.popularity_score)
                .then(b.created_at.cmp(&a.created_at))
                .then(b.id.cmp(&a.id))
        });
        posts.truncate(limit.max(0) as usize);
        Ok(posts)
    }

    async fn search(&self, keyword: &SearchKeyword, page: Page) -> RepoResult<Vec<RankedPost>> {
        let terms = words(keyword.as_str());
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut ranked: Vec<RankedPost> = self
            .live()
            .into_iter()
            .filter_map(|post| {
                let document = words(&format!("{} {}", post.title, post.content));
                if !terms.iter().all(|t| document.contains(t)) {
                    return None;
                }
                let hits = document.iter().filter(|w| terms.contains(w)).count();
                let rank = hits as f32 / document.len() as f32;
                Some(RankedPost { post, rank })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.rank
                .total_cmp(&a.rank)
                .then(b.post.created_at.cmp(&a.post.created_at))
                .then(b.post.id.cmp(&a.post.id))
        });

        Ok(Self::page(ranked, page))
    }

    async fn create(&self, post: &Post) -> RepoResult<Post> {
        let mut rows = self.rows.write();
        let mut created = post.clone();
        created.id = next_id(&rows);
        rows.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, post: &Post) -> RepoResult<()> {
        let mut rows = self.rows.write();
        match rows.get_mut(&post.id) {
            Some(row) if !row.is_deleted() => {
                row.title.clone_from(&post.title);
                row.content.clone_from(&post.content);
                row.board_id = post.board_id;
                row.updated_at = Utc::now();
                Ok(())
            }
            _ => Err(DomainError::PostNotFound(post.id)),
        }
    }

    async fn soft_delete(&self, id: i64, at: DateTime<Utc>) -> RepoResult<()> {
        let mut rows = self.rows.write();
        match rows.get_mut(&id) {
            Some(row) if !row.is_deleted() => {
                row.lifecycle = Lifecycle::deleted(at);
                row.updated_at = at;
                Ok(())
            }
            _ => Err(DomainError::PostNotFound(id)),
        }
    }

    async fn apply_counters(&self, id: i64, delta: CounterDelta) -> RepoResult<()> {
        self.calls.record("apply_counters");
        if *self.fail_counters.lock() {
            return Err(DomainError::DatabaseError("connection reset".to_string()));
        }

        let mut rows = self.rows.write();
        match rows.get_mut(&id) {
            Some(row) if !row.is_deleted() => {
                row.apply_counters(delta);
                Ok(())
            }
            _ => Err(DomainError::PostNotFound(id)),
        }
    }

    async fn increment_search_counts(&self, ids: &[i64]) -> RepoResult<u64> {
        self.calls.record("increment_search_counts");
        let mut rows = self.rows.write();
        let mut touched = 0;
        for row in rows.values_mut() {
            if ids.contains(&row.id) && !row.is_deleted() {
                row.search_count += 1;
                touched += 1;
            }
        }
        Ok(touched)
    }

    async fn count_by_boards(&self, board_ids: &[i64]) -> RepoResult<HashMap<i64, i64>> {
        self.calls.record("count_by_boards");
        let mut counts = HashMap::new();
        for post in self.live() {
            if board_ids.contains(&post.board_id) {
                *counts.entry(post.board_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }
}

// ============================================================================
// Scraps
// ============================================================================

#[derive(Debug, Default)]
pub struct MemoryScrapRepository {
    rows: RwLock<BTreeSet<(i64, i64)>>,
    pub calls: CallLog,
}

impl MemoryScrapRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScrapRepository for MemoryScrapRepository {
    async fn create(&self, scrap: &Scrap) -> RepoResult<bool> {
        Ok(self.rows.write().insert((scrap.user_id, scrap.post_id)))
    }

    async fn delete(&self, user_id: i64, post_id: i64) -> RepoResult<bool> {
        Ok(self.rows.write().remove(&(user_id, post_id)))
    }

    async fn exists(&self, user_id: i64, post_id: i64) -> RepoResult<bool> {
        Ok(self.rows.read().contains(&(user_id, post_id)))
    }

    async fn scrapped_post_ids(&self, user_id: i64, post_ids: &[i64]) -> RepoResult<Vec<i64>> {
        self.calls.record("scrapped_post_ids");
        let rows = self.rows.read();
        Ok(post_ids
            .iter()
            .copied()
            .filter(|post_id| rows.contains(&(user_id, *post_id)))
            .collect())
    }
}

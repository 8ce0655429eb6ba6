//! Test support: in-memory repositories, a deferred task spawner and a
//! ready-made service context wired to both.

mod memory;

use std::sync::Arc;

use board_common::auth::{JwtService, PasswordService};
use board_core::traits::{BoardRepository, PostRepository, UserRepository};
use board_core::{Board, Post, User, UserRole};
use parking_lot::Mutex;

pub use memory::{
    CallLog, MemoryBoardRepository, MemoryPostRepository, MemoryScrapRepository,
    MemoryUserRepository,
};

use crate::services::ServiceContext;
use crate::tasks::{BoxTask, TaskSpawner};

/// Password every seeded user gets
pub const TEST_PASSWORD: &str = "Passw0rd!";

pub const TEST_JWT_SECRET: &str = "test-secret-key-for-board-service-tests";

/// Holds spawned tasks until [`DeferredSpawner::flush`] runs them
#[derive(Default)]
pub struct DeferredSpawner {
    pending: Mutex<Vec<BoxTask>>,
}

impl DeferredSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks waiting to run
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Run every pending task to completion, in spawn order
    pub async fn flush(&self) {
        loop {
            let tasks = std::mem::take(&mut *self.pending.lock());
            if tasks.is_empty() {
                break;
            }
            for task in tasks {
                task.await;
            }
        }
    }
}

impl TaskSpawner for DeferredSpawner {
    fn spawn(&self, task: BoxTask) {
        self.pending.lock().push(task);
    }
}

/// A service context over in-memory repositories, with direct access to the
/// concrete fakes for seeding and assertions
pub struct TestContext {
    pub ctx: Arc<ServiceContext>,
    pub users: Arc<MemoryUserRepository>,
    pub boards: Arc<MemoryBoardRepository>,
    pub posts: Arc<MemoryPostRepository>,
    pub scraps: Arc<MemoryScrapRepository>,
    pub spawner: Arc<DeferredSpawner>,
}

impl TestContext {
    pub fn new() -> Self {
        let users = Arc::new(MemoryUserRepository::new());
        let boards = Arc::new(MemoryBoardRepository::new());
        let posts = Arc::new(MemoryPostRepository::new());
        let scraps = Arc::new(MemoryScrapRepository::new());
        let spawner = Arc::new(DeferredSpawner::new());

        let ctx = Arc::new(ServiceContext::new(
            users.clone(),
            boards.clone(),
            posts.clone(),
            scraps.clone(),
            Arc::new(Self::jwt_service()),
            spawner.clone(),
        ));

        Self {
            ctx,
            users,
            boards,
            posts,
            scraps,
            spawner,
        }
    }

    /// The JWT service the context signs tokens with
    pub fn jwt_service() -> JwtService {
        JwtService::new(TEST_JWT_SECRET, 3600, 86400)
    }

    /// Insert an active user whose password is [`TEST_PASSWORD`]
    pub async fn seed_user(&self, email: &str, role: UserRole) -> User {
        let hash = PasswordService::new()
            .hash(TEST_PASSWORD)
            .expect("hash test password");
        let name = email.split('@').next().unwrap_or(email).to_string();
        self.users
            .create(&User::new(email.to_string(), name, role), &hash)
            .await
            .expect("seed user")
    }

    /// Insert a board
    pub async fn seed_board(&self, slug: &str, role: UserRole, parent_id: Option<i64>) -> Board {
        let mut board = Board::new(slug.to_uppercase(), slug.to_string(), role);
        board.parent_id = parent_id;
        self.boards.create(&board).await.expect("seed board")
    }

    /// Insert a post with the given counters; the score follows the weights
    pub async fn seed_post(
        &self,
        author: &User,
        board: &Board,
        title: &str,
        views: i32,
        scraps: i32,
    ) -> Post {
        let mut post = Post::new(
            title.to_string(),
            format!("{title} body text"),
            author.id,
            board.id,
        );
        post.view_count = views;
        post.scrap_count = scraps;
        post.popularity_score = post.expected_popularity();
        self.posts.create(&post).await.expect("seed post")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

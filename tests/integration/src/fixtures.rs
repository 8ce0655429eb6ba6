//! Test fixtures and GraphQL documents

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use board_core::traits::BoardRepository;
use board_core::{Board, UserRole};
use board_db::{PgBoardRepository, PgPool};
use serde_json::{json, Value};

use crate::helpers::TestServer;

pub const TEST_PASSWORD: &str = "TestPass123!";

pub const CREATE_USER: &str = "mutation($input: CreateUserInput!) { \
    createUser(input: $input) { id name email userRole } }";

pub const LOGIN: &str = "mutation($input: LoginInput!) { \
    login(input: $input) { accessToken refreshToken expiresIn user { id } } }";

pub const REFRESH_TOKEN: &str = "mutation($token: String!) { \
    refreshToken(refreshToken: $token) { accessToken refreshToken } }";

pub const ME: &str = "{ me { id email } }";

pub const CREATE_POST: &str = "mutation($input: CreatePostInput!) { \
    createPost(input: $input) { id title viewCount author { id } board { id } } }";

pub const VIEW_POST: &str = "query($id: Int!) { viewPost(id: $id) { id viewCount popularityScore } }";

pub const POST_COUNTERS: &str = "query($id: Int!) { post(id: $id) { viewCount popularityScore } }";

pub const SCRAP_POST: &str = "mutation($id: Int!) { scrapPost(postId: $id) { scrapCount isScrapped } }";

/// Unique suffix that keeps rows from separate tests and runs apart
pub fn unique_suffix() -> String {
    static COUNTER: AtomicU64 = AtomicU64::new(0);
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    format!("{nanos}{}", COUNTER.fetch_add(1, Ordering::SeqCst))
}

/// A signed-up and logged-in user
#[derive(Debug)]
pub struct SignedInUser {
    pub id: i64,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
}

/// Input for `createUser` with a unique email
pub fn new_user_input() -> Value {
    let suffix = unique_suffix();
    json!({
        "email": format!("user{suffix}@example.com"),
        "password": TEST_PASSWORD,
        "name": format!("user{suffix}"),
    })
}

/// Sign up a fresh user through the API and log them in
pub async fn sign_up(server: &TestServer) -> Result<SignedInUser> {
    let input = new_user_input();
    let created = server
        .graphql_data(None, CREATE_USER, json!({ "input": input }))
        .await?;
    let email = input["email"].as_str().unwrap_or_default().to_string();

    let login = server
        .graphql_data(
            None,
            LOGIN,
            json!({ "input": { "email": email, "password": TEST_PASSWORD } }),
        )
        .await?;

    Ok(SignedInUser {
        id: created["createUser"]["id"].as_i64().unwrap_or_default(),
        email,
        access_token: login["login"]["accessToken"].as_str().unwrap_or_default().to_string(),
        refresh_token: login["login"]["refreshToken"].as_str().unwrap_or_default().to_string(),
    })
}

/// Insert a board directly; board creation through the API needs an admin
pub async fn seed_board(pool: &PgPool) -> Result<Board> {
    let suffix = unique_suffix();
    let board = Board::new(format!("Board {suffix}"), format!("board-{suffix}"), UserRole::User);
    Ok(PgBoardRepository::new(pool.clone()).create(&board).await?)
}

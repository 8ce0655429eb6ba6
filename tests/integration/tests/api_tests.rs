//! API Integration Tests
//!
//! These tests require a running PostgreSQL instance named by DATABASE_URL.
//! Tests skip when it is not set.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_json, check_test_env, error_code, fixtures::*, TestServer,
};
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{json, Value};

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    let body = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_health_ready() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health/ready").await.expect("Request failed");
    let body = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["database"], true);
}

#[tokio::test]
async fn test_request_id_is_returned() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/health").await.expect("Request failed");
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_graphiql_served_when_enabled() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let response = server.get("/graphql").await.expect("Request failed");
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("graphiql"));
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_create_user_and_login() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = sign_up(&server).await.unwrap();

    assert!(user.id > 0);
    assert!(!user.access_token.is_empty());
    assert!(!user.refresh_token.is_empty());
}

#[tokio::test]
async fn test_create_user_duplicate_email() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let input = new_user_input();

    server
        .graphql_data(None, CREATE_USER, json!({ "input": input.clone() }))
        .await
        .unwrap();
    let body = server
        .graphql(None, CREATE_USER, json!({ "input": input }))
        .await
        .unwrap();

    assert_eq!(error_code(&body), Some("CONFLICT"));
}

#[tokio::test]
async fn test_anonymous_cannot_create_admin() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let mut input = new_user_input();
    input["userRole"] = json!("ADMIN");

    let body = server
        .graphql(None, CREATE_USER, json!({ "input": input }))
        .await
        .unwrap();

    assert_eq!(error_code(&body), Some("FORBIDDEN"));
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let body = server
        .graphql(
            None,
            LOGIN,
            json!({ "input": { "email": "nonexistent@example.com", "password": "Wrong1234!" } }),
        )
        .await
        .unwrap();

    assert_eq!(error_code(&body), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_bearer_token_identifies_viewer() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = sign_up(&server).await.unwrap();

    let data = server
        .graphql_data(Some(&user.access_token), ME, json!({}))
        .await
        .unwrap();
    assert_eq!(data["me"]["id"], user.id);
    assert_eq!(data["me"]["email"], user.email.as_str());

    let body = server.graphql(None, ME, json!({})).await.unwrap();
    assert_eq!(error_code(&body), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_invalid_token_reads_as_anonymous() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let body = server
        .graphql(Some("not-a-token"), ME, json!({}))
        .await
        .unwrap();

    assert_eq!(error_code(&body), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_refresh_token() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = sign_up(&server).await.unwrap();

    let data = server
        .graphql_data(None, REFRESH_TOKEN, json!({ "token": user.refresh_token }))
        .await
        .unwrap();
    let access = data["refreshToken"]["accessToken"].as_str().unwrap();

    let me = server.graphql_data(Some(access), ME, json!({})).await.unwrap();
    assert_eq!(me["me"]["id"], user.id);

    // An access token is not accepted as a refresh token
    let body = server
        .graphql(None, REFRESH_TOKEN, json!({ "token": user.access_token }))
        .await
        .unwrap();
    assert_eq!(error_code(&body), Some("UNAUTHORIZED"));
}

// ============================================================================
// Post Tests
// ============================================================================

async fn create_post(server: &TestServer, token: &str, board_id: i64) -> Value {
    let data = server
        .graphql_data(
            Some(token),
            CREATE_POST,
            json!({ "input": {
                "title": "Integration title",
                "content": "Integration test body text",
                "boardId": board_id,
            } }),
        )
        .await
        .unwrap();
    data["createPost"].clone()
}

#[tokio::test]
async fn test_create_and_view_post() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = sign_up(&server).await.unwrap();
    let board = seed_board(&server.pool).await.unwrap();

    let post = create_post(&server, &user.access_token, board.id).await;
    assert_eq!(post["author"]["id"], user.id);
    assert_eq!(post["board"]["id"], board.id);
    assert_eq!(post["viewCount"], 0);

    let id = post["id"].as_i64().unwrap();
    let viewed = server
        .graphql_data(None, VIEW_POST, json!({ "id": id }))
        .await
        .unwrap();
    // The returned snapshot predates the view it caused
    assert_eq!(viewed["viewPost"]["viewCount"], 0);

    let mut counted = Value::Null;
    for _ in 0..40 {
        let data = server
            .graphql_data(None, POST_COUNTERS, json!({ "id": id }))
            .await
            .unwrap();
        counted = data["post"].clone();
        if counted["viewCount"] == 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    assert_eq!(counted["viewCount"], 1);
    assert_eq!(counted["popularityScore"], 5);
}

#[tokio::test]
async fn test_create_post_requires_sign_in() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let board = seed_board(&server.pool).await.unwrap();

    let body = server
        .graphql(
            None,
            CREATE_POST,
            json!({ "input": {
                "title": "Integration title",
                "content": "Integration test body text",
                "boardId": board.id,
            } }),
        )
        .await
        .unwrap();

    assert_eq!(error_code(&body), Some("UNAUTHORIZED"));
}

#[tokio::test]
async fn test_scrap_post_twice_conflicts() {
    if !check_test_env() {
        return;
    }

    let server = TestServer::start().await.expect("Failed to start server");
    let user = sign_up(&server).await.unwrap();
    let board = seed_board(&server.pool).await.unwrap();
    let post = create_post(&server, &user.access_token, board.id).await;
    let vars = json!({ "id": post["id"] });

    let data = server
        .graphql_data(Some(&user.access_token), SCRAP_POST, vars.clone())
        .await
        .unwrap();
    assert_eq!(data["scrapPost"]["scrapCount"], 1);
    assert_eq!(data["scrapPost"]["isScrapped"], true);

    let body = server
        .graphql(Some(&user.access_token), SCRAP_POST, vars)
        .await
        .unwrap();
    assert_eq!(error_code(&body), Some("CONFLICT"));
}

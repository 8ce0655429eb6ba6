//! GraphQL schema
//!
//! The schema holds the shared [`ServiceContext`]. Each request carries its
//! own [`Viewer`] and [`Loaders`] as request data.

pub mod loaders;
pub mod mutation;
pub mod query;
pub mod types;
pub mod viewer;

use std::sync::Arc;

use async_graphql::extensions::Tracing;
use async_graphql::{Context, EmptySubscription, Schema};
use board_common::GraphqlConfig;
use board_service::ServiceContext;

pub use loaders::Loaders;
pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use viewer::Viewer;

pub type BoardSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with depth and complexity limits applied
pub fn build_schema(service_context: Arc<ServiceContext>, config: &GraphqlConfig) -> BoardSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(service_context)
        .extension(Tracing)
        .limit_depth(config.max_depth)
        .limit_complexity(config.max_complexity)
        .finish()
}

/// Fresh request data: who is asking, and loaders nobody else shares
pub fn request_data(service_context: &ServiceContext, viewer: Viewer) -> (Viewer, Loaders) {
    (viewer, Loaders::new(service_context.shared_repos()))
}

pub(crate) fn services<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a ServiceContext> {
    ctx.data::<Arc<ServiceContext>>().map(|c| &**c)
}

pub(crate) fn loaders<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Loaders> {
    ctx.data::<Loaders>()
}

#[cfg(test)]
mod tests {
    use async_graphql::{Request, Response, Variables};
    use board_core::{User, UserRole};
    use board_service::testing::{TestContext, TEST_PASSWORD};
    use serde_json::{json, Value};

    use super::*;

    struct Harness {
        t: TestContext,
        schema: BoardSchema,
    }

    impl Harness {
        fn new() -> Self {
            let t = TestContext::new();
            let schema = build_schema(t.ctx.clone(), &GraphqlConfig::default());
            Self { t, schema }
        }

        async fn run(&self, viewer: Option<&User>, query: &str, variables: Value) -> Response {
            let viewer = viewer.cloned().map_or_else(Viewer::anonymous, Viewer::signed_in);
            let (viewer, loaders) = request_data(&self.t.ctx, viewer);
            let request = Request::new(query)
                .variables(Variables::from_json(variables))
                .data(viewer)
                .data(loaders);
            self.schema.execute(request).await
        }

        async fn data(&self, viewer: Option<&User>, query: &str, variables: Value) -> Value {
            let response = self.run(viewer, query, variables).await;
            assert!(response.errors.is_empty(), "{:?}", response.errors);
            response.data.into_json().unwrap()
        }

        async fn error_code(&self, viewer: Option<&User>, query: &str, variables: Value) -> String {
            let response = self.run(viewer, query, variables).await;
            let error = response.errors.first().expect("an error");
            let code = error
                .extensions
                .as_ref()
                .and_then(|ext| ext.get("code"))
                .expect("an error code");
            code.to_string().trim_matches('"').to_string()
        }
    }

    #[tokio::test]
    async fn test_post_relations_resolve() {
        let h = Harness::new();
        let author = h.t.seed_user("author@example.com", UserRole::User).await;
        let board = h.t.seed_board("free", UserRole::User, None).await;
        let post = h.t.seed_post(&author, &board, "hello", 3, 0).await;

        let data = h
            .data(
                None,
                "query($id: Int!) { post(id: $id) { id title commentCount rank isScrapped \
                 author { id name email } board { slug postCount } } }",
                json!({ "id": post.id }),
            )
            .await;

        let post_json = &data["post"];
        assert_eq!(post_json["title"], "hello");
        assert_eq!(post_json["commentCount"], 0);
        assert_eq!(post_json["rank"], Value::Null);
        assert_eq!(post_json["isScrapped"], false);
        assert_eq!(post_json["author"]["id"], author.id);
        assert_eq!(post_json["author"]["email"], Value::Null);
        assert_eq!(post_json["board"]["slug"], "free");
        assert_eq!(post_json["board"]["postCount"], 1);
    }

    #[tokio::test]
    async fn test_private_fields_follow_viewer() {
        let h = Harness::new();
        let alice = h.t.seed_user("alice@example.com", UserRole::User).await;
        let bob = h.t.seed_user("bob@example.com", UserRole::User).await;
        let admin = h.t.seed_user("admin@example.com", UserRole::Admin).await;
        let query = "query($id: Int!) { user(id: $id) { email subscribeSms isDeleted } }";
        let vars = json!({ "id": alice.id });

        let own = h.data(Some(&alice), query, vars.clone()).await;
        assert_eq!(own["user"]["email"], "alice@example.com");
        assert_eq!(own["user"]["subscribeSms"], false);
        assert_eq!(own["user"]["isDeleted"], Value::Null);

        let other = h.data(Some(&bob), query, vars.clone()).await;
        assert_eq!(other["user"]["email"], Value::Null);

        let admin_view = h.data(Some(&admin), query, vars).await;
        assert_eq!(admin_view["user"]["email"], "alice@example.com");
        assert_eq!(admin_view["user"]["isDeleted"], false);
    }

    #[tokio::test]
    async fn test_board_tree_and_role_gate() {
        let h = Harness::new();
        let root = h.t.seed_board("community", UserRole::User, None).await;
        h.t.seed_board("humor", UserRole::User, Some(root.id)).await;
        h.t.seed_board("mods", UserRole::Admin, Some(root.id)).await;
        let admin = h.t.seed_user("admin@example.com", UserRole::Admin).await;
        let query = "{ boardBySlug(slug: \"community\") { childBoards { slug parentBoard { slug } } } }";

        let anonymous = h.data(None, query, json!({})).await;
        let children = anonymous["boardBySlug"]["childBoards"].as_array().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0]["slug"], "humor");
        assert_eq!(children[0]["parentBoard"]["slug"], "community");

        let as_admin = h.data(Some(&admin), query, json!({})).await;
        assert_eq!(
            as_admin["boardBySlug"]["childBoards"].as_array().unwrap().len(),
            2
        );

        let code = h
            .error_code(None, "{ boardBySlug(slug: \"mods\") { id } }", json!({}))
            .await;
        assert_eq!(code, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_post_on_restricted_board_hides_only_the_board() {
        let h = Harness::new();
        let admin = h.t.seed_user("admin@example.com", UserRole::Admin).await;
        let board = h.t.seed_board("mods", UserRole::Admin, None).await;
        let post = h.t.seed_post(&admin, &board, "notice", 0, 0).await;
        let query = "query($id: Int!) { post(id: $id) { title boardId board { slug } } }";
        let vars = json!({ "id": post.id });

        let anonymous = h.data(None, query, vars.clone()).await;
        assert_eq!(anonymous["post"]["title"], "notice");
        assert_eq!(anonymous["post"]["boardId"], board.id);
        assert_eq!(anonymous["post"]["board"], Value::Null);

        let as_admin = h.data(Some(&admin), query, vars).await;
        assert_eq!(as_admin["post"]["board"]["slug"], "mods");
    }

    #[tokio::test]
    async fn test_mutations_require_sign_in() {
        let h = Harness::new();
        let code = h
            .error_code(
                None,
                "mutation { createPost(input: { title: \"Hi there\", content: \"long enough body\", boardId: 1 }) { id } }",
                json!({}),
            )
            .await;
        assert_eq!(code, "UNAUTHORIZED");

        let code = h.error_code(None, "{ me { id } }", json!({})).await;
        assert_eq!(code, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_scrap_flow_through_schema() {
        let h = Harness::new();
        let reader = h.t.seed_user("reader@example.com", UserRole::User).await;
        let board = h.t.seed_board("free", UserRole::User, None).await;
        let post = h.t.seed_post(&reader, &board, "keeper", 0, 0).await;
        let vars = json!({ "id": post.id });

        let data = h
            .data(
                Some(&reader),
                "mutation($id: Int!) { scrapPost(postId: $id) { scrapCount popularityScore isScrapped } }",
                vars.clone(),
            )
            .await;
        assert_eq!(data["scrapPost"]["scrapCount"], 1);
        assert_eq!(data["scrapPost"]["popularityScore"], 50);
        assert_eq!(data["scrapPost"]["isScrapped"], true);

        let code = h
            .error_code(
                Some(&reader),
                "mutation($id: Int!) { scrapPost(postId: $id) { id } }",
                vars.clone(),
            )
            .await;
        assert_eq!(code, "CONFLICT");

        h.data(
            Some(&reader),
            "mutation($id: Int!) { unscrapPost(postId: $id) { scrapCount } }",
            vars.clone(),
        )
        .await;
        let code = h
            .error_code(
                Some(&reader),
                "mutation($id: Int!) { unscrapPost(postId: $id) { id } }",
                vars,
            )
            .await;
        assert_eq!(code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_search_results_carry_rank() {
        let h = Harness::new();
        let author = h.t.seed_user("author@example.com", UserRole::User).await;
        let board = h.t.seed_board("free", UserRole::User, None).await;
        h.t.seed_post(&author, &board, "rust", 0, 0).await;

        let data = h
            .data(None, "{ searchPosts(keyword: \"rust\") { title rank } }", json!({}))
            .await;
        let results = data["searchPosts"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0]["rank"].as_f64().unwrap() > 0.0);

        let code = h
            .error_code(
                None,
                "query($k: String!) { searchPosts(keyword: $k) { id } }",
                json!({ "k": "a".repeat(101) }),
            )
            .await;
        assert_eq!(code, "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_login_returns_tokens() {
        let h = Harness::new();
        h.t.seed_user("member@example.com", UserRole::User).await;

        let data = h
            .data(
                None,
                "mutation($p: String!) { login(input: { email: \"member@example.com\", password: $p }) \
                 { accessToken refreshToken expiresIn user { email } } }",
                json!({ "p": TEST_PASSWORD }),
            )
            .await;

        let payload = &data["login"];
        assert!(!payload["accessToken"].as_str().unwrap().is_empty());
        assert!(!payload["refreshToken"].as_str().unwrap().is_empty());
        assert_eq!(payload["expiresIn"], 3600);
        // Field visibility follows the request viewer, who is signed out
        assert_eq!(payload["user"]["email"], Value::Null);
    }

    #[tokio::test]
    async fn test_depth_limit_applies() {
        let t = TestContext::new();
        let config = GraphqlConfig {
            max_depth: 2,
            ..GraphqlConfig::default()
        };
        let schema = build_schema(t.ctx.clone(), &config);

        let response = schema
            .execute("{ boards { parentBoard { parentBoard { id } } } }")
            .await;
        assert!(!response.errors.is_empty());
    }
}

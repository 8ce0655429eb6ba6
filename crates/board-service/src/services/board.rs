//! Board service
//!
//! Board listings gated by role, and admin-only board management.

use board_core::traits::BoardQuery;
use board_core::{Board, DomainError, User, UserRole};
use tracing::{info, instrument};
use validator::Validate;

use crate::dto::{BoardFilter, CreateBoardRequest, UpdateBoardRequest};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Longest ancestor chain walked when checking for cycles
pub const MAX_BOARD_DEPTH: usize = 32;

/// Board service
pub struct BoardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BoardService<'a> {
    /// Create a new BoardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Boards visible to `viewer_role`, ordered by ID
    #[instrument(skip(self, filter))]
    pub async fn list_boards(
        &self,
        viewer_role: UserRole,
        filter: BoardFilter,
    ) -> ServiceResult<Vec<Board>> {
        filter.validate()?;

        let query = BoardQuery {
            roles: viewer_role.allowed_roles().to_vec(),
            parent_id: filter.parent_id,
            slug: filter.slug,
            name_contains: filter
                .search_keyword
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
        };

        Ok(self.ctx.board_repo().list(&query).await?)
    }

    /// Get a board by ID, enforcing its required role
    #[instrument(skip(self, viewer))]
    pub async fn get_board(&self, viewer: Option<&User>, board_id: i64) -> ServiceResult<Board> {
        let board = self
            .ctx
            .board_repo()
            .find_by_id(board_id)
            .await?
            .ok_or(DomainError::BoardNotFound(board_id))?;

        Self::check_access(viewer, &board)?;
        Ok(board)
    }

    /// Get a board by slug, enforcing its required role
    #[instrument(skip(self, viewer))]
    pub async fn get_board_by_slug(&self, viewer: Option<&User>, slug: &str) -> ServiceResult<Board> {
        let board = self
            .ctx
            .board_repo()
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::BoardSlugNotFound(slug.to_string()))?;

        Self::check_access(viewer, &board)?;
        Ok(board)
    }

    /// Create a board (admin only)
    #[instrument(skip(self, viewer, request), fields(slug = %request.slug))]
    pub async fn create_board(
        &self,
        viewer: &User,
        request: CreateBoardRequest,
    ) -> ServiceResult<Board> {
        Self::require_admin(viewer)?;
        request.validate()?;

        if let Some(parent_id) = request.parent_id {
            self.require_board(parent_id).await?;
        }

        let mut board = Board::new(request.name, request.slug, request.required_role);
        board.description = request.description;
        board.parent_id = request.parent_id;

        let board = self.ctx.board_repo().create(&board).await?;
        info!(board_id = %board.id, "Board created");

        Ok(board)
    }

    /// Update a board (admin only). Re-parenting is refused if the board
    /// would become its own ancestor.
    #[instrument(skip(self, viewer, request), fields(board_id = %request.id))]
    pub async fn update_board(
        &self,
        viewer: &User,
        request: UpdateBoardRequest,
    ) -> ServiceResult<Board> {
        Self::require_admin(viewer)?;
        request.validate()?;

        let mut board = self.require_board(request.id).await?;

        if let Some(name) = request.name {
            board.name = name;
        }
        if let Some(slug) = request.slug {
            board.slug = slug;
        }
        if let Some(description) = request.description {
            board.description = Some(description);
        }
        if let Some(role) = request.required_role {
            board.required_role = role;
        }
        if let Some(parent_id) = request.parent_id {
            if let Some(parent_id) = parent_id {
                self.ensure_no_cycle(board.id, parent_id).await?;
            }
            board.parent_id = parent_id;
        }

        self.ctx.board_repo().update(&board).await?;
        info!(board_id = %board.id, "Board updated");

        self.require_board(board.id).await
    }

    /// Boards with `required_role == USER` are public. Anything stricter
    /// needs a signed-in viewer holding the role.
    pub fn check_access(viewer: Option<&User>, board: &Board) -> ServiceResult<()> {
        if board.is_visible_to(UserRole::User) {
            return Ok(());
        }

        match viewer {
            None => Err(ServiceError::unauthorized(format!(
                "board {} requires signing in",
                board.id
            ))),
            Some(user) if board.is_visible_to(user.role) => Ok(()),
            Some(_) => Err(DomainError::InsufficientRole(board.required_role).into()),
        }
    }

    /// Walk up from `parent_id`; reaching `board_id` means a cycle
    async fn ensure_no_cycle(&self, board_id: i64, parent_id: i64) -> ServiceResult<()> {
        let cycle = || DomainError::BoardCycle {
            board_id,
            parent_id,
        };

        let mut current = Some(parent_id);
        for _ in 0..MAX_BOARD_DEPTH {
            let Some(id) = current else {
                return Ok(());
            };
            if id == board_id {
                return Err(cycle().into());
            }
            current = self.require_board(id).await?.parent_id;
        }

        // Chains this deep are treated like cycles
        Err(cycle().into())
    }

    async fn require_board(&self, board_id: i64) -> ServiceResult<Board> {
        self.ctx
            .board_repo()
            .find_by_id(board_id)
            .await?
            .ok_or_else(|| DomainError::BoardNotFound(board_id).into())
    }

    fn require_admin(viewer: &User) -> ServiceResult<()> {
        if viewer.is_admin() {
            Ok(())
        } else {
            Err(DomainError::InsufficientRole(UserRole::Admin).into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestContext;

    #[tokio::test]
    async fn test_list_boards_by_role() {
        let t = TestContext::new();
        let free = t.seed_board("free", UserRole::User, None).await;
        let staff = t.seed_board("staff", UserRole::Admin, None).await;
        let service = BoardService::new(&t.ctx);

        let ids = |boards: Vec<Board>| boards.into_iter().map(|b| b.id).collect::<Vec<_>>();

        let user_view = service
            .list_boards(UserRole::User, BoardFilter::default())
            .await
            .unwrap();
        assert_eq!(ids(user_view), vec![free.id]);

        let admin_view = service
            .list_boards(UserRole::Admin, BoardFilter::default())
            .await
            .unwrap();
        assert_eq!(ids(admin_view), vec![free.id, staff.id]);
    }

    #[tokio::test]
    async fn test_list_boards_filters() {
        let t = TestContext::new();
        let parent = t.seed_board("community", UserRole::User, None).await;
        let child = t.seed_board("humor", UserRole::User, Some(parent.id)).await;
        t.seed_board("notice", UserRole::User, None).await;
        let service = BoardService::new(&t.ctx);

        let children = service
            .list_boards(
                UserRole::User,
                BoardFilter {
                    parent_id: Some(parent.id),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, child.id);

        let by_name = service
            .list_boards(
                UserRole::User,
                BoardFilter {
                    search_keyword: Some("hum".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);

        let err = service
            .list_boards(
                UserRole::User,
                BoardFilter {
                    search_keyword: Some("h".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_get_board_gates_by_role() {
        let t = TestContext::new();
        let staff = t.seed_board("staff", UserRole::Admin, None).await;
        let user = t.seed_user("user@example.com", UserRole::User).await;
        let admin = t.seed_user("admin@example.com", UserRole::Admin).await;
        let service = BoardService::new(&t.ctx);

        let err = service.get_board(None, staff.id).await.unwrap_err();
        assert_eq!(err.status_code(), 401);
        let err = service.get_board(Some(&user), staff.id).await.unwrap_err();
        assert_eq!(err.status_code(), 403);
        let board = service.get_board_by_slug(Some(&admin), "staff").await.unwrap();
        assert_eq!(board.id, staff.id);
    }

    #[tokio::test]
    async fn test_not_found_distinguishes_id_and_slug() {
        let t = TestContext::new();
        let service = BoardService::new(&t.ctx);

        let err = service.get_board(None, 99).await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Board not found: 99");

        let err = service.get_board_by_slug(None, "nope").await.unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "Board not found: slug nope");
    }

    #[tokio::test]
    async fn test_create_board_requires_admin_and_parent() {
        let t = TestContext::new();
        let user = t.seed_user("user@example.com", UserRole::User).await;
        let admin = t.seed_user("admin@example.com", UserRole::Admin).await;
        let service = BoardService::new(&t.ctx);

        let request = |parent_id| CreateBoardRequest {
            name: "Q&A".to_string(),
            slug: "qna".to_string(),
            description: Some("Questions".to_string()),
            parent_id,
            required_role: UserRole::User,
        };

        let err = service.create_board(&user, request(None)).await.unwrap_err();
        assert_eq!(err.status_code(), 403);

        let err = service.create_board(&admin, request(Some(42))).await.unwrap_err();
        assert_eq!(err.status_code(), 404);

        let board = service.create_board(&admin, request(None)).await.unwrap();
        assert_eq!(board.slug, "qna");
        assert!(board.is_top_level());

        let err = service.create_board(&admin, request(None)).await.unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[tokio::test]
    async fn test_update_board_rejects_cycles() {
        let t = TestContext::new();
        let admin = t.seed_user("admin@example.com", UserRole::Admin).await;
        let root = t.seed_board("root", UserRole::User, None).await;
        let mid = t.seed_board("mid", UserRole::User, Some(root.id)).await;
        let leaf = t.seed_board("leaf", UserRole::User, Some(mid.id)).await;
        let service = BoardService::new(&t.ctx);

        let reparent = |id, parent| UpdateBoardRequest {
            id,
            parent_id: Some(parent),
            ..Default::default()
        };

        // root under its own grandchild
        let err = service
            .update_board(&admin, reparent(root.id, Some(leaf.id)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Domain(DomainError::BoardCycle { .. })
        ));

        // a board under itself
        let err = service
            .update_board(&admin, reparent(mid.id, Some(mid.id)))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);

        // detaching and re-attaching elsewhere is fine
        let moved = service
            .update_board(&admin, reparent(leaf.id, None))
            .await
            .unwrap();
        assert!(moved.is_top_level());
        let moved = service
            .update_board(&admin, reparent(root.id, Some(leaf.id)))
            .await
            .unwrap();
        assert_eq!(moved.parent_id, Some(leaf.id));
    }

    #[tokio::test]
    async fn test_repository_refuses_moves_that_close_a_cycle() {
        use board_core::traits::BoardRepository;

        let t = TestContext::new();
        let a = t.seed_board("a", UserRole::User, None).await;
        let b = t.seed_board("b", UserRole::User, None).await;

        // two moves validated against the same snapshot: b under a, a under b
        let mut b_under_a = b.clone();
        b_under_a.parent_id = Some(a.id);
        let mut a_under_b = a.clone();
        a_under_b.parent_id = Some(b.id);

        t.boards.update(&b_under_a).await.unwrap();
        let err = t.boards.update(&a_under_b).await.unwrap_err();
        assert!(matches!(
            err,
            DomainError::BoardCycle { board_id, parent_id } if board_id == a.id && parent_id == b.id
        ));

        let stored = t.boards.find_by_id(a.id).await.unwrap().unwrap();
        assert!(stored.is_top_level());
    }
}

use async_graphql::{InputObject, MaybeUndefined};
use board_service::dto::{
    BoardFilter, CreateBoardRequest, CreatePostRequest, CreateUserRequest, LoginRequest,
    PostFilter, UpdateBoardRequest, UpdatePostRequest, UpdateUserRequest,
};

use super::UserRole;

#[derive(InputObject, Debug, Default)]
pub struct PostFilterInput {
    pub board_id: Option<i64>,
    pub author_id: Option<i64>,
    /// Case-insensitive match on title or content
    pub search_keyword: Option<String>,
    /// When set, results are ordered by view count
    pub min_view_count: Option<i32>,
    pub min_scrap_count: Option<i32>,
    pub skip: Option<i64>,
    pub take: Option<i64>,
}

impl From<PostFilterInput> for PostFilter {
    fn from(input: PostFilterInput) -> Self {
        Self {
            board_id: input.board_id,
            author_id: input.author_id,
            search_keyword: input.search_keyword,
            min_view_count: input.min_view_count,
            min_scrap_count: input.min_scrap_count,
            skip: input.skip,
            take: input.take,
        }
    }
}

/// Board listing filter. Role gating always follows the viewer.
#[derive(InputObject, Debug, Default)]
pub struct BoardFilterInput {
    pub parent_id: Option<i64>,
    pub slug: Option<String>,
    /// Case-insensitive match on the board name, at least 2 characters
    pub search_keyword: Option<String>,
}

impl From<BoardFilterInput> for BoardFilter {
    fn from(input: BoardFilterInput) -> Self {
        Self {
            parent_id: input.parent_id,
            slug: input.slug,
            search_keyword: input.search_keyword,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl From<LoginInput> for LoginRequest {
    fn from(input: LoginInput) -> Self {
        Self {
            email: input.email,
            password: input.password,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub name: String,
    #[graphql(default)]
    pub user_role: UserRole,
}

impl From<CreateUserInput> for CreateUserRequest {
    fn from(input: CreateUserInput) -> Self {
        Self {
            email: input.email,
            password: input.password,
            name: input.name,
            user_role: input.user_role.into(),
        }
    }
}

#[derive(InputObject, Debug)]
pub struct UpdateUserInput {
    pub id: i64,
    pub name: Option<String>,
    pub subscribe_email: Option<bool>,
    pub subscribe_sms: Option<bool>,
}

impl From<UpdateUserInput> for UpdateUserRequest {
    fn from(input: UpdateUserInput) -> Self {
        Self {
            id: input.id,
            name: input.name,
            subscribe_email: input.subscribe_email,
            subscribe_sms: input.subscribe_sms,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct CreatePostInput {
    pub title: String,
    pub content: String,
    pub board_id: i64,
}

impl From<CreatePostInput> for CreatePostRequest {
    fn from(input: CreatePostInput) -> Self {
        Self {
            title: input.title,
            content: input.content,
            board_id: input.board_id,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct UpdatePostInput {
    pub id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
    pub board_id: Option<i64>,
}

impl From<UpdatePostInput> for UpdatePostRequest {
    fn from(input: UpdatePostInput) -> Self {
        Self {
            id: input.id,
            title: input.title,
            content: input.content,
            board_id: input.board_id,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct CreateBoardInput {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    #[graphql(default)]
    pub required_role: UserRole,
}

impl From<CreateBoardInput> for CreateBoardRequest {
    fn from(input: CreateBoardInput) -> Self {
        Self {
            name: input.name,
            slug: input.slug,
            description: input.description,
            parent_id: input.parent_id,
            required_role: input.required_role.into(),
        }
    }
}

#[derive(InputObject, Debug)]
pub struct UpdateBoardInput {
    pub id: i64,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    /// Omit to keep the parent, pass null to make the board top-level
    pub parent_id: MaybeUndefined<i64>,
    pub required_role: Option<UserRole>,
}

impl From<UpdateBoardInput> for UpdateBoardRequest {
    fn from(input: UpdateBoardInput) -> Self {
        let parent_id = match input.parent_id {
            MaybeUndefined::Undefined => None,
            MaybeUndefined::Null => Some(None),
            MaybeUndefined::Value(id) => Some(Some(id)),
        };

        Self {
            id: input.id,
            name: input.name,
            slug: input.slug,
            description: input.description,
            parent_id,
            required_role: input.required_role.map(Into::into),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn update(parent_id: MaybeUndefined<i64>) -> UpdateBoardInput {
        UpdateBoardInput {
            id: 1,
            name: None,
            slug: None,
            description: None,
            parent_id,
            required_role: None,
        }
    }

    #[test]
    fn test_parent_id_distinguishes_null_from_missing() {
        let keep: UpdateBoardRequest = update(MaybeUndefined::Undefined).into();
        assert_eq!(keep.parent_id, None);

        let detach: UpdateBoardRequest = update(MaybeUndefined::Null).into();
        assert_eq!(detach.parent_id, Some(None));

        let moved: UpdateBoardRequest = update(MaybeUndefined::Value(7)).into();
        assert_eq!(moved.parent_id, Some(Some(7)));
    }

    #[test]
    fn test_create_user_role_maps_to_domain() {
        let request: CreateUserRequest = CreateUserInput {
            email: "a@example.com".to_string(),
            password: "Passw0rd!".to_string(),
            name: "A".to_string(),
            user_role: UserRole::Admin,
        }
        .into();
        assert_eq!(request.user_role, board_core::UserRole::Admin);
    }
}

//! Post model -> entity mapper

use board_core::entities::{Post, RankedPost};
use board_core::value_objects::Lifecycle;

use crate::models::{PostModel, RankedPostModel};

impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: model.id,
            title: model.title,
            content: model.content,
            view_count: model.view_count,
            scrap_count: model.scrap_count,
            search_count: model.search_count,
            popularity_score: model.popularity_score,
            author_id: model.author_id,
            board_id: model.board_id,
            lifecycle: Lifecycle::from_deleted_at(model.deleted_at),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<RankedPostModel> for RankedPost {
    fn from(model: RankedPostModel) -> Self {
        RankedPost {
            post: Post::from(model.post),
            rank: model.rank,
        }
    }
}

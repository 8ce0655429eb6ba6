//! Board model -> entity mapper

use board_core::entities::Board;
use board_core::error::DomainError;

use crate::models::BoardModel;

impl TryFrom<BoardModel> for Board {
    type Error = DomainError;

    fn try_from(model: BoardModel) -> Result<Self, Self::Error> {
        Ok(Board {
            id: model.id,
            name: model.name,
            slug: model.slug,
            description: model.description,
            parent_id: model.parent_id,
            required_role: model.required_role.parse()?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

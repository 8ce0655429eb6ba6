//! User model -> entity mapper

use board_core::entities::User;
use board_core::error::DomainError;
use board_core::value_objects::Lifecycle;

use crate::models::UserModel;

impl TryFrom<UserModel> for User {
    type Error = DomainError;

    fn try_from(model: UserModel) -> Result<Self, Self::Error> {
        Ok(User {
            id: model.id,
            email: model.email,
            name: model.name,
            role: model.user_role.parse()?,
            subscribe_email: model.subscribe_email,
            subscribe_sms: model.subscribe_sms,
            lifecycle: Lifecycle::from_flag(model.is_deleted, model.deleted_at),
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

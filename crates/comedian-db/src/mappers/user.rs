//! User entity <-> model mapper

use comedian_core::entities::{User, UserRole};

use crate::models::UserModel;

impl From<UserModel> for User {
    fn from(model: UserModel) -> Self {
        User {
            id: model.id,
            team_id: model.team_id,
            user_id: model.user_id,
            user_name: model.user_name,
            real_name: model.real_name,
            role: UserRole::from(model.role.as_str()),
            tz: model.tz,
        }
    }
}

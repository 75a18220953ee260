//! Standup entity <-> model mapper

use comedian_core::entities::Standup;

use crate::models::StandupModel;

impl From<StandupModel> for Standup {
    fn from(model: StandupModel) -> Self {
        Standup {
            id: model.id,
            team_id: model.team_id,
            channel_id: model.channel_id,
            user_id: model.user_id,
            comment: model.comment,
            message_ts: model.message_ts,
            created_at: model.created_at,
            modified_at: model.modified_at,
        }
    }
}

//! Standuper entity <-> model mapper

use comedian_core::entities::Standuper;
use comedian_core::value_objects::ChannelRole;

use crate::models::StanduperModel;

impl From<StanduperModel> for Standuper {
    fn from(model: StanduperModel) -> Self {
        Standuper {
            id: model.id,
            team_id: model.team_id,
            user_id: model.user_id,
            channel_id: model.channel_id,
            role: ChannelRole::from(model.role_in_channel.as_str()),
            created_at: model.created_at,
        }
    }
}

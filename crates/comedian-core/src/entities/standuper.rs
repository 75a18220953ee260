//! Standuper entity - a user assigned to report in a channel

use chrono::{DateTime, Utc};

use crate::value_objects::ChannelRole;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standuper {
    pub id: i64,
    pub team_id: String,
    pub user_id: String,
    pub channel_id: String,
    pub role: ChannelRole,
    pub created_at: DateTime<Utc>,
}

impl Standuper {
    pub fn new(team_id: String, user_id: String, channel_id: String, role: ChannelRole) -> Self {
        Self {
            id: 0,
            team_id,
            user_id,
            channel_id,
            role,
            created_at: Utc::now(),
        }
    }

    /// Slack mention markup
    pub fn mention(&self) -> String {
        format!("<@{}>", self.user_id)
    }
}

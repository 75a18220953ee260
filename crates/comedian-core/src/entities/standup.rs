//! Standup entity - one day's report from one user in one channel

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standup {
    pub id: i64,
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub comment: String,
    /// Slack `ts` of the message the standup came from
    pub message_ts: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Standup {
    pub fn new(
        team_id: String,
        channel_id: String,
        user_id: String,
        comment: String,
        message_ts: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            team_id,
            channel_id,
            user_id,
            comment,
            message_ts,
            created_at: now,
            modified_at: now,
        }
    }

    /// Replace the comment after the source message was edited
    pub fn edit(&mut self, comment: String) {
        self.comment = comment;
        self.modified_at = Utc::now();
    }
}

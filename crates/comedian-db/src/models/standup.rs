//! Standup database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for standups table
#[derive(Debug, Clone, FromRow)]
pub struct StandupModel {
    pub id: i64,
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub comment: String,
    pub message_ts: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

//! Channel database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for channels table
#[derive(Debug, Clone, FromRow)]
pub struct ChannelModel {
    pub id: i64,
    pub team_id: String,
    pub channel_id: String,
    pub channel_name: String,
    /// Seconds since local midnight, 0 when unset
    pub standup_deadline: i32,
    pub submission_days: i16,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
}

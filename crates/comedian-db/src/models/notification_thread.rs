//! Notification thread database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for notification_threads table
#[derive(Debug, Clone, FromRow)]
pub struct NotificationThreadModel {
    pub id: i64,
    pub channel_id: String,
    /// Comma-joined Slack user ids
    pub user_ids: String,
    pub notification_time: DateTime<Utc>,
    pub reminder_counter: i32,
}

//! Bot settings database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for bot_settings table
#[derive(Debug, Clone, FromRow)]
pub struct BotSettingsModel {
    pub id: i64,
    pub team_id: String,
    pub team_name: String,
    pub bot_user_id: String,
    pub bot_access_token: String,
    pub language: String,
    pub notifier_interval: i32,
    pub reminder_repeats_max: i32,
    pub reminder_time: i64,
    pub reminder_offset: i64,
    pub reporting_channel: String,
    /// Seconds since midnight in the bot timezone
    pub report_time: i32,
    pub individual_reports_on: bool,
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

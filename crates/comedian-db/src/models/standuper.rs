//! Standuper database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for standupers table
#[derive(Debug, Clone, FromRow)]
pub struct StanduperModel {
    pub id: i64,
    pub team_id: String,
    pub user_id: String,
    pub channel_id: String,
    pub role_in_channel: String,
    pub created_at: DateTime<Utc>,
}

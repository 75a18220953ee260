//! User database model

use sqlx::FromRow;

/// Database model for users table
#[derive(Debug, Clone, FromRow)]
pub struct UserModel {
    pub id: i64,
    pub team_id: String,
    pub user_id: String,
    pub user_name: String,
    pub real_name: String,
    /// `admin` or empty
    pub role: String,
    pub tz: String,
}

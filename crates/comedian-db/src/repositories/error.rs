//! Error handling utilities for repositories

use comedian_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Create a "channel not found" error
pub fn channel_not_found(channel_id: &str) -> DomainError {
    DomainError::ChannelNotFound(channel_id.to_string())
}

/// Create a "user not found" error
pub fn user_not_found(user_id: &str) -> DomainError {
    DomainError::UserNotFound(user_id.to_string())
}

/// Create a "standup not found" error
pub fn standup_not_found(message_ts: &str) -> DomainError {
    DomainError::StandupNotFound(message_ts.to_string())
}

//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::AccessLevel;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User {user_id} is not a standuper in channel {channel_id}")]
    StanduperNotFound { user_id: String, channel_id: String },

    #[error("Standuper not found: {0}")]
    StanduperIdNotFound(i64),

    #[error("Standup not found: {0}")]
    StandupNotFound(String),

    #[error("Timetable not found for standuper {0}")]
    TimeTableNotFound(i64),

    #[error("Notification thread not found: {0}")]
    NotificationThreadNotFound(i64),

    #[error("Bot settings not found for team {0}")]
    BotSettingsNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid user tag: {0}")]
    InvalidUserTag(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Access level {required} required")]
    AccessDenied { required: AccessLevel },

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Standup already submitted today")]
    StandupAlreadySubmitted,

    #[error("User {user_id} is already a standuper in channel {channel_id}")]
    StanduperAlreadyExists { user_id: String, channel_id: String },

    #[error("Channel already exists: {0}")]
    ChannelAlreadyExists(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Chat gateway error: {0}")]
    ChatGatewayError(String),

    #[error("Collector error: {0}")]
    CollectorError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::StanduperNotFound { .. } => "UNKNOWN_STANDUPER",
            Self::StanduperIdNotFound(_) => "UNKNOWN_STANDUPER",
            Self::StandupNotFound(_) => "UNKNOWN_STANDUP",
            Self::TimeTableNotFound(_) => "UNKNOWN_TIMETABLE",
            Self::NotificationThreadNotFound(_) => "UNKNOWN_NOTIFICATION_THREAD",
            Self::BotSettingsNotFound(_) => "UNKNOWN_BOT",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidTime(_) => "INVALID_TIME",
            Self::InvalidDate(_) => "INVALID_DATE",
            Self::InvalidUserTag(_) => "INVALID_USER_TAG",
            Self::InvalidRole(_) => "INVALID_ROLE",

            // Authorization
            Self::AccessDenied { .. } => "ACCESS_DENIED",

            // Conflict
            Self::StandupAlreadySubmitted => "STANDUP_ALREADY_SUBMITTED",
            Self::StanduperAlreadyExists { .. } => "STANDUPER_ALREADY_EXISTS",
            Self::ChannelAlreadyExists(_) => "CHANNEL_ALREADY_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::ChatGatewayError(_) => "CHAT_GATEWAY_ERROR",
            Self::CollectorError(_) => "COLLECTOR_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ChannelNotFound(_)
                | Self::UserNotFound(_)
                | Self::StanduperNotFound { .. }
                | Self::StanduperIdNotFound(_)
                | Self::StandupNotFound(_)
                | Self::TimeTableNotFound(_)
                | Self::NotificationThreadNotFound(_)
                | Self::BotSettingsNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidTime(_)
                | Self::InvalidDate(_)
                | Self::InvalidUserTag(_)
                | Self::InvalidRole(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::StandupAlreadySubmitted
                | Self::StanduperAlreadyExists { .. }
                | Self::ChannelAlreadyExists(_)
        )
    }

    /// Check if this came from an external system (store, Slack, collector)
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::DatabaseError(_) | Self::ChatGatewayError(_) | Self::CollectorError(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::ChannelNotFound("C123".to_string());
        assert_eq!(err.code(), "UNKNOWN_CHANNEL");

        let err = DomainError::AccessDenied {
            required: AccessLevel::Pm,
        };
        assert_eq!(err.code(), "ACCESS_DENIED");
    }

    #[test]
    fn test_is_not_found() {
        assert!(DomainError::ChannelNotFound("C1".to_string()).is_not_found());
        assert!(DomainError::StanduperNotFound {
            user_id: "U1".to_string(),
            channel_id: "C1".to_string(),
        }
        .is_not_found());
        assert!(!DomainError::StandupAlreadySubmitted.is_not_found());
    }

    #[test]
    fn test_classifiers() {
        assert!(DomainError::InvalidDate("2024-13-01".to_string()).is_validation());
        assert!(DomainError::AccessDenied {
            required: AccessLevel::Admin
        }
        .is_authorization());
        assert!(DomainError::StandupAlreadySubmitted.is_conflict());
        assert!(DomainError::CollectorError("timeout".to_string()).is_upstream());
        assert!(!DomainError::InternalError("x".to_string()).is_upstream());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::AccessDenied {
            required: AccessLevel::Pm,
        };
        assert_eq!(err.to_string(), "Access level 3 required");

        let err = DomainError::StanduperNotFound {
            user_id: "U1".to_string(),
            channel_id: "C1".to_string(),
        };
        assert_eq!(err.to_string(), "User U1 is not a standuper in channel C1");
    }
}

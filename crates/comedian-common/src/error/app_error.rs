//! Application error types
//!
//! Errors that reach the HTTP edge or abort a binary at startup.

use comedian_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Slash command request signed with the wrong token
    #[error("Invalid verification token")]
    InvalidVerificationToken,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Slash command that this bot does not serve
    #[error("Command not implemented: {0}")]
    NotImplemented(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::InvalidVerificationToken => 401,
            Self::NotFound(_) => 404,
            Self::NotImplemented(_) => 501,
            Self::Database(_) | Self::Internal(_) | Self::Config(_) => 500,
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_authorization() {
                    403
                } else if e.is_validation() {
                    400
                } else if e.is_conflict() {
                    409
                } else {
                    500
                }
            }
        }
    }

    /// Machine readable code for response bodies
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidVerificationToken => "INVALID_VERIFICATION_TOKEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Domain(e) => e.code(),
        }
    }
}

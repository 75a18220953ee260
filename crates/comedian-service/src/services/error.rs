//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use comedian_common::AppError;
use comedian_core::{AccessLevel, DomainError};
use std::fmt;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or repository failure
    Domain(DomainError),

    /// Application error
    App(AppError),

    /// Resource not found
    NotFound { resource: &'static str, id: String },

    /// Caller's access level is not enough
    AccessDenied { required: AccessLevel },

    /// Validation error
    Validation(String),

    /// Slash command this bot does not serve
    UnsupportedCommand(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::App(e) => write!(f, "{e}"),
            Self::NotFound { resource, id } => write!(f, "{resource} not found: {id}"),
            Self::AccessDenied { required } => write!(f, "Access level {required} required"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::UnsupportedCommand(cmd) => write!(f, "Unsupported command: {cmd}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::App(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a not found error
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
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
            Self::App(e) => e.status_code(),
            Self::NotFound { .. } => 404,
            Self::AccessDenied { .. } => 403,
            Self::Validation(_) => 400,
            Self::UnsupportedCommand(_) => 501,
            Self::Internal(_) => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::NotFound { .. } => "NOT_FOUND",
            Self::AccessDenied { .. } => "ACCESS_DENIED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UnsupportedCommand(_) => "NOT_IMPLEMENTED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::NotFound { resource, id } => {
                AppError::NotFound(format!("{resource} {id}"))
            }
            ServiceError::AccessDenied { required } => {
                AppError::Domain(DomainError::AccessDenied { required })
            }
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::UnsupportedCommand(cmd) => AppError::NotImplemented(cmd),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_error() {
        let err = ServiceError::not_found("Channel", "C1");
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(err.to_string().contains("Channel not found: C1"));
    }

    #[test]
    fn test_unsupported_command() {
        let err = ServiceError::UnsupportedCommand("/weather".to_string());
        assert_eq!(err.status_code(), 501);
        let app: AppError = err.into();
        assert_eq!(app.status_code(), 501);
    }

    #[test]
    fn test_domain_status_codes() {
        let err = ServiceError::from(DomainError::DatabaseError("down".to_string()));
        assert_eq!(err.status_code(), 500);

        let err = ServiceError::from(DomainError::UserNotFound("U1".to_string()));
        assert_eq!(err.status_code(), 404);

        let err = ServiceError::from(DomainError::InvalidTime("25:00".to_string()));
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_convert_to_app_error() {
        let service_err = ServiceError::validation("missing team_id");
        let app_err: AppError = service_err.into();
        assert_eq!(app_err.status_code(), 400);
    }
}

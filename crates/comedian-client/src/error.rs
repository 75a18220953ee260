//! Error types for outbound HTTP clients

use comedian_core::error::DomainError;
use thiserror::Error;

/// Errors that can occur when talking to Slack or the Collector
#[derive(Error, Debug)]
pub enum ClientError {
    /// Slack answered `ok: false`
    #[error("Slack API error in {method}: {code}")]
    Api { method: String, code: String },

    #[error("Rate limited: retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Non-success HTTP status
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("JSON error: {0}")]
    Json(String),

    /// Response parsed but a required field was missing
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Network(_) | Self::Timeout(_) => true,
            Self::Http { status, .. } => *status >= 500,
            Self::Api { code, .. } => matches!(
                code.as_str(),
                "ratelimited" | "service_unavailable" | "internal_error" | "request_timeout"
            ),
            Self::Json(_) | Self::InvalidResponse(_) => false,
        }
    }

    pub fn into_chat_error(self) -> DomainError {
        DomainError::ChatGatewayError(self.to_string())
    }

    pub fn into_collector_error(self) -> DomainError {
        DomainError::CollectorError(self.to_string())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout(err.to_string())
        } else if err.is_connect() {
            ClientError::Network(format!("Connection failed: {err}"))
        } else if err.is_decode() {
            ClientError::Json(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Json(err.to_string())
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClientError::RateLimited {
            retry_after_secs: 60,
        };
        assert_eq!(err.to_string(), "Rate limited: retry after 60 seconds");

        let err = ClientError::Api {
            method: "chat.postMessage".to_string(),
            code: "channel_not_found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Slack API error in chat.postMessage: channel_not_found"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ClientError::Timeout("t".to_string()).is_retryable());
        assert!(ClientError::Http {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!ClientError::Http {
            status: 404,
            body: String::new()
        }
        .is_retryable());
        assert!(!ClientError::Api {
            method: "auth.test".to_string(),
            code: "invalid_auth".to_string()
        }
        .is_retryable());
    }

    #[test]
    fn test_domain_mapping() {
        let err = ClientError::Network("down".to_string()).into_chat_error();
        assert!(err.is_upstream());
        assert!(matches!(err, DomainError::ChatGatewayError(_)));

        let err = ClientError::Timeout("slow".to_string()).into_collector_error();
        assert!(matches!(err, DomainError::CollectorError(_)));
    }
}

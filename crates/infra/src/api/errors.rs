//! API-specific error types
//!
//! Classifies the outcome of a gateway call. Only [`ApiError::SessionExpired`]
//! means the session is gone; every other variant leaves it intact.

use std::time::Duration;

use labgate_domain::{LabGateError, RefreshFailure};
use reqwest::StatusCode;
use thiserror::Error;

/// Categories of API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// 401 after a refresh, or the refresh itself failed
    Authentication,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except 401 and 429)
    Client,
    /// Network/connection errors and timeouts
    Network,
    /// Configuration errors
    Config,
    /// Local token storage or body (de)serialization errors
    Local,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Rejected again after a refresh-triggered replay.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The refresh failed; storage has been cleared and the host notified.
    #[error("Session expired: {0}")]
    SessionExpired(RefreshFailure),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Unauthorized(_) | Self::SessionExpired(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
            Self::Serialization(_) | Self::Storage(_) => ApiErrorCategory::Local,
        }
    }

    /// Whether the session was torn down by this failure
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::SessionExpired(_))
    }

    /// Classify a non-success response.
    pub fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        let message = if body.is_empty() {
            format!("{} returned status {}", url, status)
        } else {
            format!("{} returned status {}: {}", url, status, body)
        };

        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized(message)
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimit(message)
        } else if status.is_server_error() {
            Self::Server(message)
        } else if status.is_client_error() {
            Self::Client(message)
        } else {
            Self::Network(message)
        }
    }
}

impl From<LabGateError> for ApiError {
    fn from(err: LabGateError) -> Self {
        match err {
            LabGateError::Network(message) => Self::Network(message),
            LabGateError::Auth(message) => Self::Unauthorized(message),
            LabGateError::Config(message) => Self::Config(message),
            LabGateError::InvalidInput(message) => Self::Client(message),
            LabGateError::Serialization(message) => Self::Serialization(message),
            LabGateError::Storage(message) => Self::Storage(message),
            LabGateError::Internal(message) => Self::Server(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            ApiError::Unauthorized("test".to_string()).category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(
            ApiError::SessionExpired(RefreshFailure::MissingRefreshToken).category(),
            ApiErrorCategory::Authentication
        );
        assert_eq!(ApiError::RateLimit("test".to_string()).category(), ApiErrorCategory::RateLimit);
        assert_eq!(ApiError::Server("test".to_string()).category(), ApiErrorCategory::Server);
        assert_eq!(ApiError::Timeout(Duration::from_secs(1)).category(), ApiErrorCategory::Network);
        assert_eq!(ApiError::Storage("test".to_string()).category(), ApiErrorCategory::Local);
    }

    #[test]
    fn test_only_refresh_failure_expires_session() {
        assert!(ApiError::SessionExpired(RefreshFailure::Abandoned).is_session_expired());
        assert!(!ApiError::Unauthorized("again".to_string()).is_session_expired());
    }

    #[test]
    fn test_status_classification() {
        let url = "http://localhost/api/samples";
        assert!(matches!(
            ApiError::from_status(StatusCode::UNAUTHORIZED, url, ""),
            ApiError::Unauthorized(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::TOO_MANY_REQUESTS, url, ""),
            ApiError::RateLimit(_)
        ));
        assert!(matches!(
            ApiError::from_status(StatusCode::BAD_GATEWAY, url, ""),
            ApiError::Server(_)
        ));
        match ApiError::from_status(StatusCode::NOT_FOUND, url, "no such sample") {
            ApiError::Client(message) => assert!(message.ends_with("404 Not Found: no such sample")),
            other => panic!("expected client error, got {other:?}"),
        }
    }
}

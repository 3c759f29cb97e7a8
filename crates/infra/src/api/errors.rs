//! API-specific error types
//!
//! Provides error classification for API operations.

use std::time::Duration;

use thiserror::Error;
use worklens_domain::WorkLensError;

/// Categories of API errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Authentication errors (401, 403)
    Authentication,
    /// Conflicts (409), e.g. duplicate email/domain on registration
    Conflict,
    /// Rate limiting errors (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except auth/conflict)
    Client,
    /// Network/connection errors
    Network,
    /// Configuration errors
    Config,
}

/// API operation errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Conflict: {0}")]
    Conflict(String),

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
}

impl ApiError {
    /// Get the error category for this error
    pub fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Auth(_) => ApiErrorCategory::Authentication,
            Self::Conflict(_) => ApiErrorCategory::Conflict,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }
}

impl From<WorkLensError> for ApiError {
    fn from(err: WorkLensError) -> Self {
        match err {
            WorkLensError::Network(message) => Self::Network(message),
            WorkLensError::Auth(message) => Self::Auth(message),
            WorkLensError::Conflict(message) => Self::Conflict(message),
            WorkLensError::Config(message) => Self::Config(message),
            WorkLensError::NotFound(message) | WorkLensError::InvalidInput(message) => {
                Self::Client(message)
            }
            WorkLensError::Platform(message) | WorkLensError::Internal(message) => {
                Self::Server(message)
            }
        }
    }
}

impl From<ApiError> for WorkLensError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Auth(message) => Self::Auth(message),
            ApiError::Conflict(message) => Self::Conflict(message),
            ApiError::RateLimit(message) | ApiError::Server(message) | ApiError::Network(message) => {
                Self::Network(message)
            }
            ApiError::Client(message) => Self::InvalidInput(message),
            ApiError::Config(message) => Self::Config(message),
            ApiError::Timeout(duration) => Self::Network(format!("timeout after {duration:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_categories() {
        assert_eq!(ApiError::Auth("x".into()).category(), ApiErrorCategory::Authentication);
        assert_eq!(ApiError::Conflict("x".into()).category(), ApiErrorCategory::Conflict);
        assert_eq!(ApiError::RateLimit("x".into()).category(), ApiErrorCategory::RateLimit);
        assert_eq!(ApiError::Server("x".into()).category(), ApiErrorCategory::Server);
        assert_eq!(ApiError::Network("x".into()).category(), ApiErrorCategory::Network);
        assert_eq!(
            ApiError::Timeout(Duration::from_secs(5)).category(),
            ApiErrorCategory::Network
        );
    }

    #[test]
    fn conflicts_round_trip_through_domain_errors() {
        let domain: WorkLensError = ApiError::Conflict("email taken".into()).into();
        assert!(matches!(domain, WorkLensError::Conflict(_)));
        let api: ApiError = domain.into();
        assert_eq!(api.category(), ApiErrorCategory::Conflict);
    }
}

//! Error taxonomy shared by every live data source.

use thiserror::Error;

/// Failure of a whole feed request.
///
/// Record-level anomalies (one bad TLE triplet, one malformed GeoJSON
/// feature) never surface here; they are dropped by the parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FeedError {
    /// Malformed URL or parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Transport-level failure (DNS, connect, reset)
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    /// Explicit HTTP 429
    #[error("Rate limited - try again in 10 seconds")]
    RateLimited,

    /// Explicit HTTP 503
    #[error("Service temporarily unavailable")]
    ServiceUnavailable,

    /// Any other non-success status
    #[error("HTTP error: {0}")]
    Http(u16),

    /// Payload did not match the expected schema
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

pub type FeedResult<T> = Result<T, FeedError>;

impl FeedError {
    /// Classify a non-success HTTP status
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            429 => FeedError::RateLimited,
            503 => FeedError::ServiceUnavailable,
            code => FeedError::Http(code),
        }
    }

    /// Whether retrying later could reasonably succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FeedError::Network(_)
                | FeedError::Timeout
                | FeedError::RateLimited
                | FeedError::ServiceUnavailable
        )
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FeedError::Timeout
        } else if e.is_builder() {
            FeedError::InvalidRequest(e.to_string())
        } else if e.is_decode() {
            FeedError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FeedError::from_status(status)
        } else {
            FeedError::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        FeedError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status() {
        assert_eq!(FeedError::from_status(StatusCode::TOO_MANY_REQUESTS), FeedError::RateLimited);
        assert_eq!(
            FeedError::from_status(StatusCode::SERVICE_UNAVAILABLE),
            FeedError::ServiceUnavailable
        );
        assert_eq!(FeedError::from_status(StatusCode::NOT_FOUND), FeedError::Http(404));
        assert_eq!(FeedError::from_status(StatusCode::BAD_GATEWAY), FeedError::Http(502));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(FeedError::Http(500).to_string(), "HTTP error: 500");
        assert_eq!(FeedError::Timeout.to_string(), "Request timed out");
        assert!(FeedError::RateLimited.to_string().starts_with("Rate limited"));
    }

    #[test]
    fn test_decode_from_serde() {
        let err: FeedError = serde_json::from_str::<Vec<u8>>("{").unwrap_err().into();
        assert!(matches!(err, FeedError::Decode(_)));
        assert!(!err.is_transient());
        assert!(FeedError::Timeout.is_transient());
    }
}

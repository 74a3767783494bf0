//! Error taxonomy for the generation client

/// Classified failure of a generation request.
///
/// The retry loop only ever re-attempts [`is_retryable`] classes; a bad
/// key or an unparseable body fails the same way no matter how often it
/// is retried.
///
/// [`is_retryable`]: ApiError::is_retryable
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The endpoint rejected the API key (HTTP 401/403)
    #[error("API key rejected, check your configured key")]
    Authentication,

    /// The endpoint throttled us (HTTP 429)
    #[error("rate limited by the API, try again later")]
    RateLimited,

    /// The endpoint failed server-side (HTTP 5xx)
    #[error("API server error: {0}")]
    Server(String),

    /// No response within the configured deadline
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// Could not reach the endpoint at all
    #[error("network error: {0}")]
    Network(String),

    /// The response arrived but was not in the expected shape
    #[error("failed to parse API response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Transient failures worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Server(_) | ApiError::Timeout(_) | ApiError::Network(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classes() {
        assert!(ApiError::Server("HTTP 502".into()).is_retryable());
        assert!(ApiError::Timeout(60).is_retryable());
        assert!(ApiError::Network("connection refused".into()).is_retryable());

        assert!(!ApiError::Authentication.is_retryable());
        assert!(!ApiError::RateLimited.is_retryable());
        assert!(!ApiError::Parse("bad json".into()).is_retryable());
    }
}

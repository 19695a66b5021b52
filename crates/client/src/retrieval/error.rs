//! Retrieval API client error types.

use std::sync::Arc;

/// Errors from the semantic retrieval API client.
#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the retrieval API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),
}

impl RetrievalError {
    /// Stable error code carried into backend-error responses.
    pub fn code(&self) -> &'static str {
        match self {
            RetrievalError::AuthError => "AccessDenied",
            RetrievalError::RateLimited => "Throttling",
            RetrievalError::HttpError { .. } => "HttpError",
            RetrievalError::Timeout => "Timeout",
            RetrievalError::Network(_) => "Network",
            RetrievalError::Parse(_) => "Parse",
        }
    }
}

impl From<reqwest::Error> for RetrievalError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { RetrievalError::Timeout } else { RetrievalError::Network(Arc::new(err)) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_and_codes() {
        let err = RetrievalError::AuthError;
        assert!(err.to_string().contains("authentication"));
        assert_eq!(err.code(), "AccessDenied");

        let err = RetrievalError::HttpError { status: 502 };
        assert!(err.to_string().contains("502"));
        assert_eq!(err.code(), "HttpError");
    }
}

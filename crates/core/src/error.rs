//! Unified error types for the podcast search server.
//!
//! Every fault carries a machine-readable kind, a human-readable message,
//! and a suggested next action; the router folds these into the response
//! envelope so raw faults never reach the caller.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the podcast search server.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed or out-of-order caller input.
    #[error("VALIDATION_ERROR: {0}")]
    Validation(String),

    /// Deterministic lookup miss.
    #[error("NOT_FOUND: {0}")]
    NotFound(String),

    /// A required external capability is not configured.
    #[error("CONFIGURATION_ERROR: {0}")]
    Configuration(String),

    /// The semantic retrieval backend call failed; code and message are
    /// preserved from the backend.
    #[error("BACKEND_ERROR: {code}: {message}")]
    Backend { code: String, message: String },

    /// Feed refresh failed and no prior snapshot exists to serve.
    #[error("FEED_UNAVAILABLE: {0}")]
    FeedUnavailable(String),

    /// The feed document could not be parsed at all.
    #[error("FEED_PARSE_ERROR: {0}")]
    FeedParse(String),

    /// Unexpected internal fault, catch-all.
    #[error("SERVER_ERROR: {0}")]
    Server(String),
}

impl Error {
    /// Machine-readable error kind used in the response envelope.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "ValidationError",
            Error::NotFound(_) => "NotFoundError",
            Error::Configuration(_) => "ConfigurationError",
            Error::Backend { .. } => "BackendError",
            Error::FeedUnavailable(_) | Error::FeedParse(_) | Error::Server(_) => "ServerError",
        }
    }

    /// Human-readable message without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            Error::Validation(msg)
            | Error::NotFound(msg)
            | Error::Configuration(msg)
            | Error::FeedUnavailable(msg)
            | Error::FeedParse(msg)
            | Error::Server(msg) => msg.clone(),
            Error::Backend { code, message } => format!("{code}: {message}"),
        }
    }

    /// Suggested next action for the caller.
    pub fn suggested_action(&self) -> &'static str {
        match self {
            Error::Validation(_) => "Check the query format and try again",
            Error::NotFound(_) => "Check the episode number and try again",
            Error::Configuration(_) => "Set the missing configuration and restart the server",
            Error::Backend { .. } => "Check the retrieval backend configuration and credentials",
            Error::FeedUnavailable(_) => "Check the feed URL and network connectivity",
            Error::FeedParse(_) | Error::Server(_) => "Try rephrasing your query or check server logs",
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::Validation(msg) => (-32602, msg.clone()),
            Error::NotFound(msg) => (-32001, msg.clone()),
            Error::Configuration(msg) => (-32002, msg.clone()),
            Error::Backend { code, message } => (-32010, format!("{code}: {message}")),
            Error::FeedUnavailable(msg) => (-32011, msg.clone()),
            Error::FeedParse(msg) => (-32012, msg.clone()),
            Error::Server(msg) => (-32000, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_kind_prefix() {
        let err = Error::NotFound("Episode 341 not found".to_string());
        assert!(err.to_string().contains("NOT_FOUND"));
        assert!(err.to_string().contains("341"));
    }

    #[test]
    fn test_kind_and_message() {
        let err = Error::Validation("bad date".to_string());
        assert_eq!(err.kind(), "ValidationError");
        assert_eq!(err.message(), "bad date");

        let err = Error::Backend { code: "ThrottlingException".to_string(), message: "slow down".to_string() };
        assert_eq!(err.kind(), "BackendError");
        assert!(err.message().contains("ThrottlingException"));
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::NotFound("Episode 12 not found".to_string());
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32001);
    }
}

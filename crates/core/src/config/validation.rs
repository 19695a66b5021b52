//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `feed_url` or `user_agent` is empty
    /// - `feed_ttl_secs` or `semantic_ttl_secs` is 0
    /// - `max_semantic_results` is 0 or exceeds 50
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `feed_max_bytes` is 0 or exceeds 50MB
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feed_url.is_empty() {
            return Err(ConfigError::Invalid { field: "feed_url".into(), reason: "must not be empty".into() });
        }

        if self.feed_ttl_secs == 0 {
            return Err(ConfigError::Invalid { field: "feed_ttl_secs".into(), reason: "must be positive".into() });
        }
        if self.semantic_ttl_secs == 0 {
            return Err(ConfigError::Invalid { field: "semantic_ttl_secs".into(), reason: "must be positive".into() });
        }

        if self.max_semantic_results == 0 || self.max_semantic_results > 50 {
            return Err(ConfigError::Invalid {
                field: "max_semantic_results".into(),
                reason: "must be between 1 and 50".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.feed_max_bytes == 0 {
            return Err(ConfigError::Invalid { field: "feed_max_bytes".into(), reason: "must be greater than 0".into() });
        }
        if self.feed_max_bytes > 50 * 1024 * 1024 {
            return Err(ConfigError::Invalid { field: "feed_max_bytes".into(), reason: "must not exceed 50MB".into() });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.retrieval_api_key.is_some() && self.retrieval_api_url.is_none() {
            tracing::warn!("retrieval_api_key is set but retrieval_api_url is not; semantic search stays disabled");
        }

        Ok(())
    }
}

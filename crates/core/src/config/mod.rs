//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (MCP_PODCAST_*)
//! 2. TOML config file (if MCP_PODCAST_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (MCP_PODCAST_*)
/// 2. TOML config file (if MCP_PODCAST_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// URL of the syndication feed holding the episode catalog.
    ///
    /// Set via MCP_PODCAST_FEED_URL environment variable.
    #[serde(default = "default_feed_url")]
    pub feed_url: String,

    /// Feed snapshot time-to-live in seconds.
    ///
    /// Set via MCP_PODCAST_FEED_TTL_SECS environment variable.
    #[serde(default = "default_feed_ttl_secs")]
    pub feed_ttl_secs: u64,

    /// Maximum bytes to accept when fetching the feed document.
    ///
    /// Set via MCP_PODCAST_FEED_MAX_BYTES environment variable.
    #[serde(default = "default_feed_max_bytes")]
    pub feed_max_bytes: usize,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via MCP_PODCAST_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via MCP_PODCAST_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Base URL of the semantic retrieval API.
    ///
    /// Set via MCP_PODCAST_RETRIEVAL_API_URL environment variable.
    /// Required only when semantic search is used; when absent, semantic
    /// queries answer with a ConfigurationError envelope.
    #[serde(default)]
    pub retrieval_api_url: Option<String>,

    /// API key for the semantic retrieval API.
    ///
    /// Set via MCP_PODCAST_RETRIEVAL_API_KEY environment variable.
    #[serde(default)]
    pub retrieval_api_key: Option<String>,

    /// Maximum number of semantic search results per query.
    ///
    /// Set via MCP_PODCAST_MAX_SEMANTIC_RESULTS environment variable.
    #[serde(default = "default_max_semantic_results")]
    pub max_semantic_results: usize,

    /// Semantic result cache time-to-live in seconds.
    ///
    /// Set via MCP_PODCAST_SEMANTIC_TTL_SECS environment variable.
    #[serde(default = "default_semantic_ttl_secs")]
    pub semantic_ttl_secs: u64,

    /// Character budget for semantic result excerpts.
    ///
    /// Set via MCP_PODCAST_EXCERPT_MAX_CHARS environment variable.
    #[serde(default = "default_excerpt_max_chars")]
    pub excerpt_max_chars: usize,
}

fn default_feed_url() -> String {
    "https://podcast.example.com/feed.xml".into()
}

fn default_feed_ttl_secs() -> u64 {
    3600
}

fn default_feed_max_bytes() -> usize {
    10_485_760 // 10MB
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_user_agent() -> String {
    "mcp-podcast/0.1".into()
}

fn default_max_semantic_results() -> usize {
    10
}

fn default_semantic_ttl_secs() -> u64 {
    300
}

fn default_excerpt_max_chars() -> usize {
    500
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            feed_ttl_secs: default_feed_ttl_secs(),
            feed_max_bytes: default_feed_max_bytes(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            retrieval_api_url: None,
            retrieval_api_key: None,
            max_semantic_results: default_max_semantic_results(),
            semantic_ttl_secs: default_semantic_ttl_secs(),
            excerpt_max_chars: default_excerpt_max_chars(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Feed snapshot TTL as Duration.
    pub fn feed_ttl(&self) -> Duration {
        Duration::from_secs(self.feed_ttl_secs)
    }

    /// Semantic cache TTL as Duration.
    pub fn semantic_ttl(&self) -> Duration {
        Duration::from_secs(self.semantic_ttl_secs)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `MCP_PODCAST_`
    /// 2. TOML file from `MCP_PODCAST_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("MCP_PODCAST_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("MCP_PODCAST_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the semantic retrieval backend is configured (for deferred
    /// validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the retrieval API URL is not set.
    pub fn require_retrieval_api_url(&self) -> Result<&str, ConfigError> {
        self.retrieval_api_url.as_deref().ok_or_else(|| ConfigError::Missing {
            field: "retrieval_api_url".into(),
            hint: "Set MCP_PODCAST_RETRIEVAL_API_URL environment variable".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.feed_url, "https://podcast.example.com/feed.xml");
        assert_eq!(config.feed_ttl_secs, 3600);
        assert_eq!(config.feed_max_bytes, 10_485_760);
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.user_agent, "mcp-podcast/0.1");
        assert_eq!(config.max_semantic_results, 10);
        assert_eq!(config.semantic_ttl_secs, 300);
        assert_eq!(config.excerpt_max_chars, 500);
        assert!(config.retrieval_api_url.is_none());
        assert!(config.retrieval_api_key.is_none());
    }

    #[test]
    fn test_timeout_durations() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
        assert_eq!(config.feed_ttl(), Duration::from_secs(3600));
        assert_eq!(config.semantic_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_require_retrieval_api_url_missing() {
        let config = AppConfig::default();
        let result = config.require_retrieval_api_url();
        assert!(matches!(result, Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_retrieval_api_url_present() {
        let config =
            AppConfig { retrieval_api_url: Some("https://retrieval.example.com".into()), ..Default::default() };
        let result = config.require_retrieval_api_url();
        assert_eq!(result.unwrap(), "https://retrieval.example.com");
    }
}

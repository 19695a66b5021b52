//! Semantic retrieval API client.
//!
//! Talks to the vector retrieval endpoint that indexes episode transcripts
//! and returns scored passages with episode metadata. The shaping of raw
//! passages into search results lives in the core crate; this client only
//! handles transport, authentication, and response normalization.

pub mod error;
pub mod response;

pub use error::RetrievalError;
pub use response::{RetrievalApiResponse, RetrievalResult};

use async_trait::async_trait;
use reqwest::header;
use std::time::{Duration, Instant};

use podsearch_core::Error;
use podsearch_core::search::{RetrievedPassage, SemanticBackend};

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "mcp-podcast/0.1";

/// Retrieval API client configuration.
#[derive(Debug, Clone)]
pub struct RetrievalConfig {
    /// Retrieval endpoint URL.
    pub api_url: String,
    /// Bearer token, when the endpoint requires one.
    pub api_key: Option<String>,
    /// Request timeout (default: 10s).
    pub timeout: Duration,
    /// User-agent string (default: mcp-podcast/0.x).
    pub user_agent: String,
}

impl RetrievalConfig {
    pub fn new(api_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            api_url: api_url.into(),
            api_key,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
struct RetrieveRequest<'a> {
    query: &'a str,
    max_results: usize,
}

/// Retrieval API client.
#[derive(Debug, Clone)]
pub struct RetrievalClient {
    http: reqwest::Client,
    config: RetrievalConfig,
}

impl RetrievalClient {
    /// Create a new retrieval client with the given configuration.
    pub fn new(config: RetrievalConfig) -> Result<Self, RetrievalError> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self { http, config })
    }

    /// Execute a retrieval query against the endpoint.
    pub async fn query(&self, query: &str, max_results: usize) -> Result<Vec<RetrievedPassage>, RetrievalError> {
        let start = Instant::now();

        tracing::debug!("querying retrieval API: query={query}");

        let mut request = self
            .http
            .post(&self.config.api_url)
            .header("Accept", "application/json")
            .header(header::USER_AGENT, &self.config.user_agent)
            .json(&RetrieveRequest { query, max_results });

        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let http_response = request.send().await?;

        let status = http_response.status();
        tracing::debug!("retrieval API response status: {status}");

        if status == 401 || status == 403 {
            return Err(RetrievalError::AuthError);
        }

        if status == 429 {
            return Err(RetrievalError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(RetrievalError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let api_response: RetrievalApiResponse =
            serde_json::from_slice(&bytes).map_err(|e| RetrievalError::Parse(e.to_string()))?;

        tracing::debug!("retrieval completed in {:?}, {} passages", start.elapsed(), api_response.results.len());

        Ok(api_response.results.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl SemanticBackend for RetrievalClient {
    async fn retrieve(&self, query: &str, max_results: usize) -> Result<Vec<RetrievedPassage>, Error> {
        self.query(query, max_results)
            .await
            .map_err(|e| Error::Backend { code: e.code().to_string(), message: e.to_string() })
    }
}

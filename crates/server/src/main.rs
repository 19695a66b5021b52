//! mcp-podcast server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

use podsearch_client::{FeedClient, FetchConfig, RetrievalClient, RetrievalConfig};
use podsearch_core::config::AppConfig;
use podsearch_core::feed::{FeedCache, RetryPolicy};
use podsearch_core::search::{SearchRouter, SemanticSearchCache};

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;

    tracing::info!(feed_url = %config.feed_url, "Starting mcp-podcast server on stdio transport");

    let fetch_config = FetchConfig {
        user_agent: config.user_agent.clone(),
        max_bytes: config.feed_max_bytes,
        timeout: config.timeout(),
        ..Default::default()
    };
    let feed_client = FeedClient::new(&config.feed_url, fetch_config)?;
    let feed = Arc::new(FeedCache::new(Arc::new(feed_client), config.feed_ttl(), RetryPolicy::standard()));

    let semantic = match config.require_retrieval_api_url() {
        Ok(api_url) => {
            let retrieval =
                RetrievalClient::new(RetrievalConfig::new(api_url, config.retrieval_api_key.clone()))?;
            Some(Arc::new(SemanticSearchCache::new(
                Arc::new(retrieval),
                config.max_semantic_results,
                config.semantic_ttl(),
                config.excerpt_max_chars,
            )))
        }
        Err(reason) => {
            tracing::info!(%reason, "semantic search disabled");
            None
        }
    };

    let search_router = Arc::new(SearchRouter::new(feed.clone(), semantic.clone()));

    // Pre-warm the episode catalog so first queries answer from memory.
    // A failed initial fetch is not fatal; later queries retry.
    match feed.get_snapshot().await {
        Ok(snapshot) => tracing::info!(episode_count = snapshot.len(), "episode catalog loaded"),
        Err(err) => tracing::warn!(error = %err, "initial feed fetch failed, will retry on first query"),
    }

    let handler = handler::McpPodcastServer::new(feed, search_router, semantic);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}

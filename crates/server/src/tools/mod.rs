//! Tool implementations for the podcast search MCP server.
//!
//! Each tool renders a response envelope as JSON text content. Error
//! envelopes are still successful tool calls; the envelope's `status`
//! field carries the outcome.

pub mod get_episode_by_id;
pub mod search_by_date_range;
pub mod search_by_guest;
pub mod search_episodes;
pub mod semantic_search;

use rmcp::model::{CallToolResult, Content};

use podsearch_core::search::Envelope;

/// Render an envelope as the tool call result.
pub(crate) fn envelope_result(envelope: &Envelope) -> CallToolResult {
    CallToolResult::success(vec![Content::text(serde_json::to_string_pretty(envelope).unwrap_or_default())])
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Shared fixtures for tool tests.

    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use podsearch_core::Error;
    use podsearch_core::feed::{FeedCache, FeedSource, RetryPolicy};
    use podsearch_core::model::{Episode, Guest};
    use rmcp::model::CallToolResult;

    pub struct StaticSource(pub Vec<Episode>);

    #[async_trait]
    impl FeedSource for StaticSource {
        async fn fetch_episodes(&self) -> Result<Vec<Episode>, Error> {
            Ok(self.0.clone())
        }
    }

    pub struct FailingSource;

    #[async_trait]
    impl FeedSource for FailingSource {
        async fn fetch_episodes(&self) -> Result<Vec<Episode>, Error> {
            Err(Error::FeedUnavailable("connection refused".to_string()))
        }
    }

    pub fn episode(id: u32, date: &str, guests: Vec<&str>) -> Episode {
        Episode {
            id,
            title: format!("Episode {id}"),
            description: String::new(),
            publication_date: NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(7, 0, 0)
                .unwrap()
                .and_utc(),
            duration: "00:40:00".to_string(),
            url: String::new(),
            file_size: 0,
            guests: guests
                .into_iter()
                .map(|name| Guest { name: name.to_string(), title: None, profile_url: None })
                .collect(),
            links: vec![],
        }
    }

    pub fn feed_cache(episodes: Vec<Episode>) -> Arc<FeedCache> {
        Arc::new(FeedCache::new(
            Arc::new(StaticSource(episodes)),
            Duration::from_secs(3600),
            RetryPolicy::immediate(),
        ))
    }

    pub fn failing_feed_cache() -> Arc<FeedCache> {
        Arc::new(FeedCache::new(Arc::new(FailingSource), Duration::from_secs(3600), RetryPolicy::immediate()))
    }

    /// Parse the envelope JSON out of a tool call result.
    pub fn envelope_json(result: &CallToolResult) -> serde_json::Value {
        let content = result.content.first().expect("tool result has content");
        let text = content.as_text().expect("tool result is text").text.as_str();
        serde_json::from_str(text).expect("tool result is JSON")
    }
}

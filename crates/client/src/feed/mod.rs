//! Podcast feed client: fetches the RSS document and parses it into
//! episode records.

pub mod links;
pub mod parser;

pub use links::harvest_links;
pub use parser::{ParsedFeed, parse_feed};

use async_trait::async_trait;

use podsearch_core::feed::FeedSource;
use podsearch_core::model::Episode;
use podsearch_core::Error;

use crate::fetch::{FetchClient, FetchConfig};

/// Fetch-and-parse source for the episode catalog.
pub struct FeedClient {
    fetch: FetchClient,
    feed_url: String,
}

impl FeedClient {
    pub fn new(feed_url: impl Into<String>, config: FetchConfig) -> Result<Self, Error> {
        Ok(Self { fetch: FetchClient::new(config)?, feed_url: feed_url.into() })
    }
}

/// Feeds in the wild are served as `application/rss+xml`, `text/xml`, or
/// plain `application/xml`; anything else gets a warning before parsing.
fn is_xml_media_type(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    essence.ends_with("xml")
}

#[async_trait]
impl FeedSource for FeedClient {
    async fn fetch_episodes(&self) -> Result<Vec<Episode>, Error> {
        let response = self.fetch.fetch(&self.feed_url).await?;

        if let Some(content_type) = response.content_type.as_deref()
            && !is_xml_media_type(content_type)
        {
            tracing::warn!(content_type, "feed served with a non-XML content type");
        }

        let parsed = parse_feed(&response.bytes)?;

        tracing::info!(
            episode_count = parsed.episodes.len(),
            skipped = parsed.skipped,
            fetch_ms = response.fetch_ms,
            "parsed podcast feed"
        );

        Ok(parsed.episodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_media_types_recognized() {
        assert!(is_xml_media_type("application/rss+xml"));
        assert!(is_xml_media_type("text/xml; charset=utf-8"));
        assert!(is_xml_media_type("application/xml"));
        assert!(!is_xml_media_type("text/html"));
        assert!(!is_xml_media_type("application/json"));
    }
}

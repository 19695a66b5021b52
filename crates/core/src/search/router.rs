//! Query routing: classify, dispatch, and shape results into the uniform
//! response envelope.
//!
//! The router is the single entry point for free-text search. It never
//! returns a raw fault; every outcome, including errors from any layer
//! below, becomes an [`Envelope`].

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::feed::FeedCache;
use crate::model::{Episode, SemanticMatch};
use crate::search::classify::{self, QueryType};
use crate::search::semantic::SemanticSearchCache;

/// A single search result: either a full episode record or a semantic
/// match.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum SearchHit {
    Episode(Episode),
    Semantic(SemanticMatch),
}

/// Uniform response envelope returned by every search operation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Envelope {
    Success {
        count: usize,
        results: Vec<SearchHit>,
        search_type: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    Error {
        error_type: String,
        message: String,
        suggested_action: String,
    },
}

impl Envelope {
    pub fn success(results: Vec<SearchHit>, search_type: QueryType, message: Option<String>) -> Self {
        Envelope::Success { count: results.len(), results, search_type: search_type.as_str().to_string(), message }
    }

    pub fn episodes(episodes: Vec<Episode>, search_type: QueryType, message: Option<String>) -> Self {
        Envelope::success(episodes.into_iter().map(SearchHit::Episode).collect(), search_type, message)
    }

    pub fn matches(matches: Vec<SemanticMatch>, message: Option<String>) -> Self {
        Envelope::success(matches.into_iter().map(SearchHit::Semantic).collect(), QueryType::Semantic, message)
    }

    /// Error envelope with a call-site-specific suggested action. The kind
    /// and message come from the fault itself so envelope kinds can never
    /// drift from [`Error::kind`].
    pub fn failure(err: &Error, suggested_action: impl Into<String>) -> Self {
        Envelope::Error {
            error_type: err.kind().to_string(),
            message: err.message(),
            suggested_action: suggested_action.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }
}

impl From<&Error> for Envelope {
    fn from(err: &Error) -> Self {
        Envelope::failure(err, err.suggested_action())
    }
}

/// Composes the classifier, the feed cache, and the semantic cache into one
/// uniform entry point.
pub struct SearchRouter {
    feed: Arc<FeedCache>,
    semantic: Option<Arc<SemanticSearchCache>>,
}

impl SearchRouter {
    pub fn new(feed: Arc<FeedCache>, semantic: Option<Arc<SemanticSearchCache>>) -> Self {
        Self { feed, semantic }
    }

    /// Classify the query (or honor the caller's hint verbatim) and
    /// dispatch to the matching search strategy.
    pub async fn route(&self, query: &str, hint: Option<&str>) -> Envelope {
        let query_type = match hint {
            Some(h) => QueryType::from_hint(h),
            None => classify::classify(query),
        };

        tracing::info!(query, search_type = query_type.as_str(), hinted = hint.is_some(), "routing search query");

        match query_type {
            QueryType::EpisodeId => self.episode_id_search(query).await,
            QueryType::DateRange => self.date_range_search(query).await,
            QueryType::GuestName => self.guest_search(query).await,
            QueryType::Semantic => self.semantic_search(query).await,
        }
    }

    async fn episode_id_search(&self, query: &str) -> Envelope {
        let Some(id) = classify::extract_episode_id(query) else {
            return Envelope::failure(
                &Error::Validation("Could not extract an episode id from the query".to_string()),
                "Use a format like 'episode 341' or '#341'",
            );
        };

        match self.feed.find_by_id(i64::from(id)).await {
            Ok(Some(episode)) => Envelope::episodes(vec![episode], QueryType::EpisodeId, None),
            Ok(None) => Envelope::from(&Error::NotFound(format!("Episode {id} not found"))),
            Err(err) => Envelope::from(&err),
        }
    }

    async fn date_range_search(&self, query: &str) -> Envelope {
        let (start, end) = match classify::extract_date_range(query) {
            Ok(range) => range,
            Err(err) => return Envelope::from(&err),
        };

        // Router-level ordering validation; the cache itself treats an
        // inverted range as a defined empty result.
        if start > end {
            return Envelope::failure(
                &Error::Validation("Start date must be before or equal to end date".to_string()),
                "Swap the dates or provide a valid range",
            );
        }

        match self.feed.find_by_date_range(start, end).await {
            Ok(episodes) => {
                let message = format!("Found {} episode(s) between {start} and {end}", episodes.len());
                Envelope::episodes(episodes, QueryType::DateRange, Some(message))
            }
            Err(err) => Envelope::from(&err),
        }
    }

    async fn guest_search(&self, query: &str) -> Envelope {
        // No indicator word means guest mode was forced via a hint; the
        // entire text is the name then.
        let name = classify::extract_guest_name(query).unwrap_or_else(|| query.trim().to_string());

        match self.feed.find_by_guest(&name).await {
            Ok(episodes) => {
                let message = if episodes.is_empty() {
                    format!("No episodes found featuring '{name}'")
                } else {
                    format!("Found {} episode(s) featuring '{name}'", episodes.len())
                };
                Envelope::episodes(episodes, QueryType::GuestName, Some(message))
            }
            Err(err) => Envelope::from(&err),
        }
    }

    async fn semantic_search(&self, query: &str) -> Envelope {
        let Some(semantic) = &self.semantic else {
            return Envelope::failure(
                &Error::Configuration("Semantic search is not available".to_string()),
                "Configure MCP_PODCAST_RETRIEVAL_API_URL and restart the server",
            );
        };

        match semantic.search(query).await {
            Ok(matches) => {
                let message = format!("Found {} relevant episode(s)", matches.len());
                Envelope::matches(matches, Some(message))
            }
            Err(err) => Envelope::from(&err),
        }
    }
}

//! Semantic search cache over an external relevance-retrieval backend.
//!
//! Bounds backend call volume with a short-TTL cache keyed by the literal
//! query text. Distinct casing or whitespace produces distinct entries;
//! that inefficiency is accepted in exchange for a trivially correct key.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Error;
use crate::model::SemanticMatch;

/// Continuation marker appended to truncated excerpts.
const EXCERPT_MARKER: &str = "...";

/// A raw passage returned by the retrieval backend, before episode-id
/// resolution and excerpt shaping.
#[derive(Debug, Clone)]
pub struct RetrievedPassage {
    pub text: String,
    pub score: f64,
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// External semantic-retrieval capability.
#[async_trait]
pub trait SemanticBackend: Send + Sync {
    /// Retrieve up to `max_results` passages ranked by relevance.
    ///
    /// Failures carry the backend's own code and message; they are not
    /// retried at this layer.
    async fn retrieve(&self, query: &str, max_results: usize) -> Result<Vec<RetrievedPassage>, Error>;
}

struct CacheEntry {
    matches: Vec<SemanticMatch>,
    cached_at: Instant,
}

/// Short-TTL cache wrapping a [`SemanticBackend`].
pub struct SemanticSearchCache {
    backend: Arc<dyn SemanticBackend>,
    max_results: usize,
    ttl: Duration,
    excerpt_max_chars: usize,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl SemanticSearchCache {
    pub fn new(backend: Arc<dyn SemanticBackend>, max_results: usize, ttl: Duration, excerpt_max_chars: usize) -> Self {
        Self { backend, max_results, ttl, excerpt_max_chars, entries: RwLock::new(HashMap::new()) }
    }

    /// Search, serving from cache when a fresh entry exists for the exact
    /// query string.
    ///
    /// On a miss the backend is asked for exactly `max_results` candidates;
    /// candidates without a resolvable episode id are dropped, excerpts are
    /// truncated to the character budget, and the backend's relative
    /// ordering is preserved verbatim.
    pub async fn search(&self, query: &str) -> Result<Vec<SemanticMatch>, Error> {
        if let Some(matches) = self.cached(query).await {
            tracing::debug!(query, result_count = matches.len(), "semantic cache hit");
            return Ok(matches);
        }

        tracing::info!(query, max_results = self.max_results, "querying semantic backend");
        let passages = self.backend.retrieve(query, self.max_results).await?;

        let mut matches = Vec::new();
        for passage in passages {
            if matches.len() >= self.max_results {
                break;
            }
            match self.shape_match(passage) {
                Some(m) => matches.push(m),
                None => tracing::warn!(query, "retrieval passage missing episode id, skipping"),
            }
        }

        let mut entries = self.entries.write().await;
        entries.insert(query.to_string(), CacheEntry { matches: matches.clone(), cached_at: Instant::now() });

        Ok(matches)
    }

    async fn cached(&self, query: &str) -> Option<Vec<SemanticMatch>> {
        {
            let entries = self.entries.read().await;
            let entry = entries.get(query)?;
            if entry.cached_at.elapsed() <= self.ttl {
                return Some(entry.matches.clone());
            }
        }
        // Stale entries are dropped on access.
        self.entries.write().await.remove(query);
        None
    }

    fn shape_match(&self, passage: RetrievedPassage) -> Option<SemanticMatch> {
        let episode_id = resolve_episode_id(&passage.metadata)?;

        let title = ["title", "episode_title"]
            .iter()
            .find_map(|key| passage.metadata.get(*key))
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Episode {episode_id}"));

        Some(SemanticMatch {
            episode_id,
            title,
            excerpt: truncate_excerpt(&passage.text, self.excerpt_max_chars),
            relevance_score: passage.score.clamp(0.0, 1.0),
            metadata: passage.metadata,
        })
    }
}

/// Resolve the episode id from backend metadata, checked under the known
/// key names.
fn resolve_episode_id(metadata: &serde_json::Map<String, serde_json::Value>) -> Option<u32> {
    ["episode_id", "episodeId", "id"].iter().find_map(|key| {
        let value = metadata.get(*key)?;
        match value {
            serde_json::Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    })
}

/// Truncate to the character budget, appending the continuation marker.
/// Operates on characters, not bytes, so multi-byte text never splits.
fn truncate_excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut excerpt: String = text.chars().take(max_chars).collect();
    excerpt.push_str(EXCERPT_MARKER);
    excerpt
}

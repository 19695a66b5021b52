//! Feed cache: owns the current episode snapshot and serves deterministic
//! lookups from it.
//!
//! The cache holds at most one active [`Snapshot`] behind an `RwLock`.
//! Readers clone the `Arc` and observe one consistent version for the
//! duration of their query; a refresh swaps in a wholly new snapshot and
//! never mutates one in place. When a refresh fails but a prior snapshot
//! exists, the stale snapshot is served (availability over freshness).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::{Mutex, RwLock};

use crate::error::Error;
use crate::model::{Episode, Snapshot};

/// Source of parsed episodes, typically an HTTP feed client.
///
/// A trait seam so tests can substitute in-memory sources for the network.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse the feed into episodes.
    ///
    /// Per-entry parse faults are absorbed inside the source (skip and
    /// count); an error here means the whole fetch or parse failed.
    async fn fetch_episodes(&self) -> Result<Vec<Episode>, Error>;
}

/// Retry strategy for feed refresh: fixed attempt count with exponential
/// backoff between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Production policy: 3 attempts with 1s/2s/4s backoff.
    pub fn standard() -> Self {
        Self { max_attempts: 3, base_delay: Duration::from_secs(1) }
    }

    /// Zero-delay policy for tests.
    pub fn immediate() -> Self {
        Self { max_attempts: 3, base_delay: Duration::ZERO }
    }

    /// Delay to sleep after the given zero-based attempt fails.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::standard()
    }
}

/// In-memory cache over the episode catalog with TTL staleness control.
pub struct FeedCache {
    source: Arc<dyn FeedSource>,
    ttl: Duration,
    retry: RetryPolicy,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    // Serializes refreshes so concurrent stale readers trigger one fetch;
    // readers are never blocked behind an in-flight fetch.
    refresh_lock: Mutex<()>,
}

impl FeedCache {
    pub fn new(source: Arc<dyn FeedSource>, ttl: Duration, retry: RetryPolicy) -> Self {
        Self { source, ttl, retry, snapshot: RwLock::new(None), refresh_lock: Mutex::new(()) }
    }

    /// Current snapshot, refreshing first if none exists or the active one
    /// is older than the TTL.
    ///
    /// # Errors
    ///
    /// Returns `Error::FeedUnavailable` only when every refresh attempt
    /// failed and no prior snapshot exists. A failed refresh with a prior
    /// snapshot serves the stale snapshot instead.
    pub async fn get_snapshot(&self) -> Result<Arc<Snapshot>, Error> {
        if let Some(snap) = self.current().await
            && !self.is_stale(&snap)
        {
            return Ok(snap);
        }

        let _refresh = self.refresh_lock.lock().await;

        // Another caller may have refreshed while we waited for the lock.
        if let Some(snap) = self.current().await
            && !self.is_stale(&snap)
        {
            return Ok(snap);
        }

        match self.fetch_with_retry().await {
            Ok(episodes) => {
                let snap = Arc::new(Snapshot::new(episodes, Utc::now()));
                tracing::info!(episode_count = snap.len(), "feed snapshot refreshed");
                *self.snapshot.write().await = Some(snap.clone());
                Ok(snap)
            }
            Err(err) => match self.current().await {
                Some(stale) => {
                    tracing::warn!(error = %err, "feed refresh failed, serving stale snapshot");
                    Ok(stale)
                }
                None => Err(err),
            },
        }
    }

    /// Find an episode by id in the current snapshot.
    ///
    /// Absence, including non-positive ids, is `None` rather than an error.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Episode>, Error> {
        let snap = self.get_snapshot().await?;
        Ok(snap.by_id(id).cloned())
    }

    /// Episodes published within `start..=end`, newest first.
    pub async fn find_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<Episode>, Error> {
        let snap = self.get_snapshot().await?;
        Ok(snap.by_date_range(start, end))
    }

    /// Episodes featuring a guest whose name contains `partial`
    /// (case-insensitive), newest first.
    pub async fn find_by_guest(&self, partial: &str) -> Result<Vec<Episode>, Error> {
        let snap = self.get_snapshot().await?;
        Ok(snap.by_guest(partial))
    }

    async fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot.read().await.clone()
    }

    fn is_stale(&self, snap: &Snapshot) -> bool {
        let age = Utc::now().signed_duration_since(snap.captured_at());
        age.to_std().map(|age| age > self.ttl).unwrap_or(true)
    }

    async fn fetch_with_retry(&self) -> Result<Vec<Episode>, Error> {
        let mut last_error = None;

        for attempt in 0..self.retry.max_attempts {
            tracing::info!(attempt = attempt + 1, max_attempts = self.retry.max_attempts, "fetching feed");

            match self.source.fetch_episodes().await {
                Ok(episodes) => return Ok(episodes),
                Err(err) => {
                    tracing::warn!(attempt = attempt + 1, error = %err, "feed fetch failed");
                    last_error = Some(err);

                    if attempt + 1 < self.retry.max_attempts {
                        tokio::time::sleep(self.retry.delay_for(attempt)).await;
                    }
                }
            }
        }

        let last = last_error.map(|e| e.message()).unwrap_or_else(|| "unknown error".to_string());
        Err(Error::FeedUnavailable(format!(
            "feed refresh failed after {} attempts: {last}",
            self.retry.max_attempts
        )))
    }
}

//! Core types and shared functionality for mcp-podcast.
//!
//! This crate provides:
//! - Episode model and catalog snapshots
//! - Feed cache with TTL refresh and retry
//! - Query classification and search routing
//! - Semantic search cache over a retrieval backend
//! - Unified error types and configuration structures

pub mod config;
pub mod error;
pub mod feed;
pub mod model;
pub mod search;

pub use config::AppConfig;
pub use error::Error;
pub use feed::{FeedCache, FeedSource, RetryPolicy};
pub use model::{Episode, Guest, Link, SemanticMatch, Snapshot};
pub use search::{Envelope, QueryType, SearchHit, SearchRouter, SemanticBackend, SemanticSearchCache};

//! Client code for mcp-podcast.
//!
//! This crate provides the HTTP fetch pipeline, RSS feed parsing, and the
//! semantic retrieval API client used by the server.

pub mod feed;
pub mod fetch;
pub mod retrieval;

pub use feed::{FeedClient, ParsedFeed, harvest_links, parse_feed};
pub use fetch::{FetchClient, FetchConfig, FetchResponse};
pub use retrieval::{RetrievalClient, RetrievalConfig, RetrievalError};

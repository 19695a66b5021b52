//! get_episode_by_id tool implementation.
//!
//! Direct catalog lookup by episode number. The id is validated at the
//! tool boundary; the catalog itself treats absence as a plain miss.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use podsearch_core::Error;
use podsearch_core::feed::FeedCache;
use podsearch_core::search::{Envelope, QueryType};

use crate::tools::envelope_result;

/// Input parameters for get_episode_by_id tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetEpisodeByIdParams {
    /// Episode number (e.g., 341).
    pub episode_id: i64,
}

/// Implementation of the get_episode_by_id tool.
pub async fn get_episode_by_id_impl(feed: &FeedCache, params: GetEpisodeByIdParams) -> Result<CallToolResult, McpError> {
    let id = params.episode_id;

    if id <= 0 {
        tracing::warn!(episode_id = id, "invalid episode id provided");
        let envelope = Envelope::failure(
            &Error::Validation(format!("Invalid episode ID: {id}. Must be a positive integer.")),
            "Provide a valid episode number (e.g., 341)",
        );
        return Ok(envelope_result(&envelope));
    }

    tracing::info!(episode_id = id, "get_episode_by_id tool invoked");

    let envelope = match feed.find_by_id(id).await {
        Ok(Some(episode)) => Envelope::episodes(vec![episode], QueryType::EpisodeId, None),
        Ok(None) => Envelope::from(&Error::NotFound(format!("Episode {id} not found"))),
        Err(err) => Envelope::from(&err),
    };

    Ok(envelope_result(&envelope))
}

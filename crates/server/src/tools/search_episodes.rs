//! search_episodes tool implementation.
//!
//! Unified search entry point. The query is classified and routed to the
//! matching strategy; an optional `search_type` hint overrides detection.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use podsearch_core::Error;
use podsearch_core::search::{Envelope, SearchRouter};

use crate::tools::envelope_result;

/// Input parameters for search_episodes tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchEpisodesParams {
    /// Search query: episode id ("episode 341", "#341"), date range
    /// ("2024-01-01 to 2024-06-30", "June 2024"), guest ("with Marc"),
    /// or natural language topic.
    pub query: String,

    /// Optional hint to override detection: "id", "date", "guest",
    /// or "semantic".
    #[serde(default)]
    pub search_type: Option<String>,
}

/// Implementation of the search_episodes tool.
pub async fn search_episodes_impl(
    router: &SearchRouter, params: SearchEpisodesParams,
) -> Result<CallToolResult, McpError> {
    let query = params.query.trim();

    if query.is_empty() {
        let envelope = Envelope::failure(
            &Error::Validation("Query must not be empty".to_string()),
            "Provide an episode number, date range, guest name, or topic",
        );
        return Ok(envelope_result(&envelope));
    }

    tracing::info!(query, search_type_hint = ?params.search_type, "search_episodes tool invoked");

    let envelope = router.route(query, params.search_type.as_deref()).await;

    Ok(envelope_result(&envelope))
}

//! search_by_guest tool implementation.

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use podsearch_core::Error;
use podsearch_core::feed::FeedCache;
use podsearch_core::search::{Envelope, QueryType};

use crate::tools::envelope_result;

/// Input parameters for search_by_guest tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchByGuestParams {
    /// Guest name or partial name (case-insensitive).
    pub guest_name: String,
}

/// Implementation of the search_by_guest tool.
pub async fn search_by_guest_impl(feed: &FeedCache, params: SearchByGuestParams) -> Result<CallToolResult, McpError> {
    let name = params.guest_name.trim();

    if name.is_empty() {
        let envelope = Envelope::failure(
            &Error::Validation("Guest name must not be empty".to_string()),
            "Provide a full or partial guest name (e.g., 'Marc Petit' or 'marc')",
        );
        return Ok(envelope_result(&envelope));
    }

    tracing::info!(guest_name = name, "search_by_guest tool invoked");

    let envelope = match feed.find_by_guest(name).await {
        Ok(episodes) => {
            let message = if episodes.is_empty() {
                format!("No episodes found featuring '{name}'")
            } else {
                format!("Found {} episode(s) featuring '{name}'", episodes.len())
            };
            Envelope::episodes(episodes, QueryType::GuestName, Some(message))
        }
        Err(err) => Envelope::from(&err),
    };

    Ok(envelope_result(&envelope))
}

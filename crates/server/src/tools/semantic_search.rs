//! semantic_search tool implementation.
//!
//! Natural-language topic search over the transcript index. Only available
//! when the retrieval backend is configured; otherwise every call answers
//! with a ConfigurationError envelope.

use std::sync::Arc;

use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use podsearch_core::Error;
use podsearch_core::search::{Envelope, SemanticSearchCache};

use crate::tools::envelope_result;

/// Input parameters for semantic_search tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SemanticSearchParams {
    /// Natural language query about topics or subjects.
    pub query: String,
}

/// Implementation of the semantic_search tool.
pub async fn semantic_search_impl(
    semantic: Option<&Arc<SemanticSearchCache>>, params: SemanticSearchParams,
) -> Result<CallToolResult, McpError> {
    tracing::info!(query = %params.query, "semantic_search tool invoked");

    let Some(semantic) = semantic else {
        tracing::error!("semantic search not available, retrieval API not configured");
        let envelope = Envelope::failure(
            &Error::Configuration("Semantic search is not available".to_string()),
            "Configure MCP_PODCAST_RETRIEVAL_API_URL and restart the server",
        );
        return Ok(envelope_result(&envelope));
    };

    let envelope = match semantic.search(&params.query).await {
        Ok(matches) => {
            let message = format!("Found {} relevant episode(s)", matches.len());
            Envelope::matches(matches, Some(message))
        }
        Err(err) => Envelope::from(&err),
    };

    Ok(envelope_result(&envelope))
}

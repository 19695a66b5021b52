//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.

use std::sync::Arc;

use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

use podsearch_core::feed::FeedCache;
use podsearch_core::search::{SearchRouter, SemanticSearchCache};

use crate::tools::get_episode_by_id::{GetEpisodeByIdParams, get_episode_by_id_impl};
use crate::tools::search_by_date_range::{SearchByDateRangeParams, search_by_date_range_impl};
use crate::tools::search_by_guest::{SearchByGuestParams, search_by_guest_impl};
use crate::tools::search_episodes::{SearchEpisodesParams, search_episodes_impl};
use crate::tools::semantic_search::{SemanticSearchParams, semantic_search_impl};

/// The main MCP server handler for mcp-podcast.
#[derive(Clone)]
pub struct McpPodcastServer {
    tool_router: ToolRouter<Self>,
    feed: Arc<FeedCache>,
    search_router: Arc<SearchRouter>,
    semantic: Option<Arc<SemanticSearchCache>>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpPodcastServer {
    /// Create a new server handler.
    pub fn new(
        feed: Arc<FeedCache>, search_router: Arc<SearchRouter>, semantic: Option<Arc<SemanticSearchCache>>,
    ) -> Self {
        Self { tool_router: Self::tool_router(), feed, search_router, semantic }
    }

    #[tool(description = "Get detailed information about a specific podcast episode by its number.")]
    async fn get_episode_by_id(&self, params: Parameters<GetEpisodeByIdParams>) -> Result<CallToolResult, McpError> {
        get_episode_by_id_impl(&self.feed, params.0).await
    }

    #[tool(description = "Find podcast episodes published within a date range (ISO 8601 dates, inclusive).")]
    async fn search_by_date_range(
        &self, params: Parameters<SearchByDateRangeParams>,
    ) -> Result<CallToolResult, McpError> {
        search_by_date_range_impl(&self.feed, params.0).await
    }

    #[tool(description = "Find podcast episodes featuring a guest, matched by full or partial name.")]
    async fn search_by_guest(&self, params: Parameters<SearchByGuestParams>) -> Result<CallToolResult, McpError> {
        search_by_guest_impl(&self.feed, params.0).await
    }

    #[tool(description = "Search podcast episodes by topic using natural language over the transcript index.")]
    async fn semantic_search(&self, params: Parameters<SemanticSearchParams>) -> Result<CallToolResult, McpError> {
        semantic_search_impl(self.semantic.as_ref(), params.0).await
    }

    #[tool(
        description = "Search podcast episodes by episode number, date range, guest name, or topic. The query is routed automatically; pass search_type (id, date, guest, semantic) to override."
    )]
    async fn search_episodes(&self, params: Parameters<SearchEpisodesParams>) -> Result<CallToolResult, McpError> {
        search_episodes_impl(&self.search_router, params.0).await
    }
}

impl ServerHandler for McpPodcastServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "mcp-podcast".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}

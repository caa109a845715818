//! MCP Server implementation and lifecycle management.
//!
//! This module contains the main server handler that implements the MCP
//! protocol by delegating `tools/list` and `tools/call` to the
//! [`ToolRegistry`].
//!
//! The server starts uninitialized; [`McpServer::startup`] validates the
//! configuration and marks it ready. Until then no tools are listed and
//! every call is rejected.

use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler, model::*, service::RequestContext,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::config::Config;
use super::error::Result;
use super::lifecycle::Lifecycle;
use crate::domains::system::{HostMetrics, MetricsSource};
use crate::domains::tools::ToolRegistry;
use crate::domains::youtube::{VideoProvider, YouTubeApiClient, YouTubeService};

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Startup state shared with the registry and the status tool.
    lifecycle: Arc<Lifecycle>,

    /// Registered tools.
    registry: Arc<ToolRegistry>,
}

impl McpServer {
    /// Create a server over the given provider and metrics source.
    pub fn new(
        config: Config,
        provider: Arc<dyn VideoProvider>,
        metrics: Arc<dyn MetricsSource>,
    ) -> Self {
        let config = Arc::new(config);
        let lifecycle = Arc::new(Lifecycle::new());
        let registry = ToolRegistry::standard(
            config.clone(),
            YouTubeService::new(provider),
            metrics,
            lifecycle.clone(),
        );

        Self {
            config,
            lifecycle,
            registry: Arc::new(registry),
        }
    }

    /// Create a server backed by the YouTube Data API and host metrics.
    pub fn from_config(config: Config) -> Result<Self> {
        let client = YouTubeApiClient::from_config(&config.credentials, &config.youtube)?;
        Ok(Self::new(config, Arc::new(client), Arc::new(HostMetrics)))
    }

    /// Validate the configuration and mark the server ready.
    ///
    /// On error the server stays uninitialized.
    pub fn startup(&self) -> Result<()> {
        info!("Initializing {}", self.name());
        self.config.validate()?;
        info!("Configuration validated successfully");

        for name in self.registry.tool_names() {
            debug!("Tool '{}' registered", name);
        }

        if self.lifecycle.mark_ready() {
            info!("Server initialization complete");
        }
        Ok(())
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Whether startup has completed.
    pub fn is_ready(&self) -> bool {
        self.lifecycle.is_ready()
    }

    /// Get the tool registry.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}

impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "YouTube intelligence server. Use search_videos to find videos with engagement metrics, analyze_market for topic-level competition and opportunity analysis, and system_status for server health."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    #[instrument(skip(self, _request, _context))]
    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.registry.list_tools(),
            next_cursor: None,
            meta: None,
        })
    }

    #[instrument(skip(self, request, _context), fields(tool = %request.name))]
    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, McpError> {
        Ok(self
            .registry
            .call_tool(&request.name, request.arguments)
            .await)
    }
}

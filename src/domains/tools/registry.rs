//! Tool Registry - central registration and dispatch for all tools.
//!
//! This module provides:
//! - A registry of all available tools, keyed by unique name
//! - Lifecycle gating (nothing is listed or invoked before startup completes)
//! - Dispatch that turns every outcome, including handler panics, into a
//!   tool result

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use rmcp::model::{CallToolResult, Content, JsonObject, Tool};
use serde_json::Value;
use tracing::{error, info, warn};

use super::definitions::{AnalyzeMarketTool, SearchVideosTool, SystemStatusTool};
use super::error::ToolError;
use super::formatter::format_tool_response;
use super::handlers::{ToolHandler, ToolOutcome};
use crate::core::config::Config;
use crate::core::lifecycle::Lifecycle;
use crate::domains::system::MetricsSource;
use crate::domains::youtube::YouTubeService;

/// Tool registry - manages all available tools.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn ToolHandler>>,
    lifecycle: Arc<Lifecycle>,
}

impl ToolRegistry {
    /// Create an empty registry sharing `lifecycle`.
    pub fn new(lifecycle: Arc<Lifecycle>) -> Self {
        Self {
            tools: Vec::new(),
            lifecycle,
        }
    }

    /// Registry with the three YouTube intelligence tools.
    pub fn standard(
        config: Arc<Config>,
        service: YouTubeService,
        metrics: Arc<dyn MetricsSource>,
        lifecycle: Arc<Lifecycle>,
    ) -> Self {
        Self::new(lifecycle.clone())
            .with_tool(SearchVideosTool::new(service.clone(), config.clone()))
            .with_tool(AnalyzeMarketTool::new(service, config.clone()))
            .with_tool(SystemStatusTool::new(config, lifecycle, metrics))
    }

    /// Register a tool. A tool whose name is already taken is ignored.
    pub fn with_tool(mut self, tool: impl ToolHandler + 'static) -> Self {
        if self.get(tool.name()).is_some() {
            warn!("Tool '{}' already registered, ignoring duplicate", tool.name());
            return self;
        }
        self.tools.push(Arc::new(tool));
        self
    }

    fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Get all tool names, in registration order.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Get all tools as Tool models (metadata).
    ///
    /// Empty until the server is initialized.
    pub fn list_tools(&self) -> Vec<Tool> {
        if !self.lifecycle.is_ready() {
            warn!("Tool listing requested before server initialization");
            return Vec::new();
        }
        let tools: Vec<Tool> = self.tools.iter().map(|t| t.descriptor()).collect();
        info!("Listed {} available tools", tools.len());
        tools
    }

    /// Dispatch a call to the named tool.
    ///
    /// Never panics and never fails at the protocol level: readiness, name
    /// lookup, argument validation and handler faults all come back as a
    /// [`ToolError`].
    pub async fn invoke(&self, name: &str, arguments: JsonObject) -> ToolOutcome {
        if !self.lifecycle.is_ready() {
            warn!("Tool call rejected - server not yet initialized");
            return Err(ToolError::NotReady);
        }

        let Some(tool) = self.get(name) else {
            let err = ToolError::unknown_tool(name, &self.tool_names());
            error!("{}", err);
            return Err(err);
        };

        info!("Tool call: {}", name);
        match AssertUnwindSafe(tool.call(arguments)).catch_unwind().await {
            Ok(outcome) => outcome,
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                error!("Tool '{}' panicked: {}", name, reason);
                Err(ToolError::internal(format!(
                    "tool '{}' panicked: {}",
                    name, reason
                )))
            }
        }
    }

    /// Invoke a tool and shape the outcome as an MCP tool result.
    ///
    /// Success carries the formatted text and the structured payload with
    /// `success: true`; failure carries the error text with `is_error` set.
    pub async fn call_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.invoke(name, arguments.unwrap_or_default()).await {
            Ok(data) => {
                let text = format_tool_response(name, &data);
                let structured = match serde_json::to_value(&data) {
                    Ok(Value::Object(mut object)) => {
                        object.insert("success".to_string(), Value::Bool(true));
                        Some(Value::Object(object))
                    }
                    Ok(_) => None,
                    Err(e) => {
                        warn!("Could not serialize structured result for '{}': {}", name, e);
                        None
                    }
                };
                CallToolResult {
                    content: vec![Content::text(text)],
                    structured_content: structured,
                    is_error: Some(false),
                    meta: None,
                }
            }
            Err(err) => {
                if !err.is_dispatch_error() {
                    warn!("Tool '{}' failed: {}", name, err);
                }
                CallToolResult {
                    content: vec![Content::text(err.display_text())],
                    structured_content: Some(err.payload()),
                    is_error: Some(true),
                    meta: None,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::testing::{StubMetrics, StubProvider, configured};
    use crate::domains::tools::ToolData;
    use serde_json::json;

    fn registry(provider: StubProvider) -> ToolRegistry {
        ToolRegistry::standard(
            Arc::new(configured()),
            YouTubeService::new(Arc::new(provider)),
            Arc::new(StubMetrics::ok()),
            Arc::new(Lifecycle::new()),
        )
    }

    fn ready(provider: StubProvider) -> ToolRegistry {
        let registry = registry(provider);
        registry.lifecycle.mark_ready();
        registry
    }

    fn text_of(result: &CallToolResult) -> String {
        result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    struct PanickingTool;

    #[async_trait::async_trait]
    impl ToolHandler for PanickingTool {
        fn name(&self) -> &'static str {
            "explode"
        }

        fn description(&self) -> &'static str {
            "Always panics"
        }

        fn input_schema(&self) -> Arc<JsonObject> {
            Arc::new(JsonObject::new())
        }

        async fn call(&self, _arguments: JsonObject) -> ToolOutcome {
            panic!("boom");
        }
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = registry(StubProvider::with_videos(0));
        assert_eq!(
            registry.tool_names(),
            vec!["search_videos", "analyze_market", "system_status"]
        );
    }

    #[test]
    fn test_list_tools_gated_by_lifecycle() {
        let registry = registry(StubProvider::with_videos(0));
        assert!(registry.list_tools().is_empty());

        registry.lifecycle.mark_ready();
        let tools = registry.list_tools();
        assert_eq!(tools.len(), 3);
        assert_eq!(tools[0].name, "search_videos");
        assert!(tools.iter().all(|t| t.description.is_some()));
        assert!(tools[1].input_schema.contains_key("properties"));
    }

    #[test]
    fn test_duplicate_registration_ignored() {
        let registry = ToolRegistry::new(Arc::new(Lifecycle::new()))
            .with_tool(PanickingTool)
            .with_tool(PanickingTool);
        assert_eq!(registry.tool_names(), vec!["explode"]);
    }

    #[tokio::test]
    async fn test_invoke_before_ready() {
        let registry = registry(StubProvider::with_videos(3));
        let err = registry
            .invoke("search_videos", JsonObject::new())
            .await
            .unwrap_err();
        assert_eq!(err, ToolError::NotReady);

        // Readiness is checked before the name.
        let err = registry.invoke("nope", JsonObject::new()).await.unwrap_err();
        assert_eq!(err, ToolError::NotReady);
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = ready(StubProvider::with_videos(0));
        let result = registry.call_tool("nope", None).await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text_of(&result),
            "Error: Tool 'nope' not found. Available tools: search_videos, analyze_market, system_status"
        );
    }

    #[tokio::test]
    async fn test_call_tool_success() {
        let registry = ready(StubProvider::with_videos(3));
        let args = json!({ "query": "rust", "max_results": 3 });
        let result = registry
            .call_tool("search_videos", args.as_object().cloned())
            .await;

        assert_eq!(result.is_error, Some(false));
        assert!(text_of(&result).starts_with("**YouTube Video Search Results**"));
        let structured = result.structured_content.unwrap();
        assert_eq!(structured["success"], true);
        assert_eq!(structured["videos_found"], 3);
    }

    #[tokio::test]
    async fn test_call_tool_handler_failure() {
        let registry = ready(StubProvider::with_videos(0));
        let args = json!({ "topic": "rust" });
        let result = registry
            .call_tool("analyze_market", args.as_object().cloned())
            .await;

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text_of(&result),
            "Tool execution failed: No videos found for topic: rust"
        );
        assert_eq!(result.structured_content.unwrap()["success"], false);
    }

    #[tokio::test]
    async fn test_invoke_status() {
        let registry = ready(StubProvider::with_videos(0));
        let outcome = registry.invoke("system_status", JsonObject::new()).await;
        assert!(matches!(outcome, Ok(ToolData::SystemStatus(_))));
    }

    #[tokio::test]
    async fn test_panic_becomes_internal_error() {
        let lifecycle = Arc::new(Lifecycle::new());
        lifecycle.mark_ready();
        let registry = ToolRegistry::new(lifecycle).with_tool(PanickingTool);

        let err = registry.invoke("explode", JsonObject::new()).await.unwrap_err();
        assert_eq!(err, ToolError::internal("tool 'explode' panicked: boom"));

        let result = registry.call_tool("explode", None).await;
        assert_eq!(result.is_error, Some(true));
        assert!(text_of(&result).starts_with("Tool execution failed: Internal error:"));
    }
}

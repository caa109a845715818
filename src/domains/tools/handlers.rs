//! Tool handler trait and structured outcomes.
//!
//! Each tool in `definitions/` implements [`ToolHandler`]. A handler never
//! returns a protocol error: it produces either structured data or a
//! [`ToolError`], and the registry turns both into a tool result.

use std::sync::Arc;

use rmcp::model::{JsonObject, Tool};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::definitions::{MarketAnalysisReport, SystemStatusReport, VideoSearchReport};
use super::error::ToolError;

/// Structured result of a successful tool call.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ToolData {
    VideoSearch(VideoSearchReport),
    MarketAnalysis(MarketAnalysisReport),
    SystemStatus(SystemStatusReport),
}

/// Outcome of a tool call: data or a tagged failure.
pub type ToolOutcome = Result<ToolData, ToolError>;

/// Trait implemented by every tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Unique tool name as registered in MCP.
    fn name(&self) -> &'static str;

    /// Description shown to clients.
    fn description(&self) -> &'static str;

    /// JSON schema of the tool's arguments.
    fn input_schema(&self) -> Arc<JsonObject>;

    /// Create a Tool model for this tool (metadata).
    fn descriptor(&self) -> Tool {
        Tool {
            name: self.name().into(),
            description: Some(self.description().into()),
            input_schema: self.input_schema(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Run the tool with raw JSON arguments.
    async fn call(&self, arguments: JsonObject) -> ToolOutcome;
}

/// Deserialize tool arguments into a parameter struct.
///
/// Missing required fields and wrong types become [`ToolError::Validation`].
pub fn parse_arguments<P: DeserializeOwned>(arguments: JsonObject) -> Result<P, ToolError> {
    serde_json::from_value(serde_json::Value::Object(arguments))
        .map_err(|e| ToolError::validation(e.to_string()))
}

/// Require a non-blank string argument, returning it trimmed.
pub fn require_non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, ToolError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolError::validation(format!("'{}' must not be empty", field)));
    }
    Ok(trimmed)
}

//! Tool-specific error types.

use serde_json::{Value, json};
use thiserror::Error;

/// Errors that can occur during tool dispatch or execution.
///
/// None of these escape the registry: each is rendered as a failed tool
/// result with a readable message.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ToolError {
    /// A call arrived before server startup completed.
    #[error("Server not yet initialized. Please wait for initialization to complete.")]
    NotReady,

    /// The requested tool is not registered.
    #[error("Tool '{name}' not found. Available tools: {}", available.join(", "))]
    UnknownTool { name: String, available: Vec<String> },

    /// Missing or malformed arguments.
    #[error("Invalid arguments: {0}")]
    Validation(String),

    /// The upstream provider failed.
    #[error("{message}: {error}")]
    Upstream { message: String, error: String },

    /// The call succeeded but there was nothing to report.
    #[error("{0}")]
    NoResults(String),

    /// A handler misbehaved (e.g. panicked).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create an "unknown tool" error listing the registered names.
    pub fn unknown_tool(name: impl Into<String>, available: &[&str]) -> Self {
        Self::UnknownTool {
            name: name.into(),
            available: available.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Create a "validation" error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an "upstream" error from a summary and its cause.
    pub fn upstream(message: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::Upstream {
            message: message.into(),
            error: error.to_string(),
        }
    }

    /// Create a "no results" error.
    pub fn no_results(msg: impl Into<String>) -> Self {
        Self::NoResults(msg.into())
    }

    /// Create an "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Short human message, without the underlying cause.
    pub fn message(&self) -> String {
        match self {
            Self::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Underlying cause, when there is one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Upstream { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Whether the call was rejected before reaching a handler.
    pub fn is_dispatch_error(&self) -> bool {
        matches!(self, Self::NotReady | Self::UnknownTool { .. })
    }

    /// Text shown to the client.
    pub fn display_text(&self) -> String {
        if self.is_dispatch_error() {
            format!("Error: {}", self)
        } else {
            format!("Tool execution failed: {}", self)
        }
    }

    /// Structured failure payload: `{success: false, message, error}`.
    pub fn payload(&self) -> Value {
        let mut payload = json!({
            "success": false,
            "message": self.message(),
        });
        if let Some(detail) = self.detail() {
            payload["error"] = Value::String(detail.to_string());
        }
        payload
    }
}

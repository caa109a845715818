//! Tools domain module.
//!
//! This module handles all tool-related functionality for the MCP server.
//! Tools are executable functions that can be called by MCP clients.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The `ToolHandler` trait and structured outcomes
//! - `registry.rs` - Central tool registry, lifecycle gating and dispatch
//! - `formatter.rs` - Display text for each tool's result
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` (e.g., `my_tool.rs`)
//! 2. Define params, a report type and implement `ToolHandler`
//! 3. Export in `definitions/mod.rs` and add a `ToolData` variant
//! 4. Register it in `ToolRegistry::standard`
//! 5. Add a template in `formatter.rs` (otherwise results are dumped as JSON)

pub mod definitions;
mod error;
pub mod formatter;
mod handlers;
mod registry;

pub use error::ToolError;
pub use formatter::format_tool_response;
pub use handlers::*;
pub use registry::ToolRegistry;

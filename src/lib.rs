//! YouTube Intelligence MCP Server Library
//!
//! A Model Context Protocol (MCP) server exposing YouTube video search,
//! topic market analysis and server status as tools.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, lifecycle, the MCP server
//!   handler and the stdio transport
//! - **domains**: business logic organized by bounded contexts
//!   - **youtube**: Data API client, record normalization, market analytics
//!   - **system**: host metrics
//!   - **tools**: the registry, tool definitions and response formatting
//!
//! # Example
//!
//! ```rust,no_run
//! use youtube_intel_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::from_config(config.clone())?;
//!     server.startup()?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};

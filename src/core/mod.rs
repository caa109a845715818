//! Core module containing shared infrastructure components.
//!
//! This module provides the foundational building blocks for the MCP server,
//! including error handling, configuration, server lifecycle management,
//! and the transport layer.

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod server;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};

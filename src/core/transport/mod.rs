//! Transport layer for the MCP server.
//!
//! The server speaks MCP over standard input/output. The transport handles
//! the connection lifecycle and delegates message processing to the MCP
//! server handler; stdout carries protocol frames only, logs go to stderr.

mod config;
mod error;
mod service;
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

//! Domains module containing business logic organized by bounded contexts.
//!
//! - `youtube` - provider access, normalization and market analytics
//! - `system` - host metrics
//! - `tools` - the MCP tools built on the two above

pub mod system;
pub mod tools;
pub mod youtube;

#[cfg(test)]
pub(crate) mod testing;

//! System domain: host metrics reported by the status tool.

pub mod metrics;

pub use metrics::{HostMetrics, MetricsError, MetricsSource, SystemMetrics};

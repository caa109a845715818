//! Tool definitions module.
//!
//! This module exports all available tool definitions.
//! Each tool is defined in its own file for better maintainability.

pub mod analyze_market;
pub mod common;
pub mod search_videos;
pub mod system_status;

pub use analyze_market::{AnalyzeMarketParams, AnalyzeMarketTool, MarketAnalysisReport};
pub use search_videos::{
    SearchParameters, SearchVideosParams, SearchVideosTool, VideoSearchReport, VideoSummary,
};
pub use system_status::{
    ApiStatus, ConfigurationStatus, MetricsReport, ServerStatus, SystemStatusParams,
    SystemStatusReport, SystemStatusTool,
};

//! Market analysis tool.
//!
//! Samples the most viewed videos for a topic within a timeframe and
//! reports competition, top performers and opportunity insights.

use std::sync::Arc;

use chrono::Utc;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use super::common::{MAX_SAMPLE_SIZE, days_before, default_sample_size, default_timeframe_days};
use crate::core::config::Config;
use crate::domains::tools::{
    ToolData, ToolError, ToolHandler, ToolOutcome, parse_arguments, require_non_blank,
};
use crate::domains::youtube::{
    MarketAnalysis, SearchOrder, SearchQuery, YouTubeService, analyze_market,
};

/// Parameters for market analysis.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalyzeMarketParams {
    /// Topic or niche to analyze.
    #[schemars(description = "Topic or niche to analyze")]
    pub topic: String,

    #[schemars(description = "Days of history to analyze (default: 30)")]
    #[serde(default = "default_timeframe_days")]
    pub timeframe_days: u32,

    #[schemars(description = "Number of videos to sample (default: 50, max: 100)")]
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,
}

/// Structured output for market analysis.
#[derive(Debug, Clone, Serialize)]
pub struct MarketAnalysisReport {
    pub topic: String,
    pub timeframe_days: u32,
    pub videos_analyzed: usize,
    pub analysis: MarketAnalysis,
}

/// Market analysis tool implementation.
#[derive(Clone)]
pub struct AnalyzeMarketTool {
    service: YouTubeService,
    config: Arc<Config>,
}

impl AnalyzeMarketTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "analyze_market";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Analyze the YouTube market for a topic: total and average views, engagement, top videos and channels, competition level, title sentiment and opportunity insights over a recent timeframe.";

    pub fn new(service: YouTubeService, config: Arc<Config>) -> Self {
        Self { service, config }
    }

    /// Execute the analysis with parsed parameters.
    #[instrument(skip(self, params), fields(topic = %params.topic))]
    pub async fn execute(&self, params: AnalyzeMarketParams) -> ToolOutcome {
        let topic = require_non_blank("topic", &params.topic)?;
        let youtube = &self.config.youtube;

        if params.sample_size > MAX_SAMPLE_SIZE {
            warn!(
                "sample_size {} exceeds {}, capping",
                params.sample_size, MAX_SAMPLE_SIZE
            );
        }
        let sample_size = params.sample_size.clamp(1, MAX_SAMPLE_SIZE);
        let now = Utc::now();

        let query = SearchQuery::new(topic)
            .with_max_results(sample_size)
            .with_order(SearchOrder::ViewCount)
            .with_region(youtube.default_region_code.clone())
            .with_language(youtube.default_language.clone())
            .published_after(days_before(now, params.timeframe_days, "timeframe_days")?);

        info!(
            "Analyzing market for '{}' over {} days ({} videos)",
            topic, params.timeframe_days, sample_size
        );
        let result = self.service.search_videos(&query).await.map_err(|e| {
            error!("Market analysis search failed: {}", e);
            ToolError::upstream("Failed to analyze market", e)
        })?;

        if result.videos.is_empty() {
            return Err(ToolError::no_results(format!(
                "No videos found for topic: {}",
                topic
            )));
        }

        Ok(ToolData::MarketAnalysis(MarketAnalysisReport {
            topic: topic.to_string(),
            timeframe_days: params.timeframe_days,
            videos_analyzed: result.videos.len(),
            analysis: analyze_market(topic, &result.videos, now),
        }))
    }
}

#[async_trait::async_trait]
impl ToolHandler for AnalyzeMarketTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<AnalyzeMarketParams>()
    }

    async fn call(&self, arguments: JsonObject) -> ToolOutcome {
        let params: AnalyzeMarketParams = parse_arguments(arguments)?;
        self.execute(params).await
    }
}

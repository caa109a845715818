//! YouTube video search tool.
//!
//! Searches the Data API and reports per-video statistics, engagement and
//! an inferred category.

use std::sync::Arc;

use chrono::Utc;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::common::{days_before, default_max_results, format_date, format_timestamp};
use crate::core::config::Config;
use crate::domains::tools::{
    ToolData, ToolError, ToolHandler, ToolOutcome, parse_arguments, require_non_blank,
};
use crate::domains::youtube::{
    SearchOrder, SearchQuery, SearchResult, VideoCategory, VideoRecord, YouTubeService,
    format_percent,
};

/// Parameters for video search.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct SearchVideosParams {
    /// Search query text.
    #[schemars(description = "Search query for YouTube videos")]
    pub query: String,

    /// Number of videos to return (default: 10, max: 50).
    #[schemars(description = "Maximum number of results to return (default: 10, max: 50)")]
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Result ordering.
    #[schemars(description = "Sort order: relevance, date, rating or viewCount (default: relevance)")]
    #[serde(default)]
    pub order: SearchOrder,

    /// ISO 3166-1 alpha-2 region code.
    #[schemars(description = "Region code for localized results (default: US)")]
    #[serde(default)]
    pub region_code: Option<String>,

    /// Only include videos published in the last N days.
    #[schemars(description = "Only include videos published within the last N days")]
    #[serde(default)]
    pub published_after_days: Option<u32>,
}

/// Structured output for video search.
#[derive(Debug, Clone, Serialize)]
pub struct VideoSearchReport {
    pub query: String,
    pub total_results: u64,
    pub videos_found: usize,
    pub average_engagement: String,
    pub search_parameters: SearchParameters,
    pub videos: Vec<VideoSummary>,
}

/// Effective search parameters after defaults and clamping.
#[derive(Debug, Clone, Serialize)]
pub struct SearchParameters {
    pub order: SearchOrder,
    pub region_code: String,
    pub max_results: usize,
    pub published_after_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_after: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VideoSummary {
    pub video_id: String,
    pub title: String,
    pub channel: String,
    pub views: u64,
    pub likes: u64,
    pub comments: u64,
    pub engagement_rate: String,
    pub published: String,
    pub duration: String,
    pub category: VideoCategory,
    pub url: String,
    pub description_snippet: String,
}

impl From<&VideoRecord> for VideoSummary {
    fn from(video: &VideoRecord) -> Self {
        Self {
            video_id: video.video_id.clone(),
            title: video.title.clone(),
            channel: video.channel_title.clone(),
            views: video.stats.view_count,
            likes: video.stats.like_count,
            comments: video.stats.comment_count,
            engagement_rate: format_percent(video.engagement_rate()),
            published: format_date(video.published_at),
            duration: video.duration.clone(),
            category: video.category,
            url: video.url(),
            description_snippet: video.description_snippet(),
        }
    }
}

impl VideoSearchReport {
    fn new(result: &SearchResult, search_parameters: SearchParameters) -> Self {
        Self {
            query: result.query.query.clone(),
            total_results: result.total_results,
            videos_found: result.videos.len(),
            average_engagement: format_percent(result.average_engagement()),
            search_parameters,
            videos: result.videos.iter().map(VideoSummary::from).collect(),
        }
    }
}

/// Video search tool implementation.
#[derive(Clone)]
pub struct SearchVideosTool {
    service: YouTubeService,
    config: Arc<Config>,
}

impl SearchVideosTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "search_videos";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Search YouTube videos with engagement metrics. Returns per-video views, likes, comments, engagement rate, duration, inferred category and watch URL, plus the average engagement across results.";

    pub fn new(service: YouTubeService, config: Arc<Config>) -> Self {
        Self { service, config }
    }

    /// Execute the search with parsed parameters.
    #[instrument(skip(self, params), fields(query = %params.query))]
    pub async fn execute(&self, params: SearchVideosParams) -> ToolOutcome {
        let query_text = require_non_blank("query", &params.query)?;
        let youtube = &self.config.youtube;

        let max_results = params.max_results.clamp(1, youtube.max_videos_per_search);
        let region_code = params
            .region_code
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| youtube.default_region_code.clone());

        let mut query = SearchQuery::new(query_text)
            .with_max_results(max_results)
            .with_order(params.order)
            .with_region(region_code.clone())
            .with_language(youtube.default_language.clone());

        if let Some(days) = params.published_after_days {
            query = query.published_after(days_before(Utc::now(), days, "published_after_days")?);
        }

        let search_parameters = SearchParameters {
            order: params.order,
            region_code,
            max_results,
            published_after_days: params.published_after_days,
            published_after: query.published_after.map(format_timestamp),
        };

        info!("Searching videos: {} (max {})", query_text, max_results);
        let result = self.service.search_videos(&query).await.map_err(|e| {
            error!("Video search failed: {}", e);
            ToolError::upstream("Failed to search videos", e)
        })?;

        Ok(ToolData::VideoSearch(VideoSearchReport::new(
            &result,
            search_parameters,
        )))
    }
}

#[async_trait::async_trait]
impl ToolHandler for SearchVideosTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<SearchVideosParams>()
    }

    async fn call(&self, arguments: JsonObject) -> ToolOutcome {
        let params: SearchVideosParams = parse_arguments(arguments)?;
        self.execute(params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::testing::{StubProvider, configured};
    use crate::domains::youtube::ProviderError;
    use serde_json::json;

    fn tool(provider: Arc<StubProvider>) -> SearchVideosTool {
        SearchVideosTool::new(YouTubeService::new(provider), Arc::new(configured()))
    }

    fn args(value: serde_json::Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    fn expect_report(outcome: ToolOutcome) -> VideoSearchReport {
        match outcome {
            Ok(ToolData::VideoSearch(report)) => report,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    async fn search(provider: Arc<StubProvider>, value: serde_json::Value) -> VideoSearchReport {
        expect_report(tool(provider).call(args(value)).await)
    }

    #[tokio::test]
    async fn test_search_defaults() {
        let provider = Arc::new(StubProvider::with_videos(30).total_results(1234));
        let report = search(provider.clone(), json!({ "query": "rust" })).await;

        assert_eq!(report.query, "rust");
        assert_eq!(report.videos_found, 10);
        assert_eq!(report.total_results, 1234);
        assert_eq!(report.search_parameters.max_results, 10);
        assert_eq!(report.search_parameters.region_code, "US");
        assert_eq!(report.search_parameters.order, SearchOrder::Relevance);
        assert!(report.search_parameters.published_after.is_none());

        let sent = provider.last_query().unwrap();
        assert_eq!(sent.language, "en");
        assert!(sent.published_after.is_none());
    }

    #[tokio::test]
    async fn test_search_video_projection() {
        let report = search(Arc::new(StubProvider::with_videos(1)), json!({ "query": "rust" })).await;

        let video = &report.videos[0];
        assert_eq!(video.title, "Rust tutorial vid0");
        assert_eq!(video.channel, "chan0");
        assert_eq!(video.views, 1000);
        assert_eq!(video.engagement_rate, "6.00%");
        assert_eq!(video.published, "2024-01-15");
        assert_eq!(video.duration, "PT10M");
        assert_eq!(video.category, VideoCategory::Education);
        assert_eq!(video.url, "https://youtube.com/watch?v=vid0");
        assert_eq!(report.average_engagement, "6.00%");
    }

    #[tokio::test]
    async fn test_search_clamps_max_results() {
        let provider = Arc::new(StubProvider::with_videos(200));

        let report = search(provider.clone(), json!({ "query": "rust", "max_results": 500 })).await;
        assert_eq!(report.search_parameters.max_results, 50);
        assert_eq!(report.videos_found, 50);

        let report = search(provider, json!({ "query": "rust", "max_results": 0 })).await;
        assert_eq!(report.search_parameters.max_results, 1);
        assert_eq!(report.videos_found, 1);
    }

    #[tokio::test]
    async fn test_search_published_after_and_order() {
        let provider = Arc::new(StubProvider::with_videos(5));
        let report = search(
            provider.clone(),
            json!({
                "query": "rust",
                "order": "viewCount",
                "region_code": "GB",
                "published_after_days": 7
            }),
        )
        .await;

        let sent = provider.last_query().unwrap();
        assert_eq!(sent.order, SearchOrder::ViewCount);
        assert_eq!(sent.region_code, "GB");
        let after = sent.published_after.unwrap();
        let age = Utc::now() - after;
        assert!(age.num_days() == 7 || age.num_days() == 6);

        let echoed = report.search_parameters.published_after.unwrap();
        assert!(echoed.ends_with('Z'));
        assert_eq!(report.search_parameters.published_after_days, Some(7));
    }

    #[tokio::test]
    async fn test_search_validation() {
        let provider = Arc::new(StubProvider::with_videos(5));
        let searcher = tool(provider.clone());

        let err = searcher.call(JsonObject::new()).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));

        let err = searcher.call(args(json!({ "query": "   " }))).await.unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));

        let err = searcher
            .call(args(json!({ "query": "rust", "order": "popularity" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::Validation(_)));

        assert_eq!(provider.search_calls(), 0);
    }

    #[tokio::test]
    async fn test_search_upstream_failure() {
        let provider = Arc::new(StubProvider::failing(ProviderError::http(403, "quota exceeded")));
        let err = tool(provider)
            .call(args(json!({ "query": "rust" })))
            .await
            .unwrap_err();

        assert_eq!(err.message(), "Failed to search videos");
        assert!(err.detail().unwrap().contains("quota exceeded"));
    }

    #[test]
    fn test_schema_lists_query() {
        let schema = cached_schema_for_type::<SearchVideosParams>();
        let properties = schema.get("properties").and_then(|p| p.as_object()).unwrap();
        assert!(properties.contains_key("query"));
        assert!(properties.contains_key("published_after_days"));
        let required = schema.get("required").and_then(|r| r.as_array()).unwrap();
        assert_eq!(required, &vec![json!("query")]);
    }
}

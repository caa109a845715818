//! Canonical YouTube entities.
//!
//! These are request-scoped value objects: the normalizer builds them from
//! raw provider records and nothing mutates them afterwards.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maximum number of records the provider returns per call.
pub const PROVIDER_BATCH_CAP: usize = 50;

/// Maximum length of a video description snippet, in characters.
const DESCRIPTION_SNIPPET_LEN: usize = 200;

/// Coarse video category inferred from title and description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCategory {
    Education,
    Entertainment,
    Technology,
    Gaming,
    Music,
    News,
    Sports,
    #[default]
    Other,
}

impl VideoCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Entertainment => "entertainment",
            Self::Technology => "technology",
            Self::Gaming => "gaming",
            Self::Music => "music",
            Self::News => "news",
            Self::Sports => "sports",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for VideoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Video statistics and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VideoStats {
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration_seconds: u64,
}

impl VideoStats {
    /// `(likes + comments) / views`, or 0 when the video has no views.
    pub fn engagement_rate(&self) -> f64 {
        if self.view_count == 0 {
            return 0.0;
        }
        self.like_count.saturating_add(self.comment_count) as f64 / self.view_count as f64
    }
}

/// A normalized video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    /// Duration as reported by the provider (ISO-8601, e.g. `PT15M30S`).
    pub duration: String,
    pub category: VideoCategory,
    pub stats: VideoStats,
    pub tags: Vec<String>,
    pub thumbnail_url: Option<String>,
}

impl VideoRecord {
    pub fn engagement_rate(&self) -> f64 {
        self.stats.engagement_rate()
    }

    /// Canonical watch URL.
    pub fn url(&self) -> String {
        format!("https://youtube.com/watch?v={}", self.video_id)
    }

    /// The first 200 characters of the description, with `...` appended
    /// when the description was cut.
    pub fn description_snippet(&self) -> String {
        let mut chars = self.description.chars();
        let snippet: String = chars.by_ref().take(DESCRIPTION_SNIPPET_LEN).collect();
        if chars.next().is_some() {
            format!("{}...", snippet)
        } else {
            snippet
        }
    }
}

/// A normalized channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelRecord {
    pub channel_id: String,
    pub title: String,
    pub description: String,
    pub subscriber_count: u64,
    pub video_count: u64,
    pub view_count: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    /// Reserved for channel scoring; never populated yet.
    pub authority_score: Option<f64>,
    /// Reserved for channel scoring; never populated yet.
    pub consistency_score: Option<f64>,
}

/// Result ordering accepted by the provider's search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub enum SearchOrder {
    #[default]
    Relevance,
    Date,
    Rating,
    ViewCount,
}

impl SearchOrder {
    /// Wire value for the `order` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Date => "date",
            Self::Rating => "rating",
            Self::ViewCount => "viewCount",
        }
    }
}

/// Search request sent to the provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchQuery {
    pub query: String,
    /// Total number of videos wanted. The service pages through the
    /// provider in batches of at most [`PROVIDER_BATCH_CAP`].
    pub max_results: usize,
    pub region_code: String,
    pub language: String,
    pub published_after: Option<DateTime<Utc>>,
    pub published_before: Option<DateTime<Utc>>,
    pub order: SearchOrder,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: 25,
            region_code: "US".to_string(),
            language: "en".to_string(),
            published_after: None,
            published_before: None,
            order: SearchOrder::Relevance,
        }
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_order(mut self, order: SearchOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_region(mut self, region_code: impl Into<String>) -> Self {
        self.region_code = region_code.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn published_after(mut self, instant: DateTime<Utc>) -> Self {
        self.published_after = Some(instant);
        self
    }
}

/// Videos returned for a [`SearchQuery`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub query: SearchQuery,
    pub videos: Vec<VideoRecord>,
    /// Total reported by the provider; may exceed `videos.len()`.
    pub total_results: u64,
    pub search_time: DateTime<Utc>,
}

impl SearchResult {
    /// Mean engagement rate over the returned videos, 0 when empty.
    pub fn average_engagement(&self) -> f64 {
        if self.videos.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.videos.iter().map(VideoRecord::engagement_rate).sum();
        sum / self.videos.len() as f64
    }
}

/// Format a ratio as a percentage with two decimals (`0.06` -> `6.00%`).
pub fn format_percent(ratio: f64) -> String {
    format!("{:.2}%", ratio * 100.0)
}

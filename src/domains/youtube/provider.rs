//! Fetcher seam between the tools and the YouTube Data API.

use async_trait::async_trait;
use serde_json::Value;

use super::error::ProviderError;
use super::models::SearchQuery;

/// One page of `search.list` results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    pub video_ids: Vec<String>,
    /// Total result count reported by the provider for the whole query.
    pub total_results: u64,
    pub next_page_token: Option<String>,
}

/// Raw access to the video provider.
///
/// Implementations return raw JSON items; normalization happens in
/// [`super::normalizer`]. No call retries on failure.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Fetch one page of video ids matching `query`.
    async fn search_page(
        &self,
        query: &SearchQuery,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchPage, ProviderError>;

    /// Fetch full details for up to [`super::models::PROVIDER_BATCH_CAP`] ids.
    async fn fetch_video_details(&self, ids: &[String]) -> Result<Vec<Value>, ProviderError>;

    /// Fetch a channel, `None` when the provider does not know it.
    async fn get_channel_info(&self, channel_id: &str) -> Result<Option<Value>, ProviderError>;

    /// Fetch the most popular videos for a region.
    async fn get_trending_videos(
        &self,
        region_code: &str,
        max_results: usize,
    ) -> Result<Vec<Value>, ProviderError>;
}

//! YouTube service: pagination and normalization on top of a [`VideoProvider`].

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::error::ProviderError;
use super::models::{ChannelRecord, PROVIDER_BATCH_CAP, SearchQuery, SearchResult, VideoRecord};
use super::normalizer::{normalize_channel, normalize_videos};
use super::provider::VideoProvider;

/// High-level video and channel operations used by the tools.
#[derive(Clone)]
pub struct YouTubeService {
    provider: Arc<dyn VideoProvider>,
}

impl YouTubeService {
    pub fn new(provider: Arc<dyn VideoProvider>) -> Self {
        Self { provider }
    }

    /// Search for videos.
    ///
    /// Pages through `search.list` until `query.max_results` ids are
    /// collected or the provider runs out of pages, then fetches details in
    /// batches of at most [`PROVIDER_BATCH_CAP`] ids.
    pub async fn search_videos(&self, query: &SearchQuery) -> Result<SearchResult, ProviderError> {
        info!("Searching videos for query: {}", query.query);

        let wanted = query.max_results;
        let mut ids: Vec<String> = Vec::with_capacity(wanted);
        let mut seen = HashSet::new();
        let mut total_results = 0;
        let mut page_token: Option<String> = None;

        while ids.len() < wanted {
            let page_size = (wanted - ids.len()).min(PROVIDER_BATCH_CAP);
            let page = self
                .provider
                .search_page(query, page_size, page_token.as_deref())
                .await?;

            if page_token.is_none() {
                total_results = page.total_results;
            }
            if page.video_ids.is_empty() {
                break;
            }

            for id in page.video_ids {
                if ids.len() == wanted {
                    break;
                }
                if seen.insert(id.clone()) {
                    ids.push(id);
                }
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        let mut videos = Vec::with_capacity(ids.len());
        for batch in ids.chunks(PROVIDER_BATCH_CAP) {
            debug!("Fetching details for {} videos", batch.len());
            let raws = self.provider.fetch_video_details(batch).await?;
            videos.extend(normalize_videos(&raws));
        }

        info!(
            "Found {} videos for query: {} ({} reported)",
            videos.len(),
            query.query,
            total_results
        );

        Ok(SearchResult {
            query: query.clone(),
            videos,
            total_results,
            search_time: Utc::now(),
        })
    }

    /// Look up a channel. Returns `None` when it is unknown or unparsable.
    pub async fn get_channel_info(
        &self,
        channel_id: &str,
    ) -> Result<Option<ChannelRecord>, ProviderError> {
        let Some(raw) = self.provider.get_channel_info(channel_id).await? else {
            return Ok(None);
        };

        match normalize_channel(&raw) {
            Ok(channel) => Ok(Some(channel)),
            Err(e) => {
                warn!(channel_id = %channel_id, "Skipping channel record: {}", e);
                Ok(None)
            }
        }
    }

    /// Most popular videos for a region, at most [`PROVIDER_BATCH_CAP`].
    pub async fn get_trending_videos(
        &self,
        region_code: &str,
        max_results: usize,
    ) -> Result<Vec<VideoRecord>, ProviderError> {
        let raws = self
            .provider
            .get_trending_videos(region_code, max_results.min(PROVIDER_BATCH_CAP))
            .await?;
        Ok(normalize_videos(&raws))
    }
}

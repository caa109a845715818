//! Test fixtures shared across domains: sample records, a scripted video
//! provider and a fixed metrics source.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};

use crate::core::config::Config;
use crate::domains::system::{MetricsError, MetricsSource, SystemMetrics};
use crate::domains::youtube::{
    ProviderError, SearchPage, SearchQuery, VideoCategory, VideoProvider, VideoRecord, VideoStats,
};

/// A normalized ten-minute video with no comments or tags.
pub(crate) fn sample_video(id: &str, channel: &str, views: u64, likes: u64) -> VideoRecord {
    VideoRecord {
        video_id: id.to_string(),
        title: format!("Video {id}"),
        description: String::new(),
        channel_id: channel.to_string(),
        channel_title: channel.to_string(),
        published_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
        duration: "PT10M".to_string(),
        category: VideoCategory::Other,
        stats: VideoStats {
            view_count: views,
            like_count: likes,
            comment_count: 0,
            duration_seconds: 600,
        },
        tags: vec![],
        thumbnail_url: None,
    }
}

/// A raw `videos.list` item as the Data API returns it (counts as strings).
#[allow(clippy::too_many_arguments)]
pub(crate) fn raw_video(
    id: &str,
    title: &str,
    channel_id: &str,
    channel_title: &str,
    duration: &str,
    views: u64,
    likes: u64,
    comments: u64,
) -> Value {
    json!({
        "kind": "youtube#video",
        "id": id,
        "snippet": {
            "publishedAt": "2024-01-15T10:30:00Z",
            "channelId": channel_id,
            "title": title,
            "description": "",
            "channelTitle": channel_title,
            "tags": ["rust"],
            "thumbnails": {
                "high": { "url": format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg") }
            }
        },
        "contentDetails": { "duration": duration },
        "statistics": {
            "viewCount": views.to_string(),
            "likeCount": likes.to_string(),
            "commentCount": comments.to_string()
        }
    })
}

/// Configuration with a YouTube key set.
pub(crate) fn configured() -> Config {
    let mut config = Config::default();
    config.credentials.youtube_api_key = Some("test-key".to_string());
    config
}

/// Scripted [`VideoProvider`] serving `vid0..vidN`.
///
/// Page tokens are the index of the next id. Video `vidI` belongs to
/// channel `chan{I % 4}` and has `1000 * (I + 1)` views.
pub(crate) struct StubProvider {
    videos: usize,
    reported_total: Option<u64>,
    page_size: usize,
    corrupt: HashSet<String>,
    channel: Option<Value>,
    failure: Mutex<Option<ProviderError>>,
    search_calls: AtomicUsize,
    detail_batches: Mutex<Vec<usize>>,
    last_query: Mutex<Option<SearchQuery>>,
}

impl StubProvider {
    pub(crate) fn with_videos(videos: usize) -> Self {
        Self {
            videos,
            reported_total: None,
            page_size: 50,
            corrupt: HashSet::new(),
            channel: None,
            failure: Mutex::new(None),
            search_calls: AtomicUsize::new(0),
            detail_batches: Mutex::new(Vec::new()),
            last_query: Mutex::new(None),
        }
    }

    /// Every call fails with `error` (the first call gets it verbatim).
    pub(crate) fn failing(error: ProviderError) -> Self {
        let stub = Self::with_videos(0);
        *stub.failure.lock().unwrap() = Some(error);
        stub
    }

    pub(crate) fn total_results(mut self, total: u64) -> Self {
        self.reported_total = Some(total);
        self
    }

    pub(crate) fn page_size(mut self, size: usize) -> Self {
        self.page_size = size;
        self
    }

    /// Serve `id` without a snippet so it fails normalization.
    pub(crate) fn corrupt(mut self, id: &str) -> Self {
        self.corrupt.insert(id.to_string());
        self
    }

    pub(crate) fn channel(mut self, raw: Value) -> Self {
        self.channel = Some(raw);
        self
    }

    pub(crate) fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn detail_batches(&self) -> Vec<usize> {
        self.detail_batches.lock().unwrap().clone()
    }

    pub(crate) fn last_query(&self) -> Option<SearchQuery> {
        self.last_query.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<(), ProviderError> {
        let mut failure = self.failure.lock().unwrap();
        if let Some(error) = failure.take() {
            *failure = Some(ProviderError::decode(error.to_string()));
            return Err(error);
        }
        Ok(())
    }

    fn raw(&self, index: usize) -> Value {
        let id = format!("vid{index}");
        if self.corrupt.contains(&id) {
            return json!({ "id": id });
        }
        let channel = format!("chan{}", index % 4);
        raw_video(
            &id,
            &format!("Rust tutorial {id}"),
            &channel,
            &channel,
            "PT10M",
            1000 * (index as u64 + 1),
            50,
            10,
        )
    }
}

#[async_trait]
impl VideoProvider for StubProvider {
    async fn search_page(
        &self,
        query: &SearchQuery,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchPage, ProviderError> {
        self.check_failure()?;
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());

        let start: usize = page_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        let end = (start + page_size.min(self.page_size)).min(self.videos);
        Ok(SearchPage {
            video_ids: (start..end).map(|i| format!("vid{i}")).collect(),
            total_results: self.reported_total.unwrap_or(self.videos as u64),
            next_page_token: (end < self.videos).then(|| end.to_string()),
        })
    }

    async fn fetch_video_details(&self, ids: &[String]) -> Result<Vec<Value>, ProviderError> {
        self.check_failure()?;
        self.detail_batches.lock().unwrap().push(ids.len());
        Ok(ids
            .iter()
            .map(|id| self.raw(id.trim_start_matches("vid").parse().unwrap()))
            .collect())
    }

    async fn get_channel_info(&self, channel_id: &str) -> Result<Option<Value>, ProviderError> {
        self.check_failure()?;
        Ok(self
            .channel
            .as_ref()
            .filter(|c| c["id"] == channel_id)
            .cloned())
    }

    async fn get_trending_videos(
        &self,
        _region_code: &str,
        max_results: usize,
    ) -> Result<Vec<Value>, ProviderError> {
        self.check_failure()?;
        Ok((0..max_results.min(self.videos)).map(|i| self.raw(i)).collect())
    }
}

/// Fixed host metrics, or a collection fault.
pub(crate) struct StubMetrics {
    fail: bool,
    panic: bool,
}

impl StubMetrics {
    pub(crate) const BOOT_TIME: u64 = 1_700_000_000;

    pub(crate) fn ok() -> Self {
        Self {
            fail: false,
            panic: false,
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            panic: false,
        }
    }

    pub(crate) fn panicking() -> Self {
        Self {
            fail: false,
            panic: true,
        }
    }
}

#[async_trait]
impl MetricsSource for StubMetrics {
    async fn collect(&self) -> Result<SystemMetrics, MetricsError> {
        if self.panic {
            panic!("sensor driver crashed");
        }
        if self.fail {
            return Err(MetricsError::Collection("sensor offline".to_string()));
        }
        Ok(SystemMetrics {
            cpu_percent: 12.5,
            memory_percent: 40.0,
            disk_usage_percent: 55.5,
            process_count: 120,
            network_connections: Some(8),
        })
    }

    fn boot_time(&self) -> u64 {
        Self::BOOT_TIME
    }
}

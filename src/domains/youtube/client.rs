//! YouTube Data API v3 client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use super::error::ProviderError;
use super::models::{PROVIDER_BATCH_CAP, SearchQuery};
use super::provider::{SearchPage, VideoProvider};
use crate::core::config::{CredentialsConfig, YouTubeConfig};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    #[serde(default)]
    page_info: PageInfo,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    total_results: u64,
}

#[derive(Debug, Deserialize)]
struct ItemsResponse {
    #[serde(default)]
    items: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for the YouTube Data API.
pub struct YouTubeApiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl YouTubeApiClient {
    /// Public API endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://www.googleapis.com/youtube/v3";

    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ProviderError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from the server configuration.
    pub fn from_config(
        credentials: &CredentialsConfig,
        youtube: &YouTubeConfig,
    ) -> Result<Self, ProviderError> {
        let api_key = credentials
            .youtube_api_key
            .as_deref()
            .ok_or(ProviderError::MissingApiKey)?;
        Self::new(
            api_key,
            youtube.api_base_url.clone(),
            Duration::from_secs(youtube.request_timeout_secs),
        )
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {} ({} params)", url, params.len());

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("unknown error").to_string());
            return Err(ProviderError::http(status.as_u16(), message));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::decode(e.to_string()))
    }
}

#[async_trait]
impl VideoProvider for YouTubeApiClient {
    #[instrument(skip(self, query), fields(query = %query.query))]
    async fn search_page(
        &self,
        query: &SearchQuery,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchPage, ProviderError> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("q", query.query.clone()),
            ("type", "video".to_string()),
            ("maxResults", page_size.min(PROVIDER_BATCH_CAP).to_string()),
            ("regionCode", query.region_code.clone()),
            ("relevanceLanguage", query.language.clone()),
            ("order", query.order.as_str().to_string()),
        ];
        if let Some(after) = query.published_after {
            params.push((
                "publishedAfter",
                after.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        if let Some(before) = query.published_before {
            params.push((
                "publishedBefore",
                before.to_rfc3339_opts(SecondsFormat::Secs, true),
            ));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        let response: SearchListResponse = self.get("search", &params).await?;

        Ok(SearchPage {
            video_ids: response
                .items
                .into_iter()
                .filter_map(|item| item.id.video_id)
                .collect(),
            total_results: response.page_info.total_results,
            next_page_token: response.next_page_token,
        })
    }

    async fn fetch_video_details(&self, ids: &[String]) -> Result<Vec<Value>, ProviderError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let params = [
            ("part", "snippet,statistics,contentDetails".to_string()),
            ("id", ids.join(",")),
        ];
        let response: ItemsResponse = self.get("videos", &params).await?;
        Ok(response.items)
    }

    async fn get_channel_info(&self, channel_id: &str) -> Result<Option<Value>, ProviderError> {
        let params = [
            ("part", "snippet,statistics".to_string()),
            ("id", channel_id.to_string()),
        ];
        let response: ItemsResponse = self.get("channels", &params).await?;
        Ok(response.items.into_iter().next())
    }

    async fn get_trending_videos(
        &self,
        region_code: &str,
        max_results: usize,
    ) -> Result<Vec<Value>, ProviderError> {
        let params = [
            ("part", "snippet,statistics,contentDetails".to_string()),
            ("chart", "mostPopular".to_string()),
            ("regionCode", region_code.to_string()),
            ("maxResults", max_results.min(PROVIDER_BATCH_CAP).to_string()),
        ];
        let response: ItemsResponse = self.get("videos", &params).await?;
        Ok(response.items)
    }
}

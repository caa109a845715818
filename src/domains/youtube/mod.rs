//! YouTube domain module.
//!
//! - `provider` - the fetcher trait the tools depend on
//! - `client` - YouTube Data API v3 implementation of the provider
//! - `service` - pagination, batching and normalization on top of a provider
//! - `normalizer` - raw API items to typed records
//! - `market` / `sentiment` - aggregate analysis over a video sample

pub mod client;
mod error;
pub mod market;
pub mod models;
pub mod normalizer;
pub mod provider;
pub mod sentiment;
pub mod service;

pub use client::YouTubeApiClient;
pub use error::{NormalizeError, ProviderError};
pub use market::{CompetitionLevel, MarketAnalysis, analyze_market};
pub use models::{
    ChannelRecord, PROVIDER_BATCH_CAP, SearchOrder, SearchQuery, SearchResult, VideoCategory,
    VideoRecord, VideoStats, format_percent,
};
pub use provider::{SearchPage, VideoProvider};
pub use service::YouTubeService;

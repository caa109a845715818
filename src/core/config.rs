//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (and a `.env` file) or defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use crate::domains::youtube::{PROVIDER_BATCH_CAP, YouTubeApiClient};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,

    /// YouTube Data API and search limits.
    pub youtube: YouTubeConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Configuration for external API credentials.
///
/// Only the YouTube key is used for requests; the status tool reports
/// whether each credential is configured, never its value.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// YouTube Data API v3 key.
    pub youtube_api_key: Option<String>,

    /// Firebase project identifier.
    pub firebase_project_id: Option<String>,

    /// Anthropic API key.
    pub anthropic_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("CredentialsConfig")
            .field("youtube_api_key", &redact(&self.youtube_api_key))
            .field("firebase_project_id", &redact(&self.firebase_project_id))
            .field("anthropic_api_key", &redact(&self.anthropic_api_key))
            .finish()
    }
}

impl CredentialsConfig {
    pub fn youtube_configured(&self) -> bool {
        is_set(&self.youtube_api_key)
    }

    pub fn firebase_configured(&self) -> bool {
        is_set(&self.firebase_project_id)
    }

    pub fn claude_configured(&self) -> bool {
        is_set(&self.anthropic_api_key)
    }
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

/// YouTube Data API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// Base URL of the Data API.
    pub api_base_url: String,

    /// Upper bound for `max_results` in video searches.
    pub max_videos_per_search: usize,

    /// Region used when a search does not name one.
    pub default_region_code: String,

    /// Relevance language sent with every search.
    pub default_language: String,

    /// HTTP request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_base_url: YouTubeApiClient::DEFAULT_BASE_URL.to_string(),
            max_videos_per_search: PROVIDER_BATCH_CAP,
            default_region_code: "US".to_string(),
            default_language: "en".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "youtube-intelligence".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            youtube: YouTubeConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, `MCP_MAX_VIDEOS_PER_SEARCH`, ...). Credentials use
    /// their conventional names: `YOUTUBE_API_KEY`, `FIREBASE_PROJECT_ID`,
    /// `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        config.credentials.youtube_api_key = std::env::var("YOUTUBE_API_KEY").ok();
        config.credentials.firebase_project_id = std::env::var("FIREBASE_PROJECT_ID").ok();
        config.credentials.anthropic_api_key = std::env::var("ANTHROPIC_API_KEY").ok();

        if let Ok(url) = std::env::var("MCP_YOUTUBE_API_BASE_URL") {
            info!("Using YouTube API base URL: {}", url);
            config.youtube.api_base_url = url;
        }

        if let Ok(max) = std::env::var("MCP_MAX_VIDEOS_PER_SEARCH") {
            match max.parse() {
                Ok(max) => config.youtube.max_videos_per_search = max,
                Err(_) => warn!("Ignoring invalid MCP_MAX_VIDEOS_PER_SEARCH: {}", max),
            }
        }

        if let Ok(region) = std::env::var("MCP_DEFAULT_REGION_CODE") {
            config.youtube.default_region_code = region;
        }

        if let Ok(language) = std::env::var("MCP_DEFAULT_LANGUAGE") {
            config.youtube.default_language = language;
        }

        if let Ok(timeout) = std::env::var("MCP_HTTP_TIMEOUT_SECS") {
            match timeout.parse() {
                Ok(secs) => config.youtube.request_timeout_secs = secs,
                Err(_) => warn!("Ignoring invalid MCP_HTTP_TIMEOUT_SECS: {}", timeout),
            }
        }

        config
    }

    /// Check that the configuration can serve requests.
    ///
    /// The YouTube key is required. Missing Firebase or Anthropic settings
    /// only produce a warning since no tool calls those services.
    pub fn validate(&self) -> Result<()> {
        if !self.credentials.youtube_configured() {
            return Err(Error::config(
                "Missing required environment variable: YOUTUBE_API_KEY",
            ));
        }

        if !(1..=PROVIDER_BATCH_CAP).contains(&self.youtube.max_videos_per_search) {
            return Err(Error::config(format!(
                "max_videos_per_search must be between 1 and {}, got {}",
                PROVIDER_BATCH_CAP, self.youtube.max_videos_per_search
            )));
        }

        if !self.credentials.firebase_configured() {
            warn!("FIREBASE_PROJECT_ID not set - Firebase reported as not configured");
        }
        if !self.credentials.claude_configured() {
            warn!("ANTHROPIC_API_KEY not set - Claude API reported as not configured");
        }

        Ok(())
    }
}

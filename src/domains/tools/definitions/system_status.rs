//! Server status and health tool.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use chrono::Utc;
use futures::FutureExt;
use rmcp::handler::server::tool::cached_schema_for_type;
use rmcp::model::JsonObject;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use super::common::format_timestamp;
use crate::core::config::{Config, CredentialsConfig};
use crate::core::lifecycle::Lifecycle;
use crate::domains::system::{MetricsSource, SystemMetrics};
use crate::domains::tools::{ToolData, ToolHandler, ToolOutcome, parse_arguments};

const METRICS_UNAVAILABLE: &str = "Unable to retrieve system metrics";

/// Parameters for the status tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
pub struct SystemStatusParams {
    #[schemars(description = "Include detailed system metrics (default: false)")]
    #[serde(default)]
    pub include_detailed: bool,
}

/// Structured output for the status tool.
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatusReport {
    pub status: ServerStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerStatus {
    pub server_name: String,
    pub version: String,
    pub timestamp: String,
    pub status: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
    /// Host boot time, seconds since the Unix epoch.
    pub system_boot_time: u64,
    pub configuration: ConfigurationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_metrics: Option<MetricsReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_status: Option<ApiStatus>,
}

/// Which settings are present. Never carries credential values.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigurationStatus {
    pub youtube_api_configured: bool,
    pub firebase_configured: bool,
    pub claude_api_configured: bool,
    pub max_videos_per_search: usize,
}

/// Host metrics, or the reason they are missing.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum MetricsReport {
    Available(SystemMetrics),
    Unavailable { error: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct ApiStatus {
    pub youtube_api: &'static str,
    pub firebase: &'static str,
    pub claude_api: &'static str,
}

impl ApiStatus {
    fn from_credentials(credentials: &CredentialsConfig) -> Self {
        let label = |configured: bool| {
            if configured { "configured" } else { "not_configured" }
        };
        Self {
            youtube_api: label(credentials.youtube_configured()),
            firebase: label(credentials.firebase_configured()),
            claude_api: label(credentials.claude_configured()),
        }
    }
}

/// System status tool implementation.
#[derive(Clone)]
pub struct SystemStatusTool {
    config: Arc<Config>,
    lifecycle: Arc<Lifecycle>,
    metrics: Arc<dyn MetricsSource>,
}

impl SystemStatusTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "system_status";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Get YouTube Intelligence MCP Server system status and health metrics";

    pub fn new(
        config: Arc<Config>,
        lifecycle: Arc<Lifecycle>,
        metrics: Arc<dyn MetricsSource>,
    ) -> Self {
        Self {
            config,
            lifecycle,
            metrics,
        }
    }

    #[instrument(skip(self))]
    pub async fn execute(&self, params: SystemStatusParams) -> ToolOutcome {
        let credentials = &self.config.credentials;

        let mut status = ServerStatus {
            server_name: self.config.server.name.clone(),
            version: self.config.server.version.clone(),
            timestamp: format_timestamp(Utc::now()),
            status: "healthy".to_string(),
            uptime_seconds: self.lifecycle.uptime().as_secs(),
            system_boot_time: self.metrics.boot_time(),
            configuration: ConfigurationStatus {
                youtube_api_configured: credentials.youtube_configured(),
                firebase_configured: credentials.firebase_configured(),
                claude_api_configured: credentials.claude_configured(),
                max_videos_per_search: self.config.youtube.max_videos_per_search,
            },
            system_metrics: None,
            api_status: None,
        };

        if params.include_detailed {
            let collected = AssertUnwindSafe(self.metrics.collect())
                .catch_unwind()
                .await;
            status.system_metrics = Some(match collected {
                Ok(Ok(metrics)) => MetricsReport::Available(metrics),
                Ok(Err(e)) => {
                    warn!("Error getting system metrics: {}", e);
                    MetricsReport::Unavailable {
                        error: METRICS_UNAVAILABLE.to_string(),
                    }
                }
                Err(_) => {
                    warn!("Metrics source panicked");
                    MetricsReport::Unavailable {
                        error: METRICS_UNAVAILABLE.to_string(),
                    }
                }
            });
            status.api_status = Some(ApiStatus::from_credentials(credentials));
        }

        debug!(uptime = status.uptime_seconds, "Reporting system status");
        Ok(ToolData::SystemStatus(SystemStatusReport { status }))
    }
}

#[async_trait::async_trait]
impl ToolHandler for SystemStatusTool {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn description(&self) -> &'static str {
        Self::DESCRIPTION
    }

    fn input_schema(&self) -> Arc<JsonObject> {
        cached_schema_for_type::<SystemStatusParams>()
    }

    async fn call(&self, arguments: JsonObject) -> ToolOutcome {
        let params: SystemStatusParams = parse_arguments(arguments)?;
        self.execute(params).await
    }
}

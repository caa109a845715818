//! Human-readable rendering of tool results.
//!
//! Each tool has a text template keyed by its name. Anything else falls
//! back to a JSON dump, and a rendering failure never hides a successful
//! result.

use std::fmt::Write;

use thiserror::Error;
use tracing::{error, warn};

use super::definitions::{
    AnalyzeMarketTool, MarketAnalysisReport, MetricsReport, SearchVideosTool, SystemStatusReport,
    SystemStatusTool, VideoSearchReport,
};
use super::handlers::ToolData;

/// Videos listed in the search template.
const SEARCH_DISPLAY_LIMIT: usize = 10;
/// Entries listed per ranking in the market template.
const MARKET_DISPLAY_LIMIT: usize = 5;

#[derive(Debug, Error)]
enum FormatError {
    #[error("result does not match the '{0}' template")]
    Mismatch(String),

    #[error("failed to write response: {0}")]
    Write(#[from] std::fmt::Error),
}

/// Render a successful tool result as display text.
pub fn format_tool_response(tool_name: &str, data: &ToolData) -> String {
    match render(tool_name, data) {
        Ok(text) => text,
        Err(FormatError::Mismatch(name)) => {
            warn!("Result for '{}' does not match its template", name);
            generic_dump(tool_name, data)
        }
        Err(e) => {
            error!("Error formatting response: {}", e);
            format!(
                "Tool executed successfully but response formatting failed: {}",
                raw_dump(data)
            )
        }
    }
}

fn render(tool_name: &str, data: &ToolData) -> Result<String, FormatError> {
    match (tool_name, data) {
        (SearchVideosTool::NAME, ToolData::VideoSearch(report)) => format_video_search(report),
        (AnalyzeMarketTool::NAME, ToolData::MarketAnalysis(report)) => {
            format_market_analysis(report)
        }
        (SystemStatusTool::NAME, ToolData::SystemStatus(report)) => format_system_status(report),
        (SearchVideosTool::NAME | AnalyzeMarketTool::NAME | SystemStatusTool::NAME, _) => {
            Err(FormatError::Mismatch(tool_name.to_string()))
        }
        _ => Ok(generic_dump(tool_name, data)),
    }
}

fn generic_dump(tool_name: &str, data: &ToolData) -> String {
    format!("Results from {}:\n{}", tool_name, raw_dump(data))
}

fn raw_dump(data: &ToolData) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| format!("{:?}", data))
}

fn format_video_search(report: &VideoSearchReport) -> Result<String, FormatError> {
    let mut out = String::new();
    writeln!(out, "**YouTube Video Search Results**")?;
    writeln!(out, "Query: {}", report.query)?;
    writeln!(out, "Found: {} videos", report.videos_found)?;
    writeln!(out, "Average Engagement: {}", report.average_engagement)?;

    for (i, video) in report.videos.iter().take(SEARCH_DISPLAY_LIMIT).enumerate() {
        writeln!(out)?;
        writeln!(out, "{}. **{}**", i + 1, video.title)?;
        writeln!(out, "   Channel: {}", video.channel)?;
        writeln!(
            out,
            "   Views: {} | Likes: {} | Comments: {}",
            thousands(video.views),
            thousands(video.likes),
            thousands(video.comments)
        )?;
        writeln!(
            out,
            "   Engagement: {} | Published: {}",
            video.engagement_rate, video.published
        )?;
        writeln!(
            out,
            "   Duration: {} | Category: {}",
            video.duration, video.category
        )?;
        write!(out, "   URL: {}", video.url)?;
    }

    Ok(out.trim_end().to_string())
}

fn format_market_analysis(report: &MarketAnalysisReport) -> Result<String, FormatError> {
    let analysis = &report.analysis;
    let overview = &analysis.market_overview;

    let mut out = String::new();
    writeln!(out, "**Market Analysis Results**")?;
    writeln!(out, "Topic: {}", report.topic)?;
    writeln!(out, "Videos Analyzed: {}", report.videos_analyzed)?;
    writeln!(out, "Timeframe: {} days", report.timeframe_days)?;
    writeln!(out)?;

    writeln!(out, "**Market Overview**")?;
    writeln!(out, "• Total Views: {}", thousands(overview.total_views))?;
    writeln!(out, "• Average Views: {}", thousands(overview.average_views))?;
    writeln!(out, "• Average Engagement: {}", overview.average_engagement_rate)?;
    writeln!(out, "• Unique Creators: {}", overview.unique_creators)?;
    writeln!(out, "• Competition Level: {}", overview.competition_level)?;
    writeln!(out, "• Market Sentiment: {}", overview.market_sentiment)?;

    if !analysis.top_performing_videos.is_empty() {
        writeln!(out)?;
        writeln!(out, "**Top Performing Videos**")?;
        for (i, video) in analysis
            .top_performing_videos
            .iter()
            .take(MARKET_DISPLAY_LIMIT)
            .enumerate()
        {
            writeln!(
                out,
                "{}. {} - {} views ({})",
                i + 1,
                video.title,
                thousands(video.views),
                video.channel
            )?;
        }
    }

    if !analysis.top_channels.is_empty() {
        writeln!(out)?;
        writeln!(out, "**Top Channels**")?;
        for (i, channel) in analysis
            .top_channels
            .iter()
            .take(MARKET_DISPLAY_LIMIT)
            .enumerate()
        {
            writeln!(
                out,
                "{}. {} - {} total views ({} videos)",
                i + 1,
                channel.channel,
                thousands(channel.total_views),
                channel.video_count
            )?;
        }
    }

    if !analysis.insights.is_empty() {
        writeln!(out)?;
        writeln!(out, "**Key Insights**")?;
        for insight in &analysis.insights {
            writeln!(out, "• {}", insight)?;
        }
    }

    Ok(out.trim_end().to_string())
}

fn format_system_status(report: &SystemStatusReport) -> Result<String, FormatError> {
    let status = &report.status;
    let config = &status.configuration;
    let flag = |configured: bool| if configured { "Configured" } else { "Not Configured" };

    let mut out = String::new();
    writeln!(out, "**{} System Status**", status.server_name)?;
    writeln!(out, "Version: {}", status.version)?;
    writeln!(out, "Status: {}", status.status)?;
    writeln!(out, "Timestamp: {}", status.timestamp)?;
    writeln!(out, "Uptime: {} seconds", status.uptime_seconds)?;
    writeln!(out)?;

    writeln!(out, "**Configuration**")?;
    writeln!(out, "• YouTube API: {}", flag(config.youtube_api_configured))?;
    writeln!(out, "• Firebase: {}", flag(config.firebase_configured))?;
    writeln!(out, "• Claude API: {}", flag(config.claude_api_configured))?;
    writeln!(out, "• Max Videos Per Search: {}", config.max_videos_per_search)?;

    if let Some(MetricsReport::Available(metrics)) = &status.system_metrics {
        writeln!(out)?;
        writeln!(out, "**System Metrics**")?;
        writeln!(out, "• CPU Usage: {:.1}%", metrics.cpu_percent)?;
        writeln!(out, "• Memory Usage: {:.1}%", metrics.memory_percent)?;
        writeln!(out, "• Disk Usage: {:.1}%", metrics.disk_usage_percent)?;
        writeln!(out, "• Processes: {}", metrics.process_count)?;
        if let Some(connections) = metrics.network_connections {
            writeln!(out, "• Network Connections: {}", connections)?;
        }
    }

    Ok(out.trim_end().to_string())
}

/// Format an integer with comma thousands separators (`1234567` -> `1,234,567`).
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

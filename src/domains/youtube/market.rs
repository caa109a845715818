//! Market analysis over a sample of normalized videos.
//!
//! Everything here is plain arithmetic over the sample; the caller supplies
//! `now` so results are reproducible.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use super::models::{VideoRecord, format_percent};
use super::sentiment::average_polarity;

const TOP_VIDEOS: usize = 5;
const TOP_CHANNELS: usize = 5;
const RELATED_TOPICS: usize = 5;
const HIGH_ENGAGEMENT_RATE: f64 = 0.05;
const RECENT_WINDOW_DAYS: i64 = 7;
const RECENT_SHARE_THRESHOLD: f64 = 0.3;

/// Competition tier derived from the number of distinct channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompetitionLevel {
    Low,
    Medium,
    High,
}

impl CompetitionLevel {
    /// More than 30 channels is "High", more than 15 is "Medium".
    pub fn from_unique_channels(count: usize) -> Self {
        if count > 30 {
            Self::High
        } else if count > 15 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for CompetitionLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketOverview {
    pub total_views: u64,
    pub average_views: u64,
    pub average_engagement_rate: String,
    pub unique_creators: usize,
    pub competition_level: CompetitionLevel,
    pub market_sentiment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopVideo {
    pub title: String,
    pub views: u64,
    pub channel: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelPerformance {
    pub channel: String,
    pub total_views: u64,
    pub avg_views: u64,
    pub video_count: usize,
    pub avg_engagement: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketTrend {
    pub keyword: String,
    pub competition_level: CompetitionLevel,
    /// Share of the sample published in the last 7 days.
    pub recent_upload_share: f64,
    /// Most frequent tags across the sample.
    pub related_topics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketAnalysis {
    pub market_overview: MarketOverview,
    pub top_performing_videos: Vec<TopVideo>,
    pub top_channels: Vec<ChannelPerformance>,
    pub insights: Vec<String>,
    pub trends: Vec<MarketTrend>,
    pub summary: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Default)]
struct ChannelAggregate {
    total_views: u64,
    engagement_sum: f64,
    video_count: usize,
}

/// Analyze a sample of videos for `topic`.
pub fn analyze_market(topic: &str, videos: &[VideoRecord], now: DateTime<Utc>) -> MarketAnalysis {
    let count = videos.len();
    let total_views = videos
        .iter()
        .fold(0u64, |acc, v| acc.saturating_add(v.stats.view_count));
    let mean_views = mean(videos.iter().map(|v| v.stats.view_count as f64));
    let mean_engagement = mean(videos.iter().map(VideoRecord::engagement_rate));

    let top_channels = rank_channels(videos);
    let unique_creators = unique_channel_count(videos);
    let competition_level = CompetitionLevel::from_unique_channels(unique_creators);
    let sentiment = average_polarity(videos.iter().map(|v| v.title.as_str()));
    let recent_share = recent_upload_share(videos, now);

    let market_overview = MarketOverview {
        total_views,
        average_views: mean_views as u64,
        average_engagement_rate: format_percent(mean_engagement),
        unique_creators,
        competition_level,
        market_sentiment: format!("{:.2}", sentiment),
    };

    let trend = MarketTrend {
        keyword: topic.to_string(),
        competition_level,
        recent_upload_share: recent_share.unwrap_or(0.0),
        related_topics: related_topics(topic, videos),
    };

    let summary = format!(
        "{} videos about '{}' from {} creators: {} competition, {} average engagement, sentiment {:.2}",
        count,
        topic,
        unique_creators,
        competition_level,
        market_overview.average_engagement_rate,
        sentiment
    );

    MarketAnalysis {
        market_overview,
        top_performing_videos: top_videos(videos),
        top_channels,
        insights: generate_insights(videos, competition_level, now),
        trends: vec![trend],
        summary,
        created_at: now,
    }
}

/// Ordered, conditional insights for a sample.
pub fn generate_insights(
    videos: &[VideoRecord],
    competition_level: CompetitionLevel,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut insights = Vec::new();

    let views: Vec<f64> = videos.iter().map(|v| v.stats.view_count as f64).collect();
    if let Some(std_dev) = sample_std_dev(&views) {
        if std_dev > mean(views.iter().copied()) {
            insights.push(
                "High variance in video performance - opportunity for viral content".to_string(),
            );
        }
    }

    let engaging: Vec<&VideoRecord> = videos
        .iter()
        .filter(|v| v.engagement_rate() > HIGH_ENGAGEMENT_RATE)
        .collect();
    if !engaging.is_empty() {
        let avg_seconds = mean(engaging.iter().map(|v| v.stats.duration_seconds as f64));
        insights.push(format!(
            "High-engagement videos average {} minutes duration",
            (avg_seconds / 60.0) as u64
        ));
    }

    match competition_level {
        CompetitionLevel::Low => insights
            .push("Low competition - good opportunity to establish authority".to_string()),
        CompetitionLevel::High => insights.push(
            "High competition - focus on unique angle or underserved subtopics".to_string(),
        ),
        CompetitionLevel::Medium => {}
    }

    if let Some(share) = recent_upload_share(videos, now) {
        if share > RECENT_SHARE_THRESHOLD {
            insights.push(
                "High recent activity - trending topic with immediate opportunity".to_string(),
            );
        }
    }

    insights
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Sample (n - 1) standard deviation; `None` for fewer than two values.
fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values.iter().copied());
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

fn unique_channel_count(videos: &[VideoRecord]) -> usize {
    let mut channels: Vec<&str> = videos.iter().map(|v| v.channel_title.as_str()).collect();
    channels.sort_unstable();
    channels.dedup();
    channels.len()
}

/// Share of videos published after `now - 7 days`; `None` if the cutoff
/// cannot be represented or the sample is empty.
fn recent_upload_share(videos: &[VideoRecord], now: DateTime<Utc>) -> Option<f64> {
    if videos.is_empty() {
        return None;
    }
    let cutoff = now.checked_sub_signed(TimeDelta::days(RECENT_WINDOW_DAYS))?;
    let recent = videos.iter().filter(|v| v.published_at > cutoff).count();
    Some(recent as f64 / videos.len() as f64)
}

fn top_videos(videos: &[VideoRecord]) -> Vec<TopVideo> {
    let mut ranked: Vec<&VideoRecord> = videos.iter().collect();
    ranked.sort_by(|a, b| b.stats.view_count.cmp(&a.stats.view_count));
    ranked
        .into_iter()
        .take(TOP_VIDEOS)
        .map(|v| TopVideo {
            title: v.title.clone(),
            views: v.stats.view_count,
            channel: v.channel_title.clone(),
        })
        .collect()
}

/// Per-channel aggregates ranked by total views (ties by channel name).
fn rank_channels(videos: &[VideoRecord]) -> Vec<ChannelPerformance> {
    let mut by_channel: BTreeMap<&str, ChannelAggregate> = BTreeMap::new();
    for video in videos {
        let agg = by_channel.entry(video.channel_title.as_str()).or_default();
        agg.total_views = agg.total_views.saturating_add(video.stats.view_count);
        agg.engagement_sum += video.engagement_rate();
        agg.video_count += 1;
    }

    let mut ranked: Vec<(&str, ChannelAggregate)> = by_channel.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_views.cmp(&a.1.total_views));

    ranked
        .into_iter()
        .take(TOP_CHANNELS)
        .map(|(channel, agg)| ChannelPerformance {
            channel: channel.to_string(),
            total_views: agg.total_views,
            avg_views: agg.total_views / agg.video_count as u64,
            video_count: agg.video_count,
            avg_engagement: format_percent(agg.engagement_sum / agg.video_count as f64),
        })
        .collect()
}

/// Most frequent tags (case-insensitive), excluding the topic itself.
fn related_topics(topic: &str, videos: &[VideoRecord]) -> Vec<String> {
    let topic = topic.to_lowercase();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for tag in videos.iter().flat_map(|v| v.tags.iter()) {
        let tag = tag.trim().to_lowercase();
        if tag.is_empty() || tag == topic {
            continue;
        }
        *counts.entry(tag).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(RELATED_TOPICS)
        .map(|(tag, _)| tag)
        .collect()
}

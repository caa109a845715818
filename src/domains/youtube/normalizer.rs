//! Record normalizer.
//!
//! Maps raw YouTube Data API items (`videos.list` / `channels.list` JSON)
//! into [`VideoRecord`] and [`ChannelRecord`]. A record that cannot be
//! normalized is logged and dropped; it never aborts the batch.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::error::NormalizeError;
use super::models::{ChannelRecord, VideoCategory, VideoRecord, VideoStats};

/// ISO-8601 duration as used by the provider (`PT1H2M3S`, `P1DT5M`, ...).
static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?x)
        ^P
        (?:(\d+)W)?
        (?:(\d+)D)?
        (?:T
            (?:(\d+)H)?
            (?:(\d+)M)?
            (?:(\d+)(?:[.,]\d+)?S)?
        )?$
    ",
    )
    .expect("Invalid regex")
});

/// Keyword rules for category inference, checked in order; first match wins.
const CATEGORY_RULES: &[(VideoCategory, &[&str])] = &[
    (
        VideoCategory::Education,
        &["tutorial", "learn", "education", "course"],
    ),
    (
        VideoCategory::Technology,
        &["tech", "programming", "software", "ai"],
    ),
    (VideoCategory::Gaming, &["game", "gaming", "play"]),
    (VideoCategory::Music, &["music", "song", "album"]),
    (VideoCategory::News, &["news", "breaking", "report"]),
    (VideoCategory::Sports, &["sport", "football", "basketball"]),
];

// ============================================================================
// Raw provider shapes
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawVideo {
    id: Option<String>,
    snippet: Option<RawSnippet>,
    #[serde(default)]
    statistics: RawStatistics,
    #[serde(default)]
    content_details: RawContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChannel {
    id: Option<String>,
    snippet: Option<RawSnippet>,
    #[serde(default)]
    statistics: RawStatistics,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnippet {
    published_at: Option<String>,
    channel_id: Option<String>,
    title: Option<String>,
    #[serde(default)]
    description: String,
    channel_title: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    thumbnails: RawThumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct RawThumbnails {
    high: Option<RawThumbnail>,
}

#[derive(Debug, Deserialize)]
struct RawThumbnail {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawStatistics {
    view_count: Option<RawCount>,
    like_count: Option<RawCount>,
    comment_count: Option<RawCount>,
    subscriber_count: Option<RawCount>,
    video_count: Option<RawCount>,
}

#[derive(Debug, Default, Deserialize)]
struct RawContentDetails {
    duration: Option<String>,
}

/// The API sends counts as decimal strings; plain numbers are accepted too.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawCount {
    Number(u64),
    Text(String),
}

fn count(value: Option<&RawCount>, field: &'static str) -> Result<u64, NormalizeError> {
    match value {
        None => Ok(0),
        Some(RawCount::Number(n)) => Ok(*n),
        Some(RawCount::Text(text)) => {
            text.trim()
                .parse()
                .map_err(|_| NormalizeError::InvalidCount {
                    field,
                    value: text.clone(),
                })
        }
    }
}

// ============================================================================
// Field parsers
// ============================================================================

/// Parse an ISO-8601 duration into whole seconds.
///
/// Fractional seconds are dropped. Returns `None` for malformed input.
pub fn parse_duration_seconds(duration: &str) -> Option<u64> {
    let caps = ISO_DURATION.captures(duration.trim())?;

    const UNITS: [(usize, u64); 5] = [(1, 604_800), (2, 86_400), (3, 3_600), (4, 60), (5, 1)];

    let mut matched = false;
    let mut total: u64 = 0;
    for (group, seconds) in UNITS {
        if let Some(m) = caps.get(group) {
            matched = true;
            let value: u64 = m.as_str().parse().ok()?;
            total = total.checked_add(value.checked_mul(seconds)?)?;
        }
    }

    matched.then_some(total)
}

/// Infer a category from title and description keywords.
pub fn categorize(title: &str, description: &str) -> VideoCategory {
    let content = format!("{} {}", title, description).to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|word| content.contains(word)))
        .map(|(category, _)| *category)
        .unwrap_or_default()
}

/// Parse a provider timestamp (`2024-01-15T10:30:00Z`) into a UTC instant.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, NormalizeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| NormalizeError::InvalidTimestamp {
            value: value.to_string(),
            reason: e.to_string(),
        })
}

// ============================================================================
// Normalization
// ============================================================================

/// Normalize one raw `videos.list` item.
///
/// A malformed duration is reported as zero seconds; every other field is
/// still populated.
pub fn normalize_video(raw: &Value) -> Result<VideoRecord, NormalizeError> {
    let raw: RawVideo =
        RawVideo::deserialize(raw).map_err(|e| NormalizeError::Malformed(e.to_string()))?;

    let video_id = raw.id.ok_or(NormalizeError::MissingField("id"))?;
    let snippet = raw.snippet.ok_or(NormalizeError::MissingField("snippet"))?;
    let title = snippet.title.ok_or(NormalizeError::MissingField("title"))?;
    let channel_id = snippet
        .channel_id
        .ok_or(NormalizeError::MissingField("channelId"))?;
    let channel_title = snippet
        .channel_title
        .ok_or(NormalizeError::MissingField("channelTitle"))?;
    let published_at = parse_timestamp(
        snippet
            .published_at
            .as_deref()
            .ok_or(NormalizeError::MissingField("publishedAt"))?,
    )?;

    let duration = raw
        .content_details
        .duration
        .unwrap_or_else(|| "PT0S".to_string());
    let duration_seconds = parse_duration_seconds(&duration).unwrap_or_else(|| {
        warn!(video_id = %video_id, "Malformed duration '{}', using 0 seconds", duration);
        0
    });

    let stats = VideoStats {
        view_count: count(raw.statistics.view_count.as_ref(), "viewCount")?,
        like_count: count(raw.statistics.like_count.as_ref(), "likeCount")?,
        comment_count: count(raw.statistics.comment_count.as_ref(), "commentCount")?,
        duration_seconds,
    };

    let category = categorize(&title, &snippet.description);

    Ok(VideoRecord {
        video_id,
        title,
        description: snippet.description,
        channel_id,
        channel_title,
        published_at,
        duration,
        category,
        stats,
        tags: snippet.tags,
        thumbnail_url: snippet.thumbnails.high.map(|t| t.url),
    })
}

/// Normalize one raw `channels.list` item.
pub fn normalize_channel(raw: &Value) -> Result<ChannelRecord, NormalizeError> {
    let raw: RawChannel =
        RawChannel::deserialize(raw).map_err(|e| NormalizeError::Malformed(e.to_string()))?;

    let channel_id = raw.id.ok_or(NormalizeError::MissingField("id"))?;
    let snippet = raw.snippet.ok_or(NormalizeError::MissingField("snippet"))?;
    let title = snippet.title.ok_or(NormalizeError::MissingField("title"))?;
    let created_at = snippet
        .published_at
        .as_deref()
        .map(parse_timestamp)
        .transpose()?;

    Ok(ChannelRecord {
        channel_id,
        title,
        description: snippet.description,
        subscriber_count: count(raw.statistics.subscriber_count.as_ref(), "subscriberCount")?,
        video_count: count(raw.statistics.video_count.as_ref(), "videoCount")?,
        view_count: count(raw.statistics.view_count.as_ref(), "viewCount")?,
        created_at,
        thumbnail_url: snippet.thumbnails.high.map(|t| t.url),
        authority_score: None,
        consistency_score: None,
    })
}

/// Normalize a batch of raw video items, dropping the ones that fail.
pub fn normalize_videos(raws: &[Value]) -> Vec<VideoRecord> {
    raws.iter()
        .filter_map(|raw| match normalize_video(raw) {
            Ok(video) => Some(video),
            Err(e) => {
                let id = raw.get("id").and_then(Value::as_str).unwrap_or("<unknown>");
                warn!(video_id = %id, "Skipping video record: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::testing::raw_video;
    use serde_json::json;

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration_seconds("PT15M30S"), Some(930));
        assert_eq!(parse_duration_seconds("PT1H"), Some(3600));
        assert_eq!(parse_duration_seconds("PT0S"), Some(0));
        assert_eq!(parse_duration_seconds("P1DT2H3M4S"), Some(93_784));
        assert_eq!(parse_duration_seconds("P1W"), Some(604_800));
        assert_eq!(parse_duration_seconds("PT4.5S"), Some(4));
    }

    #[test]
    fn test_parse_duration_malformed() {
        assert_eq!(parse_duration_seconds(""), None);
        assert_eq!(parse_duration_seconds("P"), None);
        assert_eq!(parse_duration_seconds("PT"), None);
        assert_eq!(parse_duration_seconds("15:30"), None);
        assert_eq!(parse_duration_seconds("PT15X"), None);
    }

    #[test]
    fn test_categorize_first_rule_wins() {
        assert_eq!(
            categorize("Game development tutorial", ""),
            VideoCategory::Education
        );
        assert_eq!(
            categorize("Best programming setup", "we play some games"),
            VideoCategory::Technology
        );
    }

    #[test]
    fn test_categorize_uses_description_and_case() {
        assert_eq!(categorize("Highlights", "FOOTBALL recap"), VideoCategory::Sports);
        assert_eq!(categorize("New ALBUM out", ""), VideoCategory::Music);
        assert_eq!(categorize("Weekend vlog", "morning routine"), VideoCategory::Other);
    }

    #[test]
    fn test_parse_timestamp() {
        let ts = parse_timestamp("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-01-15T10:30:00+00:00");
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(NormalizeError::InvalidTimestamp { .. })
        ));
    }

    #[test]
    fn test_normalize_video() {
        let raw = raw_video("vid1", "Learn Rust", "chan1", "Rustaceans", "PT10M", 1000, 50, 10);
        let video = normalize_video(&raw).unwrap();

        assert_eq!(video.video_id, "vid1");
        assert_eq!(video.channel_title, "Rustaceans");
        assert_eq!(video.category, VideoCategory::Education);
        assert_eq!(video.stats.duration_seconds, 600);
        assert_eq!(video.stats.view_count, 1000);
        assert_eq!(video.tags, vec!["rust".to_string()]);
        assert_eq!(
            video.thumbnail_url.as_deref(),
            Some("https://i.ytimg.com/vi/vid1/hqdefault.jpg")
        );
        assert!((video.engagement_rate() - 0.06).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_video_malformed_duration_keeps_fields() {
        let raw = raw_video("vid2", "Song", "chan", "Band", "three minutes", 10, 1, 0);
        let video = normalize_video(&raw).unwrap();

        assert_eq!(video.stats.duration_seconds, 0);
        assert_eq!(video.duration, "three minutes");
        assert_eq!(video.title, "Song");
        assert_eq!(video.stats.view_count, 10);
        assert_eq!(video.category, VideoCategory::Music);
    }

    #[test]
    fn test_normalize_video_numeric_counts() {
        let raw = json!({
            "id": "n1",
            "snippet": {
                "publishedAt": "2024-03-01T00:00:00Z",
                "channelId": "c",
                "channelTitle": "C",
                "title": "t"
            },
            "statistics": { "viewCount": 1000, "likeCount": 50, "commentCount": 10 }
        });
        let video = normalize_video(&raw).unwrap();
        assert_eq!(video.stats.like_count, 50);
        assert_eq!(video.duration, "PT0S");
        assert!(video.tags.is_empty());
        assert!(video.thumbnail_url.is_none());
    }

    #[test]
    fn test_normalize_video_missing_statistics_defaults_to_zero() {
        let raw = json!({
            "id": "n2",
            "snippet": {
                "publishedAt": "2024-03-01T00:00:00Z",
                "channelId": "c",
                "channelTitle": "C",
                "title": "t"
            }
        });
        let video = normalize_video(&raw).unwrap();
        assert_eq!(video.stats, VideoStats::default());
        assert_eq!(video.engagement_rate(), 0.0);
    }

    #[test]
    fn test_normalize_video_errors() {
        let mut raw = raw_video("bad", "t", "c", "C", "PT1S", 1, 0, 0);
        raw["snippet"]["publishedAt"] = json!("not a date");
        assert!(matches!(
            normalize_video(&raw),
            Err(NormalizeError::InvalidTimestamp { .. })
        ));

        let mut raw = raw_video("bad", "t", "c", "C", "PT1S", 1, 0, 0);
        raw["statistics"]["viewCount"] = json!("lots");
        assert_eq!(
            normalize_video(&raw),
            Err(NormalizeError::InvalidCount {
                field: "viewCount",
                value: "lots".to_string()
            })
        );

        let raw = json!({ "id": "no-snippet" });
        assert_eq!(
            normalize_video(&raw),
            Err(NormalizeError::MissingField("snippet"))
        );
    }

    #[test]
    fn test_normalize_videos_skips_failures() {
        let mut broken = raw_video("broken", "t", "c", "C", "PT1S", 1, 0, 0);
        broken["snippet"]
            .as_object_mut()
            .unwrap()
            .remove("channelTitle");

        let raws = vec![
            raw_video("a", "first", "c", "C", "PT1S", 1, 0, 0),
            broken,
            raw_video("b", "second", "c", "C", "garbage", 1, 0, 0),
        ];
        let videos = normalize_videos(&raws);
        let ids: Vec<_> = videos.iter().map(|v| v.video_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_normalize_channel() {
        let raw = json!({
            "id": "UC123",
            "snippet": {
                "title": "Rust Channel",
                "description": "All about Rust",
                "publishedAt": "2015-05-15T00:00:00Z",
                "thumbnails": { "high": { "url": "https://example.com/c.jpg" } }
            },
            "statistics": {
                "subscriberCount": "1200",
                "videoCount": "85",
                "viewCount": "450000"
            }
        });
        let channel = normalize_channel(&raw).unwrap();
        assert_eq!(channel.channel_id, "UC123");
        assert_eq!(channel.subscriber_count, 1200);
        assert_eq!(channel.video_count, 85);
        assert_eq!(channel.view_count, 450_000);
        assert!(channel.created_at.is_some());
        assert!(channel.authority_score.is_none());
        assert!(channel.consistency_score.is_none());
    }
}

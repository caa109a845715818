//! Common utilities shared across the YouTube tools.
//!
//! Argument defaults, publish-window arithmetic and timestamp formatting.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};

use crate::domains::tools::ToolError;

/// Default number of videos returned by `search_videos`.
pub fn default_max_results() -> usize {
    10
}

/// Default look-back window for `analyze_market`.
pub fn default_timeframe_days() -> u32 {
    30
}

/// Default sample size for `analyze_market`.
pub fn default_sample_size() -> usize {
    50
}

/// Upper bound for the `analyze_market` sample.
pub const MAX_SAMPLE_SIZE: usize = 100;

/// The instant `days` days before `now`.
///
/// Fails with a validation error when the offset does not fit in the
/// calendar.
pub fn days_before(now: DateTime<Utc>, days: u32, field: &str) -> Result<DateTime<Utc>, ToolError> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|delta| now.checked_sub_signed(delta))
        .ok_or_else(|| ToolError::validation(format!("'{}' is out of range: {}", field, days)))
}

/// RFC 3339 with a `Z` suffix, as the Data API expects.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Calendar date (`YYYY-MM-DD`).
pub fn format_date(instant: DateTime<Utc>) -> String {
    instant.format("%Y-%m-%d").to_string()
}

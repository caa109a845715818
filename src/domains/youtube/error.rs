//! YouTube provider and normalization errors.

use thiserror::Error;

/// Errors raised while talking to the YouTube Data API.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No API key was configured.
    #[error("YouTube API key is required")]
    MissingApiKey,

    /// The API answered with a non-success status.
    #[error("YouTube API returned {status}: {message}")]
    Http { status: u16, message: String },

    /// The request could not be sent or the body could not be read.
    #[error("Request to YouTube API failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body did not have the expected shape.
    #[error("Unexpected YouTube API response: {0}")]
    Decode(String),
}

impl ProviderError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}

/// Errors raised while normalizing a single raw record.
///
/// These never abort a batch: the record is logged and dropped.
#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("invalid timestamp '{value}': {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("invalid count for '{field}': {value}")]
    InvalidCount { field: &'static str, value: String },
}

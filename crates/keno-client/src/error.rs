use chrono::NaiveDate;
use keno_core::{ConfigError, TimeError};
use thiserror::Error;

/// Errors returned by the Keno API client.
#[derive(Debug, Error)]
pub enum KenoError {
    /// Invalid jurisdiction or settings at construction.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be decoded into the expected shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A decoded draw breaks the upstream contract (missing or malformed
    /// fields that must not be defaulted).
    #[error("schema error for game {game_number}: {reason}")]
    Schema { game_number: u16, reason: String },

    #[error(transparent)]
    Time(#[from] TimeError),

    /// A history request parameter lies outside what the endpoint accepts.
    #[error("{param} = {value} is outside {min}..={max}")]
    OutOfBounds {
        param: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// A day needed more windows than the configured ceiling.
    #[error("pagination limit reached for {date}: exceeded {max_windows} windows")]
    PaginationLimit { date: NaiveDate, max_windows: u32 },

    /// The game-number search could not anchor the given date.
    #[error("could not locate the first game of {date}: {reason}")]
    LocatorExhausted { date: NaiveDate, reason: String },
}

impl KenoError {
    /// Whether the failure happened while talking to upstream.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, KenoError::Http(_) | KenoError::UnexpectedStatus { .. })
    }

    /// Whether upstream returned data in an unexpected shape.
    #[must_use]
    pub fn is_schema(&self) -> bool {
        matches!(self, KenoError::Deserialize { .. } | KenoError::Schema { .. })
    }
}

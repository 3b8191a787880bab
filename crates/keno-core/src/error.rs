use thiserror::Error;

/// Errors raised while building or validating client configuration.
///
/// These are construction-time failures; a client is never built from an
/// invalid configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The jurisdiction code is not one of the eight known codes.
    #[error("unknown jurisdiction '{0}'; expected one of ACT, NSW, QLD, VIC, WA, NT, SA, TAS")]
    UnknownJurisdiction(String),

    #[error("invalid setting {setting}: {reason}")]
    InvalidSetting {
        setting: &'static str,
        reason: String,
    },
}

/// Errors raised by the timestamp codec.
#[derive(Debug, Error)]
pub enum TimeError {
    #[error("malformed timestamp '{input}': {source}")]
    Malformed {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
}

//! URL construction for the Keno info API.
//!
//! Each state is served from its own host (`api-info-act.keno.com.au`, ...)
//! and every request repeats the jurisdiction as the first query parameter.
//! Both always use the canonical jurisdiction, so a URL never names a state
//! that upstream does not serve.

use keno_core::Jurisdiction;
use reqwest::Url;

use crate::error::KenoError;

pub const GAME_STATUS_PATH: &str = "/v2/games/kds";
pub const JACKPOTS_PATH: &str = "/v2/info/jackpots";
pub const HOT_COLD_PATH: &str = "/v2/info/hotCold";
pub const TRENDS_PATH: &str = "/v2/info/trends";
pub const HISTORY_PATH: &str = "/v2/info/history";

/// Production base URL for a jurisdiction.
///
/// # Errors
///
/// Returns [`KenoError::InvalidBaseUrl`] if the host cannot be parsed, which
/// only happens if the jurisdiction codes change.
pub fn production_base_url(jurisdiction: Jurisdiction) -> Result<Url, KenoError> {
    let raw = format!(
        "https://api-info-{}.keno.com.au/",
        jurisdiction.canonical().host_code()
    );
    Url::parse(&raw).map_err(|e| KenoError::InvalidBaseUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })
}

/// Parses a caller-supplied base URL (used to point the client at a mock
/// server in tests).
///
/// # Errors
///
/// Returns [`KenoError::InvalidBaseUrl`] if `base_url` is not an absolute URL.
pub fn parse_base_url(base_url: &str) -> Result<Url, KenoError> {
    // Normalise to exactly one trailing slash so `set_path` replaces the
    // root rather than a trailing segment.
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| KenoError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })
}

/// Builds the full request URL: `base` + `path`, then
/// `jurisdiction=<CODE>` followed by `query`, percent-encoded.
#[must_use]
pub fn resolve(base: &Url, jurisdiction: Jurisdiction, path: &str, query: &[(&str, String)]) -> Url {
    let mut url = base.clone();
    url.set_path(path);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.append_pair("jurisdiction", jurisdiction.canonical().code());
        for (k, v) in query {
            pairs.append_pair(k, v);
        }
    }
    url
}

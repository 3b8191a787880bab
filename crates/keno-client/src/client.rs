//! HTTP client for the Keno info API.
//!
//! Wraps `reqwest` with jurisdiction resolution, status checking and typed
//! response decoding. Requests are issued one at a time; nothing in this
//! crate spawns or joins concurrent requests.

use std::time::Duration;

use keno_core::{canonicalize, ClientConfig, HistoryConfig, Jurisdiction};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::endpoint;
use crate::error::KenoError;

/// Client for the Keno info API.
///
/// The jurisdiction is resolved once at construction; unsupported states are
/// redirected to the state that serves them and the redirect is logged.
/// Use [`KenoClient::new`] for production or [`KenoClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Debug)]
pub struct KenoClient {
    client: Client,
    jurisdiction: Jurisdiction,
    base_url: Url,
    pub(crate) history: HistoryConfig,
}

impl KenoClient {
    /// Creates a client with default settings for the given jurisdiction code.
    ///
    /// # Errors
    ///
    /// Returns [`KenoError::Config`] if `jurisdiction` is not one of the eight
    /// known codes, or [`KenoError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn new(jurisdiction: &str) -> Result<Self, KenoError> {
        Self::with_config(jurisdiction, ClientConfig::default())
    }

    /// Creates a production client with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`KenoError::Config`] for an unknown jurisdiction or an invalid
    /// setting, or [`KenoError::Http`] if the `reqwest::Client` cannot be
    /// constructed.
    pub fn with_config(jurisdiction: &str, config: ClientConfig) -> Result<Self, KenoError> {
        let resolved = resolve_jurisdiction(jurisdiction)?;
        let base_url = endpoint::production_base_url(resolved)?;
        Self::build(resolved, base_url, config)
    }

    /// Creates a client against a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// As [`KenoClient::with_config`], plus [`KenoError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute URL.
    pub fn with_base_url(
        jurisdiction: &str,
        config: ClientConfig,
        base_url: &str,
    ) -> Result<Self, KenoError> {
        let resolved = resolve_jurisdiction(jurisdiction)?;
        let base_url = endpoint::parse_base_url(base_url)?;
        Self::build(resolved, base_url, config)
    }

    fn build(
        jurisdiction: Jurisdiction,
        base_url: Url,
        config: ClientConfig,
    ) -> Result<Self, KenoError> {
        config.validate()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            jurisdiction,
            base_url,
            history: config.history,
        })
    }

    /// The jurisdiction every request is made under (after redirects).
    #[must_use]
    pub fn jurisdiction(&self) -> Jurisdiction {
        self.jurisdiction
    }

    pub(crate) fn url(&self, path: &str, query: &[(&str, String)]) -> Url {
        endpoint::resolve(&self.base_url, self.jurisdiction, path, query)
    }

    /// Sends a GET request, asserts a 2xx status, and decodes the body.
    ///
    /// # Errors
    ///
    /// - [`KenoError::Http`] on network failure.
    /// - [`KenoError::UnexpectedStatus`] on a non-2xx status.
    /// - [`KenoError::Deserialize`] if the body does not match `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, KenoError> {
        tracing::debug!(url = %url, "GET");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(KenoError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| KenoError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}

/// Canonicalizes the jurisdiction and logs each redirect once.
fn resolve_jurisdiction(input: &str) -> Result<Jurisdiction, KenoError> {
    let canonical = canonicalize(input)?;
    for diagnostic in &canonical.diagnostics {
        tracing::warn!(
            requested = %canonical.requested,
            resolved = %canonical.resolved,
            "{diagnostic}"
        );
    }
    Ok(canonical.resolved)
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

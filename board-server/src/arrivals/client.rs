//! Arrivals API HTTP client.
//!
//! Fetches the arrivals board for a station from
//! `GET {base_url}/trains/arrivals/{station}`.

use std::future::Future;
use std::time::Duration;

use reqwest::Url;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use tracing::debug;

use super::error::FetchError;
use super::source::ArrivalsSource;
use super::types::ArrivalsResponse;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the arrivals client.
#[derive(Debug, Clone)]
pub struct ArrivalsConfig {
    /// Base URL of the upstream API. `None` means unconfigured: every fetch
    /// fails with [`FetchError::NotConfigured`] without touching the network.
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl ArrivalsConfig {
    /// Create a config for the given base URL.
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Arrivals API client.
#[derive(Debug, Clone)]
pub struct ArrivalsClient {
    http: reqwest::Client,
    base_url: Option<String>,
}

impl ArrivalsClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ArrivalsConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Whether a base URL is present.
    pub fn is_configured(&self) -> bool {
        self.base_url.is_some()
    }

    /// Fetch the arrivals board for a station.
    pub async fn get_arrivals(&self, station: &str) -> Result<ArrivalsResponse, FetchError> {
        let base_url = self.base_url.as_deref().ok_or(FetchError::NotConfigured)?;
        let url = arrivals_url(base_url, station)?;

        debug!(%url, "fetching arrivals");

        let response = self
            .http
            .get(url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| FetchError::decode(e, &body))
    }
}

impl ArrivalsSource for ArrivalsClient {
    fn is_configured(&self) -> bool {
        ArrivalsClient::is_configured(self)
    }

    fn fetch_arrivals(
        &self,
        station: &str,
    ) -> impl Future<Output = Result<ArrivalsResponse, FetchError>> + Send {
        self.get_arrivals(station)
    }
}

/// Build `{base_url}/trains/arrivals/{station}`, percent-encoding the station.
fn arrivals_url(base_url: &str, station: &str) -> Result<Url, FetchError> {
    let invalid = |message: String| FetchError::InvalidBaseUrl {
        url: base_url.to_string(),
        message,
    };

    let mut url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| invalid("URL cannot be a base".to_string()))?;
        segments
            .pop_if_empty()
            .extend(["trains", "arrivals", station]);
    }

    Ok(url)
}

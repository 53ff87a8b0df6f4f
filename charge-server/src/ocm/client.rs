//! Open Charge Map HTTP client.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, info};

use super::error::FetchError;
use super::request::FetchRequest;
use super::types::{RawStation, decode_stations};
use super::StationSource;

/// Default base URL for the Open Charge Map API.
const DEFAULT_BASE_URL: &str = "https://api.openchargemap.io/v3";

/// Configuration for the Open Charge Map client.
///
/// Has no default timeout; callers must choose one.
#[derive(Debug, Clone)]
pub struct OcmConfig {
    /// API key sent in the `X-API-Key` header
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl OcmConfig {
    /// Create a new config with the given API key and request timeout.
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Client for the Open Charge Map `/poi` endpoint.
///
/// Makes exactly one request per [`fetch`](Self::fetch); retrying is up to
/// the caller.
#[derive(Debug, Clone)]
pub struct OcmClient {
    http: reqwest::Client,
    base_url: String,
}

impl OcmClient {
    /// Create a new client.
    pub fn new(config: OcmConfig) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();

        let api_key_header =
            HeaderValue::from_str(&config.api_key).map_err(|_| FetchError::Unavailable {
                message: "invalid API key format".to_string(),
            })?;
        headers.insert(HeaderName::from_static("x-api-key"), api_key_header);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(setup_error)?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }

    /// Fetch raw stations for a region.
    pub async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawStation>, FetchError> {
        let url = format!("{}/poi", self.base_url);
        debug!(%url, region = %request.region, "fetching stations");

        let response = self
            .http
            .get(&url)
            .query(&request.query_params())
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                message: "unauthorized: check OCM_API_KEY".to_string(),
            });
        }

        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) if !body.trim().is_empty() => body,
                Ok(_) => status
                    .canonical_reason()
                    .unwrap_or("<empty body>")
                    .to_string(),
                Err(_) => "<unreadable body>".to_string(),
            };
            return Err(FetchError::Upstream {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let stations = decode_stations(&body)?;

        info!(
            region = %request.region,
            count = stations.len(),
            "fetched stations"
        );
        Ok(stations)
    }
}

/// A client that can't be built is a setup problem, not a transport one.
fn setup_error(e: reqwest::Error) -> FetchError {
    FetchError::Unavailable {
        message: format!("failed to build HTTP client: {e}"),
    }
}

impl StationSource for OcmClient {
    async fn fetch(&self, request: &FetchRequest) -> Result<Vec<RawStation>, FetchError> {
        OcmClient::fetch(self, request).await
    }
}

use std::time::Duration;

use reqwest::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;
use serde_json::json;

use crate::error::RegistryError;

pub const SPACEX_API_URL: &str = "https://api.spacexdata.com/v4";

const FEED_TIMEOUT: Duration = Duration::from_secs(30);

/// One launch document as the feed returns it, reduced to the fields the
/// query selects: nested rocket and payload structures are kept as-is
/// here and flattened by the importer.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedLaunch {
    pub flight_number: u32,
    pub name: String,
    pub rocket: FeedRocket,
    #[serde(default)]
    pub payloads: Vec<FeedPayload>,
    pub date_local: String,
    pub upcoming: bool,
    /// `null` upstream for launches that have not flown yet.
    #[serde(default)]
    pub success: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedRocket {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedPayload {
    #[serde(default)]
    pub customers: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    docs: Vec<FeedLaunch>,
}

pub trait LaunchFeedClient: Send + Sync {
    /// Fetches the full launch collection in one request, in the feed's
    /// native order.
    fn fetch_launches(
        &self,
    ) -> impl Future<Output = Result<Vec<FeedLaunch>, RegistryError>> + Send;
}

#[derive(Clone)]
pub struct SpacexHttpClient {
    client: Client,
    base_url: String,
}

impl SpacexHttpClient {
    pub fn new() -> Result<Self, RegistryError> {
        Self::with_config(SPACEX_API_URL, FEED_TIMEOUT)
    }

    /// Client against a non-default endpoint or with a non-default
    /// request timeout. The timeout bounds the whole fetch; bootstrap
    /// fails instead of hanging on a stalled feed.
    pub fn with_config(base_url: &str, timeout: Duration) -> Result<Self, RegistryError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("launch-registry/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| RegistryError::FeedHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|err| RegistryError::FeedHttp(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl LaunchFeedClient for SpacexHttpClient {
    async fn fetch_launches(&self) -> Result<Vec<FeedLaunch>, RegistryError> {
        let url = format!("{}/launches/query", self.base_url);
        let body = json!({
            "query": {},
            "options": {
                "pagination": false,
                "populate": [
                    { "path": "rocket", "select": { "name": 1 } },
                    { "path": "payloads", "select": { "customers": 1 } }
                ]
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| RegistryError::FeedHttp(err.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "launch feed request failed".to_string());
            return Err(RegistryError::FeedStatus { status, message });
        }

        let parsed: QueryResponse = response
            .json()
            .await
            .map_err(|err| RegistryError::FeedHttp(err.to_string()))?;
        Ok(parsed.docs)
    }
}

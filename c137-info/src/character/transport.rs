//! Raw access to the character REST API
//!
//! The transport performs exactly one request per call. Timeouts, retries
//! and status interpretation belong to [`super::client::CharacterClient`].

use super::error::FetchError;
use async_trait::async_trait;
use std::time::Duration;

const USER_AGENT: &str = concat!("C137-INFO/", env!("CARGO_PKG_VERSION"));

/// Status and body of one upstream response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One GET against the character API
#[async_trait]
pub trait CharacterTransport: Send + Sync {
    /// `path` is relative to the API root (e.g. `/character/1`)
    async fn get(&self, path: &str, query: &[(&str, String)])
        -> Result<UpstreamResponse, FetchError>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    http_client: reqwest::Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpTransport {
    /// `request_timeout` is a safety net above the per-attempt timeout
    pub fn new(base_url: impl Into<String>, request_timeout: Duration) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(request_timeout)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CharacterTransport for HttpTransport {
    async fn get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<UpstreamResponse, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        tracing::debug!(url = %url, "Querying character API");

        let response = self
            .http_client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(e))?;

        Ok(UpstreamResponse { status, body })
    }
}

impl HttpTransport {
    fn map_reqwest_error(&self, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout(self.request_timeout)
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

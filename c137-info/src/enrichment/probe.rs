//! Wiki page existence check

use async_trait::async_trait;

/// Answers whether a wiki page exists
#[async_trait]
pub trait EntityProbe: Send + Sync {
    /// `Ok(false)` for a non-success response; `Err` only when the request
    /// itself could not be made
    async fn exists(&self, url: &str) -> Result<bool, String>;
}

/// Plain GET probe
pub struct HttpProbe {
    http_client: reqwest::Client,
}

impl HttpProbe {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl EntityProbe for HttpProbe {
    async fn exists(&self, url: &str) -> Result<bool, String> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), "Wiki probe response");
        Ok(status.is_success())
    }
}

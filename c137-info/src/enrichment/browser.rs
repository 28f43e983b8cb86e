//! Page rendering seam
//!
//! A [`PageRenderer`] launches a [`BrowserSession`] owned by exactly one
//! enrichment run. The run must call [`BrowserSession::close`] on every path
//! once launch succeeded.
//!
//! [`HttpPageRenderer`] is the built-in renderer: it loads the page over
//! HTTP without executing scripts, which is enough for server-rendered wiki
//! pages.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Primary navigation budget
pub const PRIMARY_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(45);

/// Budget for the single retry after a primary timeout
pub const RETRY_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(20);

/// Page state a navigation waits for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    DomContentLoaded,
    Load,
}

#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("Navigation timeout of {0:?} exceeded")]
    Timeout(Duration),

    #[error("Navigation failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Browser launch failed: {0}")]
    Launch(String),

    #[error("Page content unavailable: {0}")]
    Content(String),
}

/// Launches browser sessions
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError>;
}

/// One open page
#[async_trait]
pub trait BrowserSession: Send {
    async fn navigate(
        &mut self,
        url: &str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> Result<(), NavigationError>;

    /// Current page HTML
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// Release the session
    async fn close(self: Box<Self>);
}

/// Script-less renderer backed by reqwest
pub struct HttpPageRenderer {
    http_client: reqwest::Client,
}

impl HttpPageRenderer {
    pub fn new(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl PageRenderer for HttpPageRenderer {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>, BrowserError> {
        Ok(Box::new(HttpSession {
            http_client: self.http_client.clone(),
            html: None,
        }))
    }
}

struct HttpSession {
    http_client: reqwest::Client,
    html: Option<String>,
}

#[async_trait]
impl BrowserSession for HttpSession {
    async fn navigate(
        &mut self,
        url: &str,
        wait_until: WaitUntil,
        timeout: Duration,
    ) -> Result<(), NavigationError> {
        // Without a script engine both wait conditions mean "body received"
        tracing::debug!(url = %url, ?wait_until, ?timeout, "Loading page");

        let http_client = self.http_client.clone();
        let load = async move {
            let response = http_client
                .get(url)
                .send()
                .await
                .map_err(|e| NavigationError::Failed(e.to_string()))?;
            response
                .text()
                .await
                .map_err(|e| NavigationError::Failed(e.to_string()))
        };

        let outcome = tokio::time::timeout(timeout, load).await;
        match outcome {
            Ok(Ok(html)) => {
                self.html = Some(html);
                Ok(())
            }
            Ok(Err(e)) => Err(e),
            Err(_) => Err(NavigationError::Timeout(timeout)),
        }
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.html
            .clone()
            .ok_or_else(|| BrowserError::Content("no page loaded".to_string()))
    }

    async fn close(self: Box<Self>) {
        tracing::debug!("Page session closed");
    }
}

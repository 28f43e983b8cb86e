//! Resilient character API client
//!
//! Every upstream call goes through [`RetryPolicy::run`]; `random()` adds
//! the main-cast fallback chain on top.

use super::error::FetchError;
use super::fallback::{first_success, FALLBACK_CHARACTER_IDS};
use super::retry::RetryPolicy;
use super::transport::{CharacterTransport, HttpTransport};
use super::types::{CharacterPage, CharacterRecord};
use rand::Rng;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Source of the random id for `random()`
pub trait RandomIdSource: Send + Sync {
    /// Uniform id in `[1, count]`; `count` is at least 1
    fn pick(&self, count: u32) -> u32;
}

/// `rand::thread_rng` backed id source
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngIds;

impl RandomIdSource for ThreadRngIds {
    fn pick(&self, count: u32) -> u32 {
        rand::thread_rng().gen_range(1..=count)
    }
}

/// Character API client with retry, backoff and fallback
pub struct CharacterClient {
    transport: Arc<dyn CharacterTransport>,
    policy: RetryPolicy,
    ids: Arc<dyn RandomIdSource>,
    fallback_ids: Vec<u32>,
}

impl CharacterClient {
    pub fn new(transport: Arc<dyn CharacterTransport>, policy: RetryPolicy) -> Self {
        Self {
            transport,
            policy,
            ids: Arc::new(ThreadRngIds),
            fallback_ids: FALLBACK_CHARACTER_IDS.to_vec(),
        }
    }

    /// Client over HTTP against `base_url` (e.g. `https://rickandmortyapi.com/api`)
    pub fn http(base_url: &str, policy: RetryPolicy) -> Result<Self, FetchError> {
        // reqwest's own timeout only backs up the per-attempt timeout
        let transport = HttpTransport::new(base_url, policy.attempt_timeout.saturating_mul(2))?;
        Ok(Self::new(Arc::new(transport), policy))
    }

    pub fn with_id_source(mut self, ids: Arc<dyn RandomIdSource>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_fallback_ids(mut self, fallback_ids: Vec<u32>) -> Self {
        self.fallback_ids = fallback_ids;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Total number of characters known upstream
    pub async fn count(&self) -> Result<u32, FetchError> {
        let page: CharacterPage = self
            .fetch_json("character count", "/character", &[])
            .await?;
        Ok(page.info.count)
    }

    /// Fails with `NotFound` (wrapped in `Exhausted`) when upstream keeps
    /// answering with a non-success status
    pub async fn get_by_id(&self, id: u32) -> Result<CharacterRecord, FetchError> {
        let context = format!("character {}", id);
        let path = format!("/character/{}", id);

        self.fetch_json(&context, &path, &[])
            .await
            .map_err(|e| match e {
                FetchError::Exhausted {
                    context,
                    attempts,
                    source,
                } if matches!(*source, FetchError::Status(_)) => FetchError::Exhausted {
                    source: Box::new(FetchError::NotFound(context.clone())),
                    context,
                    attempts,
                },
                other => other,
            })
    }

    /// One page of characters (1-based)
    pub async fn get_page(&self, page: u32) -> Result<CharacterPage, FetchError> {
        let context = format!("characters page {}", page);
        self.fetch_json(&context, "/character", &[("page", page.to_string())])
            .await
    }

    /// Substring search; no matches is an empty page, not an error
    pub async fn search_by_name(&self, name: &str) -> Result<CharacterPage, FetchError> {
        let context = format!("character search '{}'", name);
        let query = [("name", name.to_string())];

        match self.fetch_body(&context, "/character/", &query, true).await? {
            Some(body) => decode(&context, &body),
            None => {
                tracing::debug!(name = %name, "Character search returned no matches");
                Ok(CharacterPage::empty())
            }
        }
    }

    /// Random character, degrading to the main cast on failure
    ///
    /// If the count or the random lookup fails, fallback ids are tried in
    /// order. When all of them fail too, the original error is returned.
    pub async fn random(&self) -> Result<CharacterRecord, FetchError> {
        let primary = self.random_once().await;
        let fallback_ids = self.fallback_ids.clone();
        first_success(primary, fallback_ids, |id| self.get_by_id(id)).await
    }

    async fn random_once(&self) -> Result<CharacterRecord, FetchError> {
        let count = self.count().await?;
        if count == 0 {
            return Err(FetchError::NotFound("characters (upstream count is 0)".to_string()));
        }

        let id = self.ids.pick(count);
        tracing::debug!(id, count, "Selected random character");

        let character = self.get_by_id(id).await?;
        tracing::info!(id = character.id, name = %character.name, "Retrieved random character");
        Ok(character)
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        context: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        match self.fetch_body(context, path, query, false).await? {
            Some(body) => decode(context, &body),
            None => Err(FetchError::NotFound(context.to_string())),
        }
    }

    /// Body of a successful response, retried per policy
    ///
    /// With `missing_ok`, a 404 ends the call immediately with `None`.
    async fn fetch_body(
        &self,
        context: &str,
        path: &str,
        query: &[(&str, String)],
        missing_ok: bool,
    ) -> Result<Option<String>, FetchError> {
        let transport = &self.transport;

        self.policy
            .run(context, || async move {
                let response = transport.get(path, query).await?;
                if response.is_success() {
                    Ok(Some(response.body))
                } else if missing_ok && response.status == 404 {
                    Ok(None)
                } else {
                    Err(FetchError::Status(response.status))
                }
            })
            .await
    }
}

fn decode<T: DeserializeOwned>(context: &str, body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(format!("{}: {}", context, e)))
}

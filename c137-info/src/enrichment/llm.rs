//! LLM completion client
//!
//! One system + user message pair in, one text payload out.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Completion request timeout
const COMPLETION_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("Completion request failed: {0}")]
    Http(String),

    #[error("Completion endpoint returned HTTP {0}: {1}")]
    Api(u16, String),

    #[error("Invalid completion response: {0}")]
    InvalidResponse(String),

    #[error("Completion response was empty")]
    EmptyResponse,
}

/// Opaque text transform
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Model identifier, for progress logs
    fn model(&self) -> &str;

    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// OpenAI-compatible chat completions client
pub struct OpenAiClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiClient {
    /// `endpoint` is the API root, e.g. `https://api.openai.com`
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        let http_client = reqwest::Client::builder()
            .timeout(COMPLETION_TIMEOUT)
            .build()
            .map_err(|e| CompletionError::Http(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    /// Same endpoint and key, different model
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        Self {
            http_client: self.http_client.clone(),
            endpoint: self.endpoint.clone(),
            api_key: self.api_key.clone(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError> {
        let url = format!("{}/v1/chat/completions", self.endpoint);
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        };

        tracing::debug!(model = %self.model, url = %url, "Requesting completion");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| CompletionError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api(status.as_u16(), error_text));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        extract_content(body)
    }
}

fn extract_content(body: ChatResponse) -> Result<String, CompletionError> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(CompletionError::EmptyResponse)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "gpt-4o-2024-08-06",
            messages: [
                ChatMessage {
                    role: "system",
                    content: "sys",
                },
                ChatMessage {
                    role: "user",
                    content: "usr",
                },
            ],
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4o-2024-08-06");
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "usr");
    }

    #[test]
    fn test_first_choice_content_is_result() {
        let body: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"REPORT"}},{"message":{"content":"other"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(body).unwrap(), "REPORT");
    }

    #[test]
    fn test_missing_content_is_empty_response() {
        let body: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(matches!(extract_content(body), Err(CompletionError::EmptyResponse)));

        let body: ChatResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(extract_content(body), Err(CompletionError::EmptyResponse)));
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client = OpenAiClient::new("https://api.openai.com/", "sk-test", "m").unwrap();
        assert_eq!(client.endpoint, "https://api.openai.com");
        assert_eq!(client.with_model("other").model(), "other");
    }
}

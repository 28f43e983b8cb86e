//! Runtime configuration resolution for c137-info
//!
//! Merges command-line overrides, environment variables and the TOML
//! bootstrap file into one [`ServiceConfig`].

use c137_common::config::{is_truthy, TomlConfig};
use std::path::PathBuf;
use tracing::{info, warn};

use crate::character::RetryPolicy;
use crate::enrichment::PromptTemplate;

/// Environment variable carrying the LLM API key
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

/// Environment flag selecting offline mode
pub const DEV_ENV_VAR: &str = "DEV";

/// Command-line values that override the TOML file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    pub dev: bool,
}

/// Fully resolved service settings
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_address: String,
    pub port: u16,
    pub character_api_base_url: String,
    pub wiki_base_url: String,
    pub about_content_path: PathBuf,
    pub dev_mode: bool,
    pub retry: RetryPolicy,
    pub llm_endpoint: String,
    pub llm_model: String,
    pub error_model: String,
    pub llm_api_key: Option<String>,
    pub prompt: PromptTemplate,
}

impl ServiceConfig {
    pub fn resolve(toml_config: &TomlConfig, overrides: &CliOverrides) -> Self {
        Self {
            bind_address: overrides
                .bind_address
                .clone()
                .unwrap_or_else(|| toml_config.bind_address.clone()),
            port: overrides.port.unwrap_or(toml_config.port),
            character_api_base_url: toml_config.character_api_base_url.clone(),
            wiki_base_url: toml_config.wiki_base_url.clone(),
            about_content_path: toml_config.about_content_path.clone(),
            dev_mode: resolve_dev_mode(overrides.dev, toml_config),
            retry: RetryPolicy::from(&toml_config.retry),
            llm_endpoint: toml_config.llm.endpoint.clone(),
            llm_model: toml_config.llm.model.clone(),
            error_model: toml_config.llm.error_model.clone(),
            llm_api_key: resolve_llm_api_key(toml_config),
            prompt: resolve_prompt(toml_config),
        }
    }

    /// `bind_address:port`
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

fn is_valid_key(key: &str) -> bool {
    !key.trim().is_empty()
}

/// Resolve the LLM API key
///
/// Priority: `OPENAI_API_KEY` environment variable → TOML `[llm] api_key`.
/// `None` leaves the service running; report requests then fail with a
/// configuration error.
pub fn resolve_llm_api_key(toml_config: &TomlConfig) -> Option<String> {
    let env_key = std::env::var(API_KEY_ENV_VAR)
        .ok()
        .filter(|k| is_valid_key(k));
    let toml_key = toml_config
        .llm
        .api_key
        .clone()
        .filter(|k| is_valid_key(k));

    if env_key.is_some() && toml_key.is_some() {
        warn!(
            "LLM API key found in multiple sources: environment, TOML. Using environment (highest priority)."
        );
    }

    if let Some(key) = env_key {
        info!("LLM API key loaded from environment variable");
        return Some(key);
    }

    if let Some(key) = toml_key {
        info!("LLM API key loaded from TOML config");
        return Some(key);
    }

    warn!("No LLM API key configured; character reports will be unavailable");
    None
}

/// Offline mode is on when `--dev`, a truthy `DEV`, or TOML `dev_mode` says so
pub fn resolve_dev_mode(cli_dev: bool, toml_config: &TomlConfig) -> bool {
    let env_dev = std::env::var(DEV_ENV_VAR)
        .map(|v| is_truthy(&v))
        .unwrap_or(false);
    cli_dev || env_dev || toml_config.dev_mode
}

fn resolve_prompt(toml_config: &TomlConfig) -> PromptTemplate {
    let Some(path) = &toml_config.llm.prompt_file else {
        return PromptTemplate::default();
    };

    match PromptTemplate::from_file(path) {
        Ok(prompt) => {
            info!("Report prompt loaded from {}", path.display());
            prompt
        }
        Err(e) => {
            warn!("{}; using built-in report prompt", e);
            PromptTemplate::default()
        }
    }
}

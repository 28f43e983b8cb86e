//! Bootstrap configuration loading
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments (--port, --bind, --config, --dev)
//! 2. Environment variables (C137_CONFIG, OPENAI_API_KEY, DEV)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants)
//!
//! A missing or unreadable TOML file is never fatal: the service logs a
//! warning and starts with defaults.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "C137_CONFIG";

/// Bootstrap configuration loaded from TOML file
///
/// These settings cannot change during runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address the HTTP server binds to
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Base URL of the public character REST API
    #[serde(default = "default_character_api_base_url")]
    pub character_api_base_url: String,

    /// Base URL that character names are appended to for wiki lookups
    #[serde(default = "default_wiki_base_url")]
    pub wiki_base_url: String,

    /// YAML file with the "about" page content
    #[serde(default = "default_about_content_path")]
    pub about_content_path: PathBuf,

    /// Offline mode: enrichment returns canned placeholder reports
    #[serde(default)]
    pub dev_mode: bool,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upstream retry tuning (optional)
    #[serde(default)]
    pub retry: RetryConfig,

    /// LLM completion endpoint (optional)
    #[serde(default)]
    pub llm: LlmConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Retry tuning for calls to the character API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt (total attempts = max_retries + 1)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry; doubles for every further retry
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Upper bound on a single attempt
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
}

/// LLM completion endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// OpenAI-compatible endpoint root (without /v1/chat/completions)
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    /// Model used for character reports
    #[serde(default = "default_report_model")]
    pub model: String,

    /// Model used for generated error messages
    #[serde(default = "default_error_model")]
    pub error_model: String,

    /// API key (OPENAI_API_KEY takes precedence)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Optional TOML file overriding the report prompt (`system`, `user`)
    #[serde(default)]
    pub prompt_file: Option<PathBuf>,
}

fn default_port() -> u16 {
    5137
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_character_api_base_url() -> String {
    "https://rickandmortyapi.com/api".to_string()
}

fn default_wiki_base_url() -> String {
    "https://rickandmorty.fandom.com/wiki/".to_string()
}

fn default_about_content_path() -> PathBuf {
    PathBuf::from("about-content.yaml")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_attempt_timeout_ms() -> u64 {
    10_000
}

fn default_llm_endpoint() -> String {
    "https://api.openai.com".to_string()
}

fn default_report_model() -> String {
    "gpt-4o-2024-08-06".to_string()
}

fn default_error_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            character_api_base_url: default_character_api_base_url(),
            wiki_base_url: default_wiki_base_url(),
            about_content_path: default_about_content_path(),
            dev_mode: false,
            logging: LoggingConfig::default(),
            retry: RetryConfig::default(),
            llm: LlmConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_report_model(),
            error_model: default_error_model(),
            api_key: None,
            prompt_file: None,
        }
    }
}

/// Locates the TOML config file
///
/// Priority: explicit path (CLI) → `C137_CONFIG` → user config directory.
pub struct ConfigFileResolver {
    cli_path: Option<PathBuf>,
}

impl ConfigFileResolver {
    pub fn new(cli_path: Option<PathBuf>) -> Self {
        Self { cli_path }
    }

    /// Resolve the config file path, if any candidate is known
    ///
    /// Explicit paths are returned even when the file does not exist so the
    /// loader can warn about them; the platform default is only returned
    /// when present.
    pub fn resolve(&self) -> Option<PathBuf> {
        if let Some(path) = &self.cli_path {
            return Some(path.clone());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        default_config_path().filter(|p| p.exists())
    }
}

/// Platform config location: `<config_dir>/c137-info/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("c137-info").join("config.toml"))
}

/// Parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read TOML failed ({}): {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed ({}): {}", path.display(), e)))
}

/// How the bootstrap configuration was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// No config file resolved
    Defaults,
    /// Parsed from this file
    File(PathBuf),
    /// The resolved file could not be used; defaults were substituted
    Fallback(String),
}

impl ConfigOrigin {
    /// Report the origin once logging is up
    pub fn log(&self) {
        match self {
            ConfigOrigin::Defaults => info!("No config file found, using built-in defaults"),
            ConfigOrigin::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigOrigin::Fallback(reason) => warn!("{}; using built-in defaults", reason),
        }
    }
}

/// Load the config file if one resolves, falling back to defaults
///
/// Runs before logging is initialized (the log level lives in the file), so
/// the outcome is returned for the caller to log.
pub fn load_or_default(path: Option<&Path>) -> (TomlConfig, ConfigOrigin) {
    let Some(path) = path else {
        return (TomlConfig::default(), ConfigOrigin::Defaults);
    };

    match load_toml_config(path) {
        Ok(config) => (config, ConfigOrigin::File(path.to_path_buf())),
        Err(e) => (TomlConfig::default(), ConfigOrigin::Fallback(e.to_string())),
    }
}

/// Interpret an environment-style boolean flag
///
/// Any non-empty value other than `0` / `false` / `no` / `off` enables it.
pub fn is_truthy(value: &str) -> bool {
    let value = value.trim().to_ascii_lowercase();
    !value.is_empty() && !matches!(value.as_str(), "0" | "false" | "no" | "off")
}

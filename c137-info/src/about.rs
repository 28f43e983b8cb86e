//! "About me" page content
//!
//! Loaded from a YAML file on every request so edits show up without a
//! restart. A missing or malformed file yields placeholder content that
//! tells the operator what to create.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beliefs {
    pub intro: String,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub additional: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutContent {
    pub introduction: String,
    pub academic: String,
    pub professional: String,
    pub musical: String,
    pub family: String,
    pub beliefs: Beliefs,
    pub closing: String,
    #[serde(default)]
    pub quick_info: Vec<String>,
}

impl AboutContent {
    /// Shown when the content file cannot be loaded
    pub fn placeholder() -> Self {
        let configure = |section: &str| format!("Configure your {} in about-content.yaml", section);
        Self {
            introduction: "**CONTENT FILE MISSING**\n\nThe about-content.yaml file was not found. \
                           Please create it with your personal bio content."
                .to_string(),
            academic: configure("academic background"),
            professional: configure("professional journey"),
            musical: configure("musical interests"),
            family: configure("family story"),
            beliefs: Beliefs {
                intro: configure("beliefs"),
                values: vec!["Add your values in about-content.yaml".to_string()],
                additional: vec!["Add additional points in about-content.yaml".to_string()],
            },
            closing: "Add your closing message in about-content.yaml".to_string(),
            quick_info: vec![
                "Create about-content.yaml".to_string(),
                "Add your personal content".to_string(),
                "Set about_content_path in the config file if it lives elsewhere".to_string(),
            ],
        }
    }
}

/// Parse an about-content YAML file
pub fn read_about(path: &Path) -> c137_common::Result<AboutContent> {
    let content = std::fs::read_to_string(path)?;
    serde_yaml::from_str(&content).map_err(|e| {
        c137_common::Error::Config(format!("Parse {} failed: {}", path.display(), e))
    })
}

/// Load about content, substituting the placeholder on any failure
pub fn load_about(path: &Path) -> AboutContent {
    match read_about(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Error loading about content from {}: {}", path.display(), e);
            AboutContent::placeholder()
        }
    }
}

//! Site preferences persisted through an injected key/value store
//!
//! `SitePreferences` is built once per process around a [`KeyValueStore`].
//! Storage failures never surface to callers: the in-memory value stays
//! authoritative and a warning is logged.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Storage key for the color mode
pub const COLOR_MODE_KEY: &str = "colorMode";

/// Storage key recording that the boot sequence was shown
pub const BOOT_SEEN_KEY: &str = "c137-info-boot-seen";

/// String key/value storage capability
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Volatile store, used in tests and when no file is configured
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Internal("memory store lock poisoned".to_string()))?;
        entries.remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object in one file
///
/// The whole file is rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or lazily create) the store at `path`
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content).map_err(|e| {
                    Error::Config(format!("Invalid preferences file {}: {}", path.display(), e))
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| Error::Internal(format!("Serialize preferences failed: {}", e)))?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn with_entries<T>(&self, f: impl FnOnce(&mut BTreeMap<String, String>) -> T) -> Result<T> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::Internal("preferences lock poisoned".to_string()))?;
        Ok(f(&mut entries))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let snapshot = self.with_entries(|entries| {
            entries.insert(key.to_string(), value.to_string());
            entries.clone()
        })?;
        self.persist(&snapshot)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let snapshot = self.with_entries(|entries| {
            entries.remove(key);
            entries.clone()
        })?;
        self.persist(&snapshot)
    }
}

/// UI color mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Dark,
    Light,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Dark => "dark",
            ColorMode::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(ColorMode::Dark),
            "light" => Some(ColorMode::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Dark => ColorMode::Light,
            ColorMode::Light => ColorMode::Dark,
        }
    }
}

/// Color mode and boot-sequence state
pub struct SitePreferences<S: KeyValueStore> {
    store: S,
    color_mode: ColorMode,
    boot_seen: bool,
}

impl<S: KeyValueStore> SitePreferences<S> {
    /// Load current values from `store`, defaulting anything unreadable
    pub fn load(store: S) -> Self {
        let color_mode = match store.get(COLOR_MODE_KEY) {
            Ok(Some(value)) => ColorMode::parse(&value).unwrap_or_else(|| {
                warn!("Unknown color mode '{}', using dark", value);
                ColorMode::Dark
            }),
            Ok(None) => ColorMode::Dark,
            Err(e) => {
                warn!("Could not read color mode: {}", e);
                ColorMode::Dark
            }
        };

        let boot_seen = match store.get(BOOT_SEEN_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("Storage not available, boot sequence will show each time: {}", e);
                false
            }
        };

        Self {
            store,
            color_mode,
            boot_seen,
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
        if let Err(e) = self.store.set(COLOR_MODE_KEY, mode.as_str()) {
            warn!("Could not save color mode: {}", e);
        }
    }

    /// Flip dark ↔ light and persist; returns the new mode
    pub fn toggle_color_mode(&mut self) -> ColorMode {
        let next = self.color_mode.toggled();
        self.set_color_mode(next);
        next
    }

    pub fn should_show_boot_sequence(&self) -> bool {
        !self.boot_seen
    }

    pub fn mark_boot_viewed(&mut self) {
        self.boot_seen = true;
        if let Err(e) = self.store.set(BOOT_SEEN_KEY, "true") {
            warn!("Could not save boot sequence state: {}", e);
        }
    }

    pub fn reset_boot_sequence(&mut self) {
        self.boot_seen = false;
        if let Err(e) = self.store.remove(BOOT_SEEN_KEY) {
            warn!("Could not clear boot sequence state: {}", e);
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

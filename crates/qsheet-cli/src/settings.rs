//! User settings.
//!
//! Settings are read from a TOML file in the user's config directory. Every
//! field has a default, so a missing or partial file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use qsheet_core::{DEFAULT_MAX_HISTORY, StoreConfig};
use qsheet_ingest::{DEFAULT_BASE_URL, DEFAULT_CACHE_TTL, DEFAULT_SLUG};
use qsheet_persistence::DEFAULT_STORAGE_KEY;

// =============================================================================
// ROOT SETTINGS
// =============================================================================

/// Application settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the sheet is saved.
    pub storage: StorageSettings,

    /// Undo/redo settings.
    pub history: HistorySettings,

    /// Remote sheet import settings.
    pub source: SourceSettings,
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path.
    ///
    /// A missing file gives the defaults. An unreadable file is logged and
    /// also gives the defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        toml::from_str(&content).unwrap_or_else(|error| {
            warn!(path = %path.display(), %error, "Ignoring invalid settings file");
            Self::default()
        })
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {e}"))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {e}"))?;

        std::fs::write(path, content).map_err(|e| format!("Failed to write settings: {e}"))
    }

    /// Get the default config file path.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "QuestionSheet", "qsheet")
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("settings.toml"))
    }

    /// Directory holding the saved sheet.
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.storage.dir {
            return dir.clone();
        }
        directories::ProjectDirs::from("com", "QuestionSheet", "qsheet")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Store configuration derived from these settings.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig {
            max_history: self.history.max_size,
        }
    }
}

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Data directory. Defaults to the platform data directory.
    pub dir: Option<PathBuf>,

    /// Record name; the sheet is saved as `<dir>/<key>.json`.
    pub key: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: None,
            key: DEFAULT_STORAGE_KEY.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistorySettings {
    /// Number of undo steps kept.
    /// Maximum number of snapshots kept for undo.
    pub max_size: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_HISTORY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    /// Root of the question-tracker API.
    pub base_url: String,

    /// Seconds a fetched sheet is reused.
    pub cache_ttl_secs: u64,

    /// Sheet imported when `import-sheet` gets no slug.
    pub default_slug: String,
}

impl SourceSettings {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            cache_ttl_secs: DEFAULT_CACHE_TTL.as_secs(),
            default_slug: DEFAULT_SLUG.to_string(),
        }
    }
}

//! EchoVault configuration management

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the slot that holds the serialized memory array
pub const DEFAULT_SLOT_NAME: &str = "echovault-memories";

/// Upper bound for `journal.week_days` (ten years)
pub const MAX_WEEK_DAYS: i64 = 3650;

/// Main EchoVault configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EchoVaultConfig {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Journal behavior (summaries, insights, input limits)
    #[serde(default)]
    pub journal: JournalConfig,

    /// Local API server configuration
    #[serde(default)]
    pub server: ServerConfig,
}

impl EchoVaultConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration: explicit path first, then the default
    /// location if it exists, then built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Default config file location (`<config_dir>/echovault/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs_next::config_dir().map(|p| p.join("echovault").join("config.toml"))
    }

    /// Reject values that would make the journal misbehave
    pub fn validate(&self) -> Result<()> {
        if self.storage.slot_name.trim().is_empty() {
            return Err(Error::Config("storage.slot_name must not be empty".to_string()));
        }
        if self
            .storage
            .slot_name
            .contains(|c: char| c == '/' || c == '\\')
        {
            return Err(Error::Config(format!(
                "storage.slot_name '{}' must not contain path separators",
                self.storage.slot_name
            )));
        }
        if self.journal.max_content_chars == 0 {
            return Err(Error::Config(
                "journal.max_content_chars must be greater than 0".to_string(),
            ));
        }
        if !(1..=MAX_WEEK_DAYS).contains(&self.journal.week_days) {
            return Err(Error::Config(format!(
                "journal.week_days must be between 1 and {}",
                MAX_WEEK_DAYS
            )));
        }
        Ok(())
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the slot file
    pub data_dir: PathBuf,

    /// Slot name; the file is `<data_dir>/<slot_name>.json`
    pub slot_name: String,
}

impl StorageConfig {
    /// Full path of the slot file
    pub fn slot_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.slot_name))
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs_next::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("echovault"),
            slot_name: DEFAULT_SLOT_NAME.to_string(),
        }
    }
}

/// Journal behavior configuration
///
/// The defaults reproduce the documented journal behavior exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JournalConfig {
    /// Maximum content length accepted at the input boundary, in characters
    pub max_content_chars: usize,

    /// Summaries kick in when the word count exceeds this
    pub summary_word_threshold: usize,

    /// Characters kept in a truncated summary
    pub summary_char_limit: usize,

    /// Number of most recent memories scanned for focus tags
    pub recent_window: usize,

    /// Entries kept in the top-emotion and focus-tag rankings
    pub top_n: usize,

    /// Length of the "this week" window in days
    pub week_days: i64,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            max_content_chars: 500,
            summary_word_threshold: 20,
            summary_char_limit: 100,
            recent_window: 10,
            top_n: 3,
            week_days: 7,
        }
    }
}

/// Local API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18791,
            cors_origins: Vec::new(),
        }
    }
}

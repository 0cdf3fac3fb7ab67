//! Configuration loading and management
//!
//! Handles parsing of `config.toml` inside the data directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::history::{HISTORY_FILE, MAX_HISTORY};

/// File name of the configuration file inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// File locations relative to the data directory
    #[serde(default)]
    pub storage: StorageConfig,

    /// Undo history configuration
    #[serde(default)]
    pub history: HistoryConfig,

    /// Terminal UI configuration
    #[serde(default)]
    pub ui: UiConfig,
}

/// Storage-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Task checklist file name
    #[serde(default = "default_tasks_file")]
    pub tasks_file: String,

    /// History document file name
    #[serde(default = "default_history_file")]
    pub history_file: String,
}

fn default_tasks_file() -> String {
    "tasks.md".to_string()
}

fn default_history_file() -> String {
    HISTORY_FILE.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tasks_file: default_tasks_file(),
            history_file: default_history_file(),
        }
    }
}

/// History-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of retained undo steps
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_max_entries() -> usize {
    MAX_HISTORY
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}

/// UI-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Show the key help line at the bottom of the screen
    #[serde(default = "default_true")]
    pub show_help: bool,

    /// Ask before deleting a task
    #[serde(default)]
    pub confirm_delete: bool,
}

fn default_true() -> bool {
    true
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_help: true,
            confirm_delete: false,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                warn!(path = %config_path.display(), error = %err, "invalid config, using defaults");
                Self::default()
            }
        }
    }

    /// Full path of the task file under `data_dir`
    pub fn tasks_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.storage.tasks_file)
    }

    /// Full path of the history file under `data_dir`
    pub fn history_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.storage.history_file)
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.storage.validate()?;
        self.history.validate()?;
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> crate::error::Result<()> {
        validate_file_name(&self.tasks_file, "storage.tasks_file")?;
        validate_file_name(&self.history_file, "storage.history_file")?;
        if self.tasks_file.trim() == self.history_file.trim() {
            return Err(crate::error::Error::InvalidConfig(
                "storage.tasks_file and storage.history_file must differ".to_string(),
            ));
        }
        Ok(())
    }
}

impl HistoryConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.max_entries == 0 {
            return Err(crate::error::Error::InvalidConfig(
                "history.max_entries must be > 0".to_string(),
            ));
        }
        if self.max_entries > MAX_HISTORY {
            return Err(crate::error::Error::InvalidConfig(format!(
                "history.max_entries must be <= {MAX_HISTORY}"
            )));
        }
        Ok(())
    }
}

fn validate_file_name(name: &str, field: &str) -> crate::error::Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field}: file name cannot be empty"
        )));
    }
    if trimmed.contains('/') || trimmed.contains('\\') || trimmed == "." || trimmed == ".." {
        return Err(crate::error::Error::InvalidConfig(format!(
            "{field}: '{trimmed}' must be a plain file name"
        )));
    }
    Ok(())
}

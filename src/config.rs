//! Configuration loading and management
//!
//! Handles parsing of the `config.toml` file and resolving where the
//! household data lives.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::storage::DEFAULT_STORAGE_KEY;

/// File name of the config inside the platform config dir
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Data directory used when no platform directory can be determined
pub const FALLBACK_DATA_DIR: &str = ".hausplan";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Prompt configuration
    #[serde(default)]
    pub prompt: PromptConfig,
}

/// Where and under which key the state is stored
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Storage key; the state lives in `<dir>/<key>.json`
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    /// Answer every confirmation with yes
    #[serde(default)]
    pub assume_yes: bool,
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Unreadable, unparsable and invalid files are all `InvalidConfig`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|err| {
            Error::InvalidConfig(format!("cannot read {}: {err}", path.display()))
        })?;
        let config: Config = toml::from_str(&content)
            .map_err(|err| Error::InvalidConfig(format!("{}: {err}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Load the given config, or the platform one, or return defaults
    ///
    /// An explicit path must load cleanly. The platform file is optional and
    /// falls back to defaults when broken.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        match Self::load(&path) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Ok(Self::default())
            }
        }
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Data directory: the override, then `storage.dir`, then the platform
    /// data dir, then `./.hausplan`
    pub fn data_dir(&self, override_dir: Option<&Path>) -> PathBuf {
        if let Some(dir) = override_dir {
            return dir.to_path_buf();
        }
        if let Some(dir) = &self.storage.dir {
            return dir.clone();
        }
        project_dirs()
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(FALLBACK_DATA_DIR))
    }

    fn validate(&self) -> Result<()> {
        self.storage.validate()
    }
}

impl StorageConfig {
    fn validate(&self) -> Result<()> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(Error::InvalidConfig(
                "storage.key cannot be empty".to_string(),
            ));
        }
        if key != self.key {
            return Err(Error::InvalidConfig(
                "storage.key cannot have surrounding whitespace".to_string(),
            ));
        }
        if !key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '-'))
        {
            return Err(Error::InvalidConfig(format!(
                "storage.key '{key}' may only contain letters, digits, '.', '_' and '-'"
            )));
        }
        if key.chars().all(|ch| ch == '.') {
            return Err(Error::InvalidConfig(format!(
                "storage.key '{key}' is not a valid file name"
            )));
        }
        Ok(())
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "hausplan")
}

/// Platform config file location, if the platform has one
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

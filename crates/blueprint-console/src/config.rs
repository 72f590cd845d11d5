//! Console configuration.
//!
//! Read from `~/.config/blueprint/console.toml` (or `--config`). Every field
//! has a default, so an empty or missing file is fine.
//!
//! ```toml
//! api_base_url = "http://robot.local:8000/api"
//! request_timeout_ms = 5000
//! draft_dir = "/var/tmp/blueprint-drafts"
//! min_split_size = 0.1
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use blueprint_kernel::FileDraftStore;
use blueprint_types::{DEFAULT_MIN_SPLIT_SIZE, InvariantError, LayoutLimits};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid layout limits: {0}")]
    Limits(#[from] InvariantError),

    #[error("no draft directory available on this platform; set draft_dir")]
    NoDraftDir,
}

/// Settings for the console and the `blueprint` tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Base URL of the blueprint catalogue, including any `/api` prefix.
    pub api_base_url: String,
    pub request_timeout_ms: u64,
    /// Override for the draft directory.
    pub draft_dir: Option<PathBuf>,
    pub min_split_size: f64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            draft_dir: None,
            min_split_size: DEFAULT_MIN_SPLIT_SIZE,
        }
    }
}

impl ConsoleConfig {
    /// `{config_dir}/blueprint/console.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("blueprint").join("console.toml"))
    }

    /// Load from an explicit path, or the default path.
    ///
    /// A missing default file yields defaults; a missing explicit file is an
    /// error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.limits()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn limits(&self) -> Result<LayoutLimits, ConfigError> {
        Ok(LayoutLimits::new(self.min_split_size)?)
    }

    /// The configured draft directory, else the platform default.
    pub fn draft_dir(&self) -> Result<PathBuf, ConfigError> {
        self.draft_dir
            .clone()
            .or_else(FileDraftStore::default_dir)
            .ok_or(ConfigError::NoDraftDir)
    }
}

//! Layered dashboard configuration.
//!
//! Values are resolved in order of increasing precedence: built-in defaults,
//! an optional JSON file, environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use scout_rag::RagConfig;
use scout_stats::TableSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable overriding [`ScoutConfig::stats_path`].
pub const STATS_PATH_ENV: &str = "SCOUT_STATS_PATH";
/// Environment variable overriding [`ScoutConfig::reports_dir`].
pub const REPORTS_DIR_ENV: &str = "SCOUT_REPORTS_DIR";
/// Environment variables holding the Gemini API key, in lookup order.
pub const API_KEY_ENVS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Errors raised while reading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read { path: PathBuf, source: std::io::Error },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse { path: PathBuf, source: serde_json::Error },

    #[error("invalid retrieval settings: {0}")]
    Rag(#[from] scout_rag::RagError),
}

/// Everything the dashboard needs at startup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoutConfig {
    /// CSV export of season stats.
    pub stats_path: PathBuf,
    /// Directory of plain-text scouting reports.
    pub reports_dir: PathBuf,
    /// Column names of the stats export.
    pub schema: TableSchema,
    /// Chunking, retrieval and timeout settings.
    pub rag: RagConfig,
    /// Gemini API key. Never written back out.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Use the offline backends even when an API key is present.
    pub offline: bool,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            stats_path: PathBuf::from("data/stats.csv"),
            reports_dir: PathBuf::from("data/articles"),
            schema: TableSchema::default(),
            rag: RagConfig::default(),
            api_key: None,
            offline: false,
        }
    }
}

/// Optional values from one layer (environment or flags).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub stats_path: Option<PathBuf>,
    pub reports_dir: Option<PathBuf>,
    pub api_key: Option<String>,
    pub offline: Option<bool>,
}

impl ConfigOverrides {
    /// Read overrides through `lookup`, treating blank values as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            stats_path: get(STATS_PATH_ENV).map(PathBuf::from),
            reports_dir: get(REPORTS_DIR_ENV).map(PathBuf::from),
            api_key: API_KEY_ENVS.iter().find_map(|key| get(key)),
            offline: None,
        }
    }

    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl ScoutConfig {
    /// Read a JSON config file. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// Overwrite every field that `overrides` sets.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(path) = overrides.stats_path {
            self.stats_path = path;
        }
        if let Some(dir) = overrides.reports_dir {
            self.reports_dir = dir;
        }
        if let Some(key) = overrides.api_key {
            self.api_key = Some(key);
        }
        if let Some(offline) = overrides.offline {
            self.offline = offline;
        }
    }

    /// Resolve the final configuration from all layers and validate it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// the retrieval settings are inconsistent.
    pub fn resolve(
        file: Option<&Path>,
        env: ConfigOverrides,
        flags: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply(env);
        config.apply(flags);
        config.rag.validate()?;
        Ok(config)
    }

    /// Whether the Gemini backends should be used.
    pub fn wants_remote_backends(&self) -> bool {
        !self.offline && self.api_key.is_some()
    }
}

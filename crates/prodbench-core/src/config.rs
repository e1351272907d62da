//! Configuration for prodbench
//!
//! Read from `config.toml`, looked up in order:
//! 1. an explicit path (`--config`)
//! 2. `$PRODBENCH_CONFIG_DIR/config.toml`
//! 3. `<platform config dir>/prodbench/config.toml`
//!
//! A missing file means built-in defaults.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BenchError, Result};

pub use types::{
    Backend, BenchConfig, LoadConfig, StoreConfig, DEFAULT_DATABASE_URL, DEFAULT_SQLITE_PATH,
};

const CONFIG_DIR: &str = "prodbench";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "PRODBENCH_CONFIG_DIR";

impl BenchConfig {
    /// Default location of the config file, if one can be determined
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            return Some(PathBuf::from(env_dir).join(CONFIG_FILE));
        }
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from an explicit path, or from the default location.
    ///
    /// An explicit path must exist; the default location may be absent.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(&path),
                _ => {
                    tracing::debug!("no config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| BenchError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: BenchConfig =
            toml::from_str(&content).map_err(|e| BenchError::InvalidConfig {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Reject settings the loader cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.load.batch_size == 0 {
            crate::bail_invalid!("batch size", "0 (must be at least 1)");
        }
        if self.load.progress_every == 0 {
            crate::bail_invalid!("progress interval", "0 (must be at least 1)");
        }
        self.vocabulary.validate()
    }
}

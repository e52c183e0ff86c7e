//! Configuration for claimscore
//!
//! Resolution order: an explicit path, then `./claimscore.toml`, then the
//! global file `<config dir>/claimscore/config.toml`, then defaults.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use crate::bail_invalid;
use crate::error::{EvalError, Result};

pub use types::{Config, EvaluationConfig, JudgeConfig, PipelineConfig, ResultsConfig};

/// Project-local config file name
pub const LOCAL_CONFIG_FILE: &str = "claimscore.toml";

const CONFIG_DIR: &str = "claimscore";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "CLAIMSCORE_CONFIG_DIR";

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            EvalError::Other(format!(
                "failed to read config from {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve configuration for a run
    ///
    /// An explicit path must exist. Otherwise the first existing file among
    /// `<cwd>/claimscore.toml` and the global config is used.
    pub fn resolve(explicit: Option<&Path>, cwd: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading explicit config");
            return Self::load(path);
        }

        let local = cwd.join(LOCAL_CONFIG_FILE);
        if local.exists() {
            tracing::debug!(path = %local.display(), "loading local config");
            return Self::load(&local);
        }

        if let Ok(global) = Self::global_path() {
            if global.exists() {
                tracing::debug!(path = %global.display(), "loading global config");
                return Self::load(&global);
            }
        }

        tracing::debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Path of the global config file
    pub fn global_path() -> Result<PathBuf> {
        // Allow environment variable override for testing
        let config_dir = if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            PathBuf::from(env_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| {
                    EvalError::Other("unable to determine config directory".to_string())
                })?
                .join(CONFIG_DIR)
        };

        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.evaluation.concurrency == 0 {
            bail_invalid!("evaluation.concurrency", "0 (must be at least 1)");
        }
        if self.judge.max_tokens == 0 {
            bail_invalid!("judge.max_tokens", "0 (must be at least 1)");
        }
        if self.judge.model.trim().is_empty() {
            bail_invalid!("judge.model", "empty string");
        }
        Ok(())
    }

    /// Serialize to pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| EvalError::Other(format!("failed to serialize config: {}", e)))
    }
}

//! Configuration for the `saltgen` binary. Every field is optional in the
//! JSON file and falls back to the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::generator::MIN_LENGTH;

/// Environment variable naming the config file used by the binary.
pub const CONFIG_ENV: &str = "SALTGEN_CONFIG";

const DEFAULT_LENGTH: i64 = 8;
const DEFAULT_COUNT: usize = 1;
const DEFAULT_MAX_ATTEMPTS: usize = 16;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file unreadable: {0}")]
    Io(String),
    #[error("config parse failed: {0}")]
    Parse(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SaltConfig {
    pub length: i64,
    pub count: usize,
    /// Per-salt retry budget for batch issuance.
    pub max_attempts: usize,
    /// Fixed RNG seed for reproducible output.
    pub seed: Option<u64>,
    /// Tracing filter directive used when `RUST_LOG` is unset.
    pub log_filter: Option<String>,
}

impl Default for SaltConfig {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            count: DEFAULT_COUNT,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            seed: None,
            log_filter: None,
        }
    }
}

impl SaltConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.length < MIN_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "length must be greater than 2, got {}",
                self.length
            )));
        }
        if self.count == 0 {
            return Err(ConfigError::Invalid("count must be at least 1".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "maxAttempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads and validates the JSON configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<SaltConfig, ConfigError> {
    let raw_json = fs::read_to_string(&path).map_err(|e| ConfigError::Io(format!("{e}")))?;
    let config: SaltConfig =
        serde_json::from_str(&raw_json).map_err(|e| ConfigError::Parse(format!("{e}")))?;
    config.validate()?;
    Ok(config)
}

/// Loads the file named by [`CONFIG_ENV`], or the defaults when it is unset.
pub fn load_from_env() -> Result<SaltConfig, ConfigError> {
    match std::env::var_os(CONFIG_ENV) {
        Some(path) => load_config(path),
        None => Ok(SaltConfig::default()),
    }
}

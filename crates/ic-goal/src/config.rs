// config.rs - Engine configuration.
//
// Loaded from a TOML file such as:
//
//   legacy_reactivation = false
//   events_log = "/var/log/improvement-cycle/events.jsonl"
//
// Every field has a default, so an empty file (or no file) is valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GoalError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EngineConfig {
    /// Allow the legacy Archived → Active reactivation path.
    #[serde(default = "default_legacy_reactivation")]
    pub legacy_reactivation: bool,

    /// Append lifecycle events as JSONL to this file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events_log: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            legacy_reactivation: default_legacy_reactivation(),
            events_log: None,
        }
    }
}

fn default_legacy_reactivation() -> bool {
    true
}

impl EngineConfig {
    /// Load config from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GoalError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| GoalError::IoError {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| GoalError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Try to load config, returning the default if the file is missing or invalid.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default engine config: {}", e);
                Self::default()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, GoalError> {
        Ok(toml::from_str(content)?)
    }
}

//! Mapper configuration
//!
//! Every field has a default, so an empty JSON object is a valid config.
//!
//! ```json
//! {
//!   "missing_field": "absent_is_null",
//!   "associative_detection": "string_keys",
//!   "empty_string": "cast",
//!   "log_level": "WARN"
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event_with_fields, Logger, Severity, Event};

/// What a field absent from the payload maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Absent fields are treated as null; nullability decides the outcome
    #[default]
    AbsentIsNull,
    /// Absent fields are a mapping error, even when nullable
    AbsentIsError,
}

/// How a JSON object supplied for an array field is classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociativeDetection {
    /// Associative if any key is not an integer (`{"0": .., "2": ..}` is positional)
    #[default]
    StringKeys,
    /// Associative unless keys are exactly `"0".."n-1"` in order (`{"0": .., "2": ..}` is associative)
    Reindexing,
}

/// What a nullable numeric field receives for an empty string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyStringPolicy {
    /// Permissive cast: `""` becomes `0` / `0.0`
    #[default]
    Cast,
    /// `""` becomes null
    Null,
}

/// Policies applied by a mapper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    pub missing_field: MissingFieldPolicy,
    pub associative_detection: AssociativeDetection,
    pub empty_string: EmptyStringPolicy,
    /// Minimum severity written by the logger. The logger is process-wide, so
    /// this takes effect through `load` or `apply_logging`, not per mapper.
    pub log_level: Severity,
}

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON in '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "REQMAP_CONFIG_READ",
            ConfigError::Parse { .. } => "REQMAP_CONFIG_INVALID",
        }
    }
}

impl MapperConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: MapperConfig =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        config.apply_logging();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );

        Ok(config)
    }

    /// Strict preset: absent fields are errors
    pub fn strict() -> Self {
        Self {
            missing_field: MissingFieldPolicy::AbsentIsError,
            ..Default::default()
        }
    }

    /// Applies `log_level` to the process-wide logger
    pub fn apply_logging(&self) {
        Logger::set_min_severity(self.log_level);
    }
}

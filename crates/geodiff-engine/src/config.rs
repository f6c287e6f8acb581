//! Writer configuration.
//!
//! Loaded from TOML; every key is optional:
//!
//! ```toml
//! invalid_actions = "log"          # ignore | log | break, any case
//! changeset_cache_capacity = 32768
//! skip_applied_versions = false
//! apply_entity_state = true
//! ```

#![allow(clippy::result_large_err)]

use geodiff_core::changeset::DEFAULT_CHANGESET_CACHE_CAPACITY;
use geodiff_core::errors::{ExError, ExErrorKind, Result};
use geodiff_core::{InvalidActionsMode, ProcessorOptions};
use geodiff_store::errors::io_error;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriterConfig {
    #[serde(deserialize_with = "deserialize_mode")]
    pub invalid_actions: InvalidActionsMode,
    pub changeset_cache_capacity: usize,
    pub skip_applied_versions: bool,
    pub apply_entity_state: bool,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            invalid_actions: InvalidActionsMode::Ignore,
            changeset_cache_capacity: DEFAULT_CHANGESET_CACHE_CAPACITY,
            skip_applied_versions: false,
            apply_entity_state: true,
        }
    }
}

fn deserialize_mode<'de, D>(deserializer: D) -> std::result::Result<InvalidActionsMode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

impl WriterConfig {
    /// Parse a TOML document.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::InvalidInput` for malformed TOML, unknown keys or
    /// an unrecognized `invalid_actions` value.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("load_config")
                .with_message(e.to_string())
        })
    }

    /// Read and parse a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Io` if the file cannot be read, otherwise as
    /// [`WriterConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| io_error("load_config", e))?;
        Self::from_toml_str(&text)
    }

    pub fn processor_options(&self) -> ProcessorOptions {
        ProcessorOptions {
            invalid_actions: self.invalid_actions,
            changeset_cache_capacity: self.changeset_cache_capacity,
            skip_applied_versions: self.skip_applied_versions,
            apply_entity_state: self.apply_entity_state,
        }
    }
}

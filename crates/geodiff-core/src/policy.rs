//! Invalid-action policy.
//!
//! Validation produces a verdict; this module decides what a run does with an
//! invalid one. The mode is a plain parameter passed in by the caller.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{GeoDiffError, Result};
use crate::rules::InvalidAction;
use geodiff_core_types::schema;

/// How to react when a change contradicts the stored entity state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidActionsMode {
    /// Record the change and say nothing
    #[default]
    Ignore,
    /// Record the change and emit a warning
    Log,
    /// Abort the run with a diagnostic
    Break,
}

impl InvalidActionsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidActionsMode::Ignore => "ignore",
            InvalidActionsMode::Log => "log",
            InvalidActionsMode::Break => "break",
        }
    }

    /// Apply the mode to one invalid action.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::InvalidAction` in `Break` mode.
    pub fn handle(&self, invalid: &InvalidAction) -> Result<()> {
        match self {
            InvalidActionsMode::Ignore => Ok(()),
            InvalidActionsMode::Log => {
                tracing::warn!(
                    component = module_path!(),
                    event = schema::EVENT_INVALID_ACTION,
                    entity_type = invalid.entity_type.as_str(),
                    entity_id = invalid.entity_id,
                    action = invalid.action.as_str(),
                    "Invalid action: {}",
                    invalid
                );
                Ok(())
            }
            InvalidActionsMode::Break => Err(GeoDiffError::InvalidAction(invalid.clone()).into()),
        }
    }
}

impl std::fmt::Display for InvalidActionsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvalidActionsMode {
    type Err = GeoDiffError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(InvalidActionsMode::Ignore),
            "log" => Ok(InvalidActionsMode::Log),
            "break" => Ok(InvalidActionsMode::Break),
            _ => Err(GeoDiffError::UnknownInvalidActionsMode {
                value: s.to_string(),
            }),
        }
    }
}

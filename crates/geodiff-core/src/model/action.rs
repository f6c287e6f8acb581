use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::GeoDiffError;

/// The change an input record claims to apply to an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Modify,
    Delete,
}

impl ChangeAction {
    /// All actions, in declaration order
    pub const ALL: [ChangeAction; 3] = [
        ChangeAction::Create,
        ChangeAction::Modify,
        ChangeAction::Delete,
    ];

    /// Stable upper-case name used in persisted audit rows
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeAction::Create => "CREATE",
            ChangeAction::Modify => "MODIFY",
            ChangeAction::Delete => "DELETE",
        }
    }
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeAction {
    type Err = GeoDiffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(ChangeAction::Create),
            "modify" => Ok(ChangeAction::Modify),
            "delete" => Ok(ChangeAction::Delete),
            _ => Err(GeoDiffError::UnknownAction {
                value: s.to_string(),
            }),
        }
    }
}

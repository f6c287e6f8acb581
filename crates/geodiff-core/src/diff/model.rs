//! Tag comparison output types.
//!
//! Collections use `BTreeMap` for deterministic iteration and serialization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::Tags;

/// Symmetric difference between two tag mappings.
///
/// Empty on all three sides exactly when the mappings are equal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagComparison {
    /// Keys present only in the next mapping
    pub added: Tags,
    /// Keys present only in the previous mapping
    pub removed: Tags,
    /// Keys present on both sides with different values
    pub changed: BTreeMap<String, TagValueChange>,
}

/// Old and new value of a tag present on both sides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TagValueChange {
    pub old: String,
    pub new: String,
}

impl TagComparison {
    /// True when both mappings had the same keys and values
    pub fn is_equal(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Every key that differs, sorted
    pub fn changed_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .added
            .keys()
            .chain(self.removed.keys())
            .chain(self.changed.keys())
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys
    }
}

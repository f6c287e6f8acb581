use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::action::ChangeAction;
use super::entity::{EntityType, Tags};
use super::geometry::Geometry;

/// Audit record describing one entity version transition
///
/// Built once per change by [`crate::diff::build_change`] and never mutated
/// afterwards. Identity fields are copied from the new snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub entity_id: i64,
    pub entity_type: EntityType,
    pub version: i64,
    pub changeset_id: i64,
    pub timestamp: Option<DateTime<Utc>>,
    pub action: ChangeAction,

    pub tags_changed: bool,
    pub geometry_changed: bool,
    pub members_changed: bool,

    pub previous_tags: Option<Tags>,
    pub new_tags: Option<Tags>,
    pub previous_geometry: Option<Geometry>,
    pub new_geometry: Option<Geometry>,
}

impl ChangeRecord {
    /// Whether any tracked dimension changed
    pub fn has_changes(&self) -> bool {
        self.tags_changed || self.geometry_changed || self.members_changed
    }

    /// Names of the changed dimensions, in a fixed order
    pub fn changed_dimensions(&self) -> Vec<&'static str> {
        let mut dims = Vec::new();
        if self.tags_changed {
            dims.push("tags");
        }
        if self.geometry_changed {
            dims.push("geometry");
        }
        if self.members_changed {
            dims.push("members");
        }
        dims
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use super::geometry::Geometry;
use crate::errors::GeoDiffError;

/// Key/value tag mapping; keys are unique and iterate in sorted order
pub type Tags = BTreeMap<String, String>;

/// The closed set of entity kinds tracked by the change log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Point,
    Line,
    Relation,
}

impl EntityType {
    /// All entity types, in declaration order
    pub const ALL: [EntityType; 3] = [EntityType::Point, EntityType::Line, EntityType::Relation];

    /// Single-letter code used as the persisted `el_type` column
    pub fn code(&self) -> &'static str {
        match self {
            EntityType::Point => "P",
            EntityType::Line => "L",
            EntityType::Relation => "R",
        }
    }

    /// Parse a persisted single-letter code
    pub fn from_code(code: &str) -> Result<Self, GeoDiffError> {
        match code {
            "P" => Ok(EntityType::Point),
            "L" => Ok(EntityType::Line),
            "R" => Ok(EntityType::Relation),
            _ => Err(GeoDiffError::UnknownEntityType {
                value: code.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Point => "Point",
            EntityType::Line => "Line",
            EntityType::Relation => "Relation",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = GeoDiffError;

    /// Accepts the canonical names plus the node/way aliases used by OSM feeds
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "point" | "node" => Ok(EntityType::Point),
            "line" | "way" => Ok(EntityType::Line),
            "relation" => Ok(EntityType::Relation),
            _ => Err(GeoDiffError::UnknownEntityType {
                value: s.to_string(),
            }),
        }
    }
}

/// Author of an entity version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
}

impl User {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// One ordered member of a relation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationMember {
    pub member_type: EntityType,
    pub member_id: i64,
    #[serde(default)]
    pub role: String,
}

/// A single immutable version of a geographic entity
///
/// `timestamp` is optional on input so that a record lacking one can be
/// rejected with an error naming the entity instead of failing to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    /// Stable identifier across versions (unique per entity type)
    pub entity_id: i64,

    pub entity_type: EntityType,

    /// Version number, starting at 1
    pub version: i64,

    /// Changeset this version was uploaded in
    pub changeset_id: i64,

    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub user: Option<User>,

    #[serde(default)]
    pub tags: Tags,

    /// Absent for deleted/invisible entities and for relations
    #[serde(default)]
    pub geometry: Option<Geometry>,

    /// Relation members in order; empty for points and lines
    #[serde(default)]
    pub members: Vec<RelationMember>,

    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl EntitySnapshot {
    /// Create a visible snapshot with no tags, geometry, user or timestamp
    pub fn new(entity_type: EntityType, entity_id: i64, version: i64, changeset_id: i64) -> Self {
        Self {
            entity_id,
            entity_type,
            version,
            changeset_id,
            timestamp: None,
            user: None,
            tags: Tags::new(),
            geometry: None,
            members: Vec::new(),
            visible: true,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_members(mut self, members: Vec<RelationMember>) -> Self {
        self.members = members;
        self
    }

    /// The invisible state left behind once this version is deleted
    ///
    /// Keeps identity, version, changeset, user and timestamp; drops tags,
    /// geometry and members.
    pub fn tombstone(&self) -> Self {
        Self {
            entity_id: self.entity_id,
            entity_type: self.entity_type,
            version: self.version,
            changeset_id: self.changeset_id,
            timestamp: self.timestamp,
            user: self.user.clone(),
            tags: Tags::new(),
            geometry: None,
            members: Vec::new(),
            visible: false,
        }
    }

    /// Human-readable identity, e.g. `Line 42`
    pub fn label(&self) -> String {
        format!("{} {}", self.entity_type, self.entity_id)
    }
}

//! Row mapping between SQLite columns and domain types
//!
//! Rows are first read into plain column structs inside the rusqlite
//! closure, then converted outside it so JSON and enum decoding errors
//! surface as `ExError` instead of being squeezed into `rusqlite::Error`.

#![allow(clippy::result_large_err)]

use chrono::{DateTime, Utc};
use geodiff_core::model::{
    ChangeAction, ChangeRecord, ChangesetRecord, EntitySnapshot, EntityType, Geometry,
    RelationMember, Tags, User,
};
use rusqlite::Row;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{corrupt_row, serialization_error, Result};

/// Epoch milliseconds, the on-disk timestamp representation
pub fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

pub fn from_millis(table: &str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| corrupt_row(table, format!("timestamp out of range: {}", millis)))
}

pub fn to_json<T: Serialize + ?Sized>(column: &str, value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(|e| serialization_error(column, e))
}

pub fn from_json<T: DeserializeOwned>(column: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| serialization_error(column, e))
}

fn from_json_opt<T: DeserializeOwned>(column: &str, text: Option<String>) -> Result<Option<T>> {
    text.map(|t| from_json(column, &t)).transpose()
}

fn entity_type(table: &str, code: &str) -> Result<EntityType> {
    EntityType::from_code(code).map_err(|e| corrupt_row(table, e))
}

/// Raw columns of an `entities` row joined with `users.name`
pub struct EntityRow {
    el_type: String,
    id: i64,
    version: i64,
    changeset_id: i64,
    tstamp: Option<i64>,
    user_id: Option<i64>,
    user_name: Option<String>,
    visible: bool,
    tags: String,
    geom: Option<String>,
    members: String,
}

impl EntityRow {
    /// Column list matching [`EntityRow::from_row`]
    pub const SELECT: &'static str = "SELECT e.el_type, e.id, e.version, e.changeset_id, e.tstamp,
                e.user_id, u.name, e.visible, e.tags, e.geom, e.members
         FROM entities e LEFT JOIN users u ON u.id = e.user_id";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            el_type: row.get(0)?,
            id: row.get(1)?,
            version: row.get(2)?,
            changeset_id: row.get(3)?,
            tstamp: row.get(4)?,
            user_id: row.get(5)?,
            user_name: row.get(6)?,
            visible: row.get(7)?,
            tags: row.get(8)?,
            geom: row.get(9)?,
            members: row.get(10)?,
        })
    }

    pub fn into_snapshot(self) -> Result<EntitySnapshot> {
        let entity_type = entity_type("entities", &self.el_type)?;
        let mut snapshot =
            EntitySnapshot::new(entity_type, self.id, self.version, self.changeset_id);

        snapshot.timestamp = self
            .tstamp
            .map(|ms| from_millis("entities", ms))
            .transpose()?;
        snapshot.user = self
            .user_id
            .map(|id| User::new(id, self.user_name.unwrap_or_default()));
        snapshot.visible = self.visible;
        snapshot.tags = from_json::<Tags>("entities.tags", &self.tags)?;
        snapshot.geometry = from_json_opt::<Geometry>("entities.geom", self.geom)?;
        snapshot.members = from_json::<Vec<RelationMember>>("entities.members", &self.members)?;
        Ok(snapshot)
    }
}

/// Raw columns of a `changes` row
pub struct ChangeRow {
    el_type: String,
    el_id: i64,
    version: i64,
    changeset_id: i64,
    tstamp: i64,
    action: String,
    changed_tags: bool,
    changed_geom: bool,
    changed_members: bool,
    current_tags: Option<String>,
    new_tags: Option<String>,
    current_geom: Option<String>,
    new_geom: Option<String>,
}

impl ChangeRow {
    /// Column list matching [`ChangeRow::from_row`]
    pub const SELECT: &'static str = "SELECT el_type, el_id, version, changeset_id, tstamp, action,
                changed_tags, changed_geom, changed_members,
                current_tags, new_tags, current_geom, new_geom
         FROM changes";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            el_type: row.get(0)?,
            el_id: row.get(1)?,
            version: row.get(2)?,
            changeset_id: row.get(3)?,
            tstamp: row.get(4)?,
            action: row.get(5)?,
            changed_tags: row.get(6)?,
            changed_geom: row.get(7)?,
            changed_members: row.get(8)?,
            current_tags: row.get(9)?,
            new_tags: row.get(10)?,
            current_geom: row.get(11)?,
            new_geom: row.get(12)?,
        })
    }

    pub fn into_record(self) -> Result<ChangeRecord> {
        let action: ChangeAction = self
            .action
            .parse()
            .map_err(|e| corrupt_row("changes", e))?;

        Ok(ChangeRecord {
            entity_id: self.el_id,
            entity_type: entity_type("changes", &self.el_type)?,
            version: self.version,
            changeset_id: self.changeset_id,
            timestamp: Some(from_millis("changes", self.tstamp)?),
            action,
            tags_changed: self.changed_tags,
            geometry_changed: self.changed_geom,
            members_changed: self.changed_members,
            previous_tags: from_json_opt("changes.current_tags", self.current_tags)?,
            new_tags: from_json_opt("changes.new_tags", self.new_tags)?,
            previous_geometry: from_json_opt("changes.current_geom", self.current_geom)?,
            new_geometry: from_json_opt("changes.new_geom", self.new_geom)?,
        })
    }
}

/// Raw columns of a `changesets` row
pub struct ChangesetRow {
    id: i64,
    user_id: i64,
    created_at: i64,
    closed_at: Option<i64>,
    num_changes: i64,
}

impl ChangesetRow {
    pub const SELECT: &'static str =
        "SELECT id, user_id, created_at, closed_at, num_changes FROM changesets";

    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            created_at: row.get(2)?,
            closed_at: row.get(3)?,
            num_changes: row.get(4)?,
        })
    }

    pub fn into_record(self) -> Result<ChangesetRecord> {
        Ok(ChangesetRecord {
            changeset_id: self.id,
            user_id: self.user_id,
            created_at: from_millis("changesets", self.created_at)?,
            closed_at: self
                .closed_at
                .map(|ms| from_millis("changesets", ms))
                .transpose()?,
            num_changes: self.num_changes,
        })
    }
}

//! SQLite implementation of the change-pipeline collaborators
//!
//! `SqliteStore` borrows a connection (or a transaction, through deref) and
//! issues no transaction control of its own; the caller decides where a run
//! begins and commits.

#![allow(clippy::result_large_err)]

use geodiff_core::collaborators::{ChangeSink, ChangesetStore, EntityStore, UserStore};
use geodiff_core::errors::{ExError, ExErrorKind};
use geodiff_core::model::{ChangeRecord, ChangesetRecord, EntitySnapshot, EntityType, User};
use rusqlite::{params, Connection, OptionalExtension};

use crate::errors::{from_rusqlite, Result};
use crate::repo::hydration::{to_json, to_millis};
use crate::repo::queries;

/// Change store backed by a SQLite connection
pub struct SqliteStore<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        self.conn
    }
}

impl EntityStore for SqliteStore<'_> {
    fn lookup(&self, entity_type: EntityType, entity_id: i64) -> Result<Option<EntitySnapshot>> {
        queries::get_entity(self.conn, entity_type, entity_id)
            .map_err(|e| e.with_entity(entity_type, entity_id))
    }

    fn save_current(&mut self, snapshot: &EntitySnapshot) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO entities (el_type, id, version, changeset_id, tstamp, user_id, visible, tags, geom, members)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                 ON CONFLICT(el_type, id) DO UPDATE SET
                    version = excluded.version,
                    changeset_id = excluded.changeset_id,
                    tstamp = excluded.tstamp,
                    user_id = excluded.user_id,
                    visible = excluded.visible,
                    tags = excluded.tags,
                    geom = excluded.geom,
                    members = excluded.members",
                params![
                    snapshot.entity_type.code(),
                    snapshot.entity_id,
                    snapshot.version,
                    snapshot.changeset_id,
                    snapshot.timestamp.map(to_millis),
                    snapshot.user.as_ref().map(|u| u.id),
                    snapshot.visible,
                    to_json("entities.tags", &snapshot.tags)?,
                    snapshot
                        .geometry
                        .as_ref()
                        .map(|g| to_json("entities.geom", g))
                        .transpose()?,
                    to_json("entities.members", &snapshot.members)?,
                ],
            )
            .map_err(|e| from_rusqlite(e).with_entity(snapshot.entity_type, snapshot.entity_id))?;

        Ok(())
    }
}

impl ChangesetStore for SqliteStore<'_> {
    fn changeset_exists(&self, changeset_id: i64) -> Result<bool> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM changesets WHERE id = ?1",
                [changeset_id],
                |_| Ok(()),
            )
            .optional()
            .map_err(|e| from_rusqlite(e).with_changeset_id(changeset_id))?;

        Ok(found.is_some())
    }

    fn create_changeset(&mut self, changeset: &ChangesetRecord) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO changesets (id, user_id, created_at, closed_at, num_changes)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    changeset.changeset_id,
                    changeset.user_id,
                    to_millis(changeset.created_at),
                    changeset.closed_at.map(to_millis),
                    changeset.num_changes,
                ],
            )
            .map_err(|e| from_rusqlite(e).with_changeset_id(changeset.changeset_id))?;

        Ok(())
    }

    fn recompute_changeset_summary(&mut self, changeset_id: i64) -> Result<()> {
        let updated = self
            .conn
            .execute(
                "UPDATE changesets SET
                    num_changes = (SELECT COUNT(*) FROM changes WHERE changeset_id = ?1),
                    closed_at = (SELECT MAX(tstamp) FROM changes WHERE changeset_id = ?1)
                 WHERE id = ?1",
                [changeset_id],
            )
            .map_err(|e| from_rusqlite(e).with_changeset_id(changeset_id))?;

        if updated == 0 {
            return Err(ExError::new(ExErrorKind::NotFound)
                .with_op("recompute_changeset_summary")
                .with_changeset_id(changeset_id)
                .with_message("changeset not found"));
        }
        Ok(())
    }
}

impl ChangeSink for SqliteStore<'_> {
    fn persist(&mut self, record: &ChangeRecord) -> Result<()> {
        let timestamp = record.timestamp.ok_or_else(|| {
            ExError::new(ExErrorKind::MissingField)
                .with_op("persist_change")
                .with_entity(record.entity_type, record.entity_id)
                .with_message("change record has no timestamp")
        })?;

        self.conn
            .execute(
                "INSERT INTO changes (el_type, el_id, version, changeset_id, tstamp, action,
                    changed_tags, changed_geom, changed_members,
                    current_tags, new_tags, current_geom, new_geom)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    record.entity_type.code(),
                    record.entity_id,
                    record.version,
                    record.changeset_id,
                    to_millis(timestamp),
                    record.action.as_str(),
                    record.tags_changed,
                    record.geometry_changed,
                    record.members_changed,
                    record
                        .previous_tags
                        .as_ref()
                        .map(|t| to_json("changes.current_tags", t))
                        .transpose()?,
                    record
                        .new_tags
                        .as_ref()
                        .map(|t| to_json("changes.new_tags", t))
                        .transpose()?,
                    record
                        .previous_geometry
                        .as_ref()
                        .map(|g| to_json("changes.current_geom", g))
                        .transpose()?,
                    record
                        .new_geometry
                        .as_ref()
                        .map(|g| to_json("changes.new_geom", g))
                        .transpose()?,
                ],
            )
            .map_err(|e| {
                from_rusqlite(e)
                    .with_entity(record.entity_type, record.entity_id)
                    .with_changeset_id(record.changeset_id)
            })?;

        Ok(())
    }
}

impl UserStore for SqliteStore<'_> {
    fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, name FROM users WHERE id = ?1",
                [user_id],
                |row| Ok(User::new(row.get(0)?, row.get::<_, String>(1)?)),
            )
            .optional()
            .map_err(from_rusqlite)
    }

    fn add_user(&mut self, user: &User) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO users (id, name) VALUES (?1, ?2)",
                params![user.id, user.name],
            )
            .map_err(from_rusqlite)?;
        Ok(())
    }

    fn update_user(&mut self, user: &User) -> Result<()> {
        self.conn
            .execute(
                "UPDATE users SET name = ?2 WHERE id = ?1",
                params![user.id, user.name],
            )
            .map_err(from_rusqlite)?;
        Ok(())
    }
}

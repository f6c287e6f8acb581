//! Read-side queries over the change log

#![allow(clippy::result_large_err)]

use geodiff_core::model::{ChangeRecord, ChangesetRecord, EntitySnapshot, EntityType};
use rusqlite::{Connection, OptionalExtension};

use crate::errors::{from_rusqlite, Result};
use crate::repo::hydration::{ChangeRow, ChangesetRow, EntityRow};

/// Fetch one changeset by id
pub fn get_changeset(conn: &Connection, changeset_id: i64) -> Result<Option<ChangesetRecord>> {
    let sql = format!("{} WHERE id = ?1", ChangesetRow::SELECT);
    conn.query_row(&sql, [changeset_id], ChangesetRow::from_row)
        .optional()
        .map_err(from_rusqlite)?
        .map(ChangesetRow::into_record)
        .transpose()
}

/// Audit records of one changeset, in write order
pub fn list_changes(conn: &Connection, changeset_id: i64) -> Result<Vec<ChangeRecord>> {
    let sql = format!("{} WHERE changeset_id = ?1 ORDER BY id", ChangeRow::SELECT);
    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map([changeset_id], ChangeRow::from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    rows.into_iter().map(ChangeRow::into_record).collect()
}

/// Every audit record of one entity, oldest version first
pub fn entity_history(
    conn: &Connection,
    entity_type: EntityType,
    entity_id: i64,
) -> Result<Vec<ChangeRecord>> {
    let sql = format!(
        "{} WHERE el_type = ?1 AND el_id = ?2 ORDER BY version, id",
        ChangeRow::SELECT
    );
    let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
    let rows = stmt
        .query_map(rusqlite::params![entity_type.code(), entity_id], ChangeRow::from_row)
        .map_err(from_rusqlite)?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(from_rusqlite)?;

    rows.into_iter().map(ChangeRow::into_record).collect()
}

/// Current state of one entity
pub fn get_entity(
    conn: &Connection,
    entity_type: EntityType,
    entity_id: i64,
) -> Result<Option<EntitySnapshot>> {
    let sql = format!("{} WHERE e.el_type = ?1 AND e.id = ?2", EntityRow::SELECT);
    conn.query_row(
        &sql,
        rusqlite::params![entity_type.code(), entity_id],
        EntityRow::from_row,
    )
    .optional()
    .map_err(from_rusqlite)?
    .map(EntityRow::into_snapshot)
    .transpose()
}

/// Total number of audit records
pub fn count_changes(conn: &Connection) -> Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM changes", [], |row| row.get(0))
        .map_err(from_rusqlite)
}

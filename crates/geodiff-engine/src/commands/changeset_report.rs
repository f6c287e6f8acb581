//! Read-side view of a changeset and its audit records.

#![allow(clippy::result_large_err)]

use geodiff_core::diff::render_change_summary;
use geodiff_core::errors::Result;
use geodiff_core::{ChangeRecord, ChangesetRecord};
use geodiff_store::repo::queries;
use rusqlite::Connection;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangesetReport {
    pub changeset: ChangesetRecord,
    pub changes: Vec<ChangeRecord>,
}

impl ChangesetReport {
    /// One line per change, e.g. `MODIFY Point 7 v3 (changeset 500): geometry`
    pub fn summary_lines(&self) -> Vec<String> {
        self.changes.iter().map(render_change_summary).collect()
    }
}

/// Load a changeset with its changes in insertion order.
///
/// Returns `Ok(None)` for an unknown changeset id.
///
/// # Errors
///
/// Returns a persistence error if the database cannot be read.
pub fn changeset_report(conn: &Connection, changeset_id: i64) -> Result<Option<ChangesetReport>> {
    let Some(changeset) = queries::get_changeset(conn, changeset_id)? else {
        return Ok(None);
    };
    let changes = queries::list_changes(conn, changeset_id)?;
    Ok(Some(ChangesetReport { changeset, changes }))
}

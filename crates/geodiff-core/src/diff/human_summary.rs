//! Human-readable rendering of change records.

use crate::model::{ChangeAction, ChangeRecord};

/// Render a one-line summary of a [`ChangeRecord`].
///
/// Informational only; used by the CLI and in log output. Example:
/// `MODIFY Point 7 v3 (changeset 500): geometry`
pub fn render_change_summary(record: &ChangeRecord) -> String {
    let dims = record.changed_dimensions();
    let detail = match record.action {
        ChangeAction::Modify if dims.is_empty() => "no changes".to_string(),
        _ if dims.is_empty() => "-".to_string(),
        _ => dims.join(", "),
    };

    format!(
        "{} {} {} v{} (changeset {}): {}",
        record.action, record.entity_type, record.entity_id, record.version, record.changeset_id, detail
    )
}

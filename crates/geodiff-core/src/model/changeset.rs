use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User id recorded for changesets whose entities carry no user
pub const ANONYMOUS_USER_ID: i64 = -1;

/// A logical transaction grouping one or more entity changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangesetRecord {
    pub changeset_id: i64,
    pub user_id: i64,

    /// Timestamp of the first entity observed in this changeset
    pub created_at: DateTime<Utc>,

    /// Timestamp of the latest recorded change; set by summary recomputation
    pub closed_at: Option<DateTime<Utc>>,

    /// Number of recorded changes; starts at 0, recomputed at end of run
    pub num_changes: i64,
}

impl ChangesetRecord {
    /// A freshly observed changeset with no recorded changes yet
    pub fn new(changeset_id: i64, user_id: i64, created_at: DateTime<Utc>) -> Self {
        Self {
            changeset_id,
            user_id,
            created_at,
            closed_at: None,
            num_changes: 0,
        }
    }
}

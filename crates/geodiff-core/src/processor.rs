//! Per-change pipeline.
//!
//! [`ChangeProcessor`] wires the validator, the diff builder and the
//! changeset aggregator together for one run:
//!
//! 1. reject entities without a timestamp or with a version below 1
//! 2. bring the author's user row up to date (once per run)
//! 3. ensure the changeset exists and mark it touched
//! 4. look up the previous version
//! 5. optionally skip versions already applied
//! 6. validate the action and apply the invalid-actions policy
//! 7. build and persist the [`ChangeRecord`]
//! 8. update the stored current state
//!
//! [`ChangeProcessor::finalize_run`] then refreshes every touched changeset
//! exactly once. The processor issues no transaction control.

use geodiff_core_types::RunId;
use serde::{Deserialize, Serialize};

use crate::changeset::{ChangesetAggregator, DEFAULT_CHANGESET_CACHE_CAPACITY};
use crate::collaborators::ChangeStore;
use crate::diff::build_change;
use crate::errors::{ExError, GeoDiffError, Result};
use crate::model::{ChangeAction, ChangeRecord, EntitySnapshot, EntityType, ANONYMOUS_USER_ID};
use crate::policy::InvalidActionsMode;
use crate::rules::{validate_action, ActionVerdict, InvalidAction};
use crate::users::UserRegistry;

/// Knobs for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessorOptions {
    pub invalid_actions: InvalidActionsMode,
    pub changeset_cache_capacity: usize,
    /// Skip changes whose version is not newer than the stored one
    pub skip_applied_versions: bool,
    /// Maintain current entity state after each change
    pub apply_entity_state: bool,
}

impl Default for ProcessorOptions {
    fn default() -> Self {
        Self {
            invalid_actions: InvalidActionsMode::default(),
            changeset_cache_capacity: DEFAULT_CHANGESET_CACHE_CAPACITY,
            skip_applied_versions: false,
            apply_entity_state: true,
        }
    }
}

/// Result of processing one change
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeOutcome {
    /// An audit record was persisted; `invalid` is set when validation
    /// failed but the policy let the change through
    Recorded {
        record: ChangeRecord,
        invalid: Option<InvalidAction>,
    },
    /// The stored version already covers this change
    Skipped {
        entity_type: EntityType,
        entity_id: i64,
        version: i64,
        stored_version: i64,
    },
}

impl ChangeOutcome {
    pub fn record(&self) -> Option<&ChangeRecord> {
        match self {
            ChangeOutcome::Recorded { record, .. } => Some(record),
            ChangeOutcome::Skipped { .. } => None,
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Changes that produced an audit record
    pub processed: u64,
    /// Changes skipped as already applied
    pub skipped: u64,
    /// Changes that failed validation (recorded or not)
    pub invalid: u64,
}

/// Summary returned by [`ChangeProcessor::finalize_run`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub run_id: RunId,
    pub stats: RunStats,
    /// Finalized changeset ids in first-touched order
    pub changesets: Vec<i64>,
}

/// Processes the changes of a single run
#[derive(Debug)]
pub struct ChangeProcessor {
    options: ProcessorOptions,
    run_id: RunId,
    aggregator: ChangesetAggregator,
    users: UserRegistry,
    stats: RunStats,
}

impl ChangeProcessor {
    pub fn new(options: ProcessorOptions) -> Self {
        Self::with_run_id(options, RunId::new())
    }

    pub fn with_run_id(options: ProcessorOptions, run_id: RunId) -> Self {
        let aggregator = ChangesetAggregator::new(options.changeset_cache_capacity);
        Self {
            options,
            run_id,
            aggregator,
            users: UserRegistry::new(),
            stats: RunStats::default(),
        }
    }

    pub fn options(&self) -> &ProcessorOptions {
        &self.options
    }

    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn aggregator(&self) -> &ChangesetAggregator {
        &self.aggregator
    }

    /// Process one `(action, next)` pair against `store`.
    ///
    /// # Errors
    ///
    /// - `ExErrorKind::MissingField` if `next` has no timestamp
    /// - `ExErrorKind::InvalidInput` if `next.version` is below 1
    /// - `ExErrorKind::InvalidAction` if validation fails in `Break` mode
    /// - any store error, unchanged apart from added context
    #[allow(clippy::result_large_err)]
    pub fn process<S: ChangeStore + ?Sized>(
        &mut self,
        store: &mut S,
        action: ChangeAction,
        next: &EntitySnapshot,
    ) -> Result<ChangeOutcome> {
        self.process_inner(store, action, next)
            .map_err(|e| self.with_context(e, next))
    }

    fn process_inner<S: ChangeStore + ?Sized>(
        &mut self,
        store: &mut S,
        action: ChangeAction,
        next: &EntitySnapshot,
    ) -> Result<ChangeOutcome> {
        let timestamp = next.timestamp.ok_or(GeoDiffError::MissingTimestamp {
            entity_type: next.entity_type,
            entity_id: next.entity_id,
        })?;
        if next.version < 1 {
            return Err(GeoDiffError::InvalidVersion {
                entity_type: next.entity_type,
                entity_id: next.entity_id,
                version: next.version,
            }
            .into());
        }

        self.users.ensure_user(store, next.user.as_ref())?;

        let user_id = next.user.as_ref().map_or(ANONYMOUS_USER_ID, |u| u.id);
        self.aggregator
            .ensure_changeset(store, next.changeset_id, user_id, timestamp)?;
        self.aggregator.mark_touched(next.changeset_id);

        let previous = store.lookup(next.entity_type, next.entity_id)?;

        if self.options.skip_applied_versions {
            if let Some(stored) = previous.as_ref().filter(|p| p.version >= next.version) {
                self.stats.skipped += 1;
                tracing::debug!(
                    entity = %next.label(),
                    version = next.version,
                    stored_version = stored.version,
                    "change already applied, skipping"
                );
                return Ok(ChangeOutcome::Skipped {
                    entity_type: next.entity_type,
                    entity_id: next.entity_id,
                    version: next.version,
                    stored_version: stored.version,
                });
            }
        }

        let invalid = match validate_action(action, previous.as_ref(), next) {
            ActionVerdict::Valid => None,
            ActionVerdict::Invalid(invalid) => {
                self.stats.invalid += 1;
                self.options.invalid_actions.handle(&invalid)?;
                Some(invalid)
            }
        };

        let record = build_change(action, previous.as_ref(), next);
        store.persist(&record)?;

        if self.options.apply_entity_state {
            match action {
                ChangeAction::Delete => store.save_current(&next.tombstone())?,
                ChangeAction::Create | ChangeAction::Modify => store.save_current(next)?,
            }
        }

        self.stats.processed += 1;
        Ok(ChangeOutcome::Recorded { record, invalid })
    }

    fn with_context(&self, err: ExError, next: &EntitySnapshot) -> ExError {
        let err = if err.entity_id().is_none() {
            err.with_entity(next.entity_type, next.entity_id)
        } else {
            err
        };
        let err = if err.changeset_id().is_none() {
            err.with_changeset_id(next.changeset_id)
        } else {
            err
        };
        err.with_run_id(self.run_id.clone())
    }

    /// Process a whole ordered change sequence, then finalize.
    ///
    /// # Errors
    ///
    /// Stops at the first error; nothing is finalized in that case.
    #[allow(clippy::result_large_err)]
    pub fn run<S, I>(&mut self, store: &mut S, changes: I) -> Result<RunReport>
    where
        S: ChangeStore + ?Sized,
        I: IntoIterator<Item = (ChangeAction, EntitySnapshot)>,
    {
        for (action, next) in changes {
            self.process(store, action, &next)?;
        }
        self.finalize_run(store)
    }

    /// Refresh every touched changeset once and report the run.
    ///
    /// # Errors
    ///
    /// Propagates the first store error; the touched set is kept so the
    /// call can be retried.
    #[allow(clippy::result_large_err)]
    pub fn finalize_run<S: ChangeStore + ?Sized>(&mut self, store: &mut S) -> Result<RunReport> {
        let changesets = self
            .aggregator
            .finalize_run(store)
            .map_err(|e| e.with_run_id(self.run_id.clone()))?;

        Ok(RunReport {
            run_id: self.run_id.clone(),
            stats: self.stats,
            changesets,
        })
    }
}

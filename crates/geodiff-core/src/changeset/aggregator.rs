use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::changeset::cache::ChangesetIdCache;
use crate::collaborators::ChangesetStore;
use crate::errors::Result;
use crate::model::ChangesetRecord;

/// What [`ChangesetAggregator::ensure_changeset`] had to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// Id was already in the cache; the store was not consulted
    Cached,
    /// Store already had the changeset
    Confirmed,
    /// Changeset was missing and has been created with zero changes
    Created,
}

/// Per-run changeset state: confirmed-id cache plus touched set
///
/// Constructed once per run and passed explicitly.
#[derive(Debug, Clone, Default)]
pub struct ChangesetAggregator {
    cache: ChangesetIdCache,
    touched_order: Vec<i64>,
    touched: HashSet<i64>,
}

impl ChangesetAggregator {
    pub fn new(cache_capacity: usize) -> Self {
        Self {
            cache: ChangesetIdCache::new(cache_capacity),
            touched_order: Vec::new(),
            touched: HashSet::new(),
        }
    }

    /// Make sure the changeset exists in the store.
    ///
    /// A cache hit short-circuits. Otherwise the store is asked; a missing
    /// changeset is created with `num_changes = 0`. Either way the id ends up
    /// in the cache.
    ///
    /// # Errors
    ///
    /// Propagates store errors unchanged.
    #[allow(clippy::result_large_err)]
    pub fn ensure_changeset<S: ChangesetStore + ?Sized>(
        &mut self,
        store: &mut S,
        changeset_id: i64,
        user_id: i64,
        created_at: DateTime<Utc>,
    ) -> Result<EnsureOutcome> {
        if self.cache.contains(changeset_id) {
            return Ok(EnsureOutcome::Cached);
        }

        let outcome = if store.changeset_exists(changeset_id)? {
            EnsureOutcome::Confirmed
        } else {
            store.create_changeset(&ChangesetRecord::new(changeset_id, user_id, created_at))?;
            EnsureOutcome::Created
        };

        if let Some(evicted) = self.cache.insert(changeset_id) {
            tracing::trace!(evicted, "changeset cache full, evicted oldest id");
        }
        Ok(outcome)
    }

    /// Record that a change was written against this changeset
    pub fn mark_touched(&mut self, changeset_id: i64) {
        if self.touched.insert(changeset_id) {
            self.touched_order.push(changeset_id);
        }
    }

    /// Touched ids in first-touched order
    pub fn touched(&self) -> &[i64] {
        &self.touched_order
    }

    pub fn cache(&self) -> &ChangesetIdCache {
        &self.cache
    }

    /// Recompute the summary of every touched changeset exactly once.
    ///
    /// Returns the ids in first-touched order and clears the touched set.
    /// On error the touched set is left intact.
    ///
    /// # Errors
    ///
    /// Propagates the first store error.
    #[allow(clippy::result_large_err)]
    pub fn finalize_run<S: ChangesetStore + ?Sized>(&mut self, store: &mut S) -> Result<Vec<i64>> {
        for &changeset_id in &self.touched_order {
            store
                .recompute_changeset_summary(changeset_id)
                .map_err(|e| e.with_changeset_id(changeset_id))?;
        }

        self.touched.clear();
        Ok(std::mem::take(&mut self.touched_order))
    }
}

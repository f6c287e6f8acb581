//! Changeset bookkeeping for a single run.
//!
//! [`ChangesetIdCache`] remembers changeset ids already confirmed in the
//! store; [`ChangesetAggregator`] ensures each referenced changeset exists and
//! refreshes the summary of every touched changeset once at run end.

pub mod aggregator;
pub mod cache;

pub use aggregator::{ChangesetAggregator, EnsureOutcome};
pub use cache::{ChangesetIdCache, DEFAULT_CHANGESET_CACHE_CAPACITY};

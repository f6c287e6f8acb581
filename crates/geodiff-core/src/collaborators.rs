//! Store interfaces consumed by the change pipeline.
//!
//! The core never talks to a database directly. Persistence backends
//! (`geodiff-store`'s `SqliteStore`, [`crate::ops::MemoryStore`] in tests)
//! implement these traits, and the processor is generic over them.

use crate::errors::ExError;
use crate::model::{ChangeRecord, ChangesetRecord, EntitySnapshot, EntityType, User};

/// Current-state lookup for entities.
#[allow(clippy::result_large_err)]
pub trait EntityStore {
    /// Fetch the last stored version of an entity.
    ///
    /// "Not found" is `Ok(None)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the store is unavailable.
    fn lookup(&self, entity_type: EntityType, entity_id: i64)
        -> Result<Option<EntitySnapshot>, ExError>;

    /// Replace the stored current state of an entity.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the write fails.
    fn save_current(&mut self, snapshot: &EntitySnapshot) -> Result<(), ExError>;
}

/// Changeset existence checks, creation and summary maintenance.
#[allow(clippy::result_large_err)]
pub trait ChangesetStore {
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the store is unavailable.
    fn changeset_exists(&self, changeset_id: i64) -> Result<bool, ExError>;

    /// Insert a new changeset row.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::AlreadyExists` or `ExErrorKind::Persistence`.
    fn create_changeset(&mut self, changeset: &ChangesetRecord) -> Result<(), ExError>;

    /// Recompute `num_changes` and `closed_at` from the persisted changes.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::NotFound` if the changeset is unknown, or
    /// `ExErrorKind::Persistence` if the update fails.
    fn recompute_changeset_summary(&mut self, changeset_id: i64) -> Result<(), ExError>;
}

/// Durable sink for audit records.
#[allow(clippy::result_large_err)]
pub trait ChangeSink {
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the write fails.
    fn persist(&mut self, record: &ChangeRecord) -> Result<(), ExError>;
}

/// User table access.
#[allow(clippy::result_large_err)]
pub trait UserStore {
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the store is unavailable.
    fn get_user(&self, user_id: i64) -> Result<Option<User>, ExError>;

    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the write fails.
    fn add_user(&mut self, user: &User) -> Result<(), ExError>;

    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if the write fails.
    fn update_user(&mut self, user: &User) -> Result<(), ExError>;
}

/// Everything a change run needs from its backend.
pub trait ChangeStore: EntityStore + ChangesetStore + ChangeSink + UserStore {}

impl<T> ChangeStore for T where T: EntityStore + ChangesetStore + ChangeSink + UserStore + ?Sized {}

use std::cell::Cell;
use std::collections::{BTreeMap, HashMap};

use crate::collaborators::{ChangeSink, ChangesetStore, EntityStore, UserStore};
use crate::errors::{ExError, ExErrorKind, Result};
use crate::model::{ChangeRecord, ChangesetRecord, EntitySnapshot, EntityType, User};

/// In-memory backend implementing every collaborator trait
///
/// HashMap-based, single-threaded. Used by unit and integration tests and
/// for dry runs that should not touch a database. Counts store round trips
/// so cache behavior can be asserted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub(crate) entities: HashMap<(EntityType, i64), EntitySnapshot>,
    pub(crate) changesets: BTreeMap<i64, ChangesetRecord>,
    pub(crate) changes: Vec<ChangeRecord>,
    pub(crate) users: HashMap<i64, User>,
    exists_checks: Cell<usize>,
    summary_recomputations: Vec<i64>,
    user_writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed current state directly, bypassing the pipeline
    pub fn insert_entity(&mut self, snapshot: EntitySnapshot) {
        self.entities
            .insert((snapshot.entity_type, snapshot.entity_id), snapshot);
    }

    /// Seed a changeset directly, bypassing the pipeline
    pub fn insert_changeset(&mut self, changeset: ChangesetRecord) {
        self.changesets.insert(changeset.changeset_id, changeset);
    }

    pub fn entity(&self, entity_type: EntityType, entity_id: i64) -> Option<&EntitySnapshot> {
        self.entities.get(&(entity_type, entity_id))
    }

    pub fn changeset(&self, changeset_id: i64) -> Option<&ChangesetRecord> {
        self.changesets.get(&changeset_id)
    }

    pub fn changesets(&self) -> impl Iterator<Item = &ChangesetRecord> {
        self.changesets.values()
    }

    /// Persisted audit records in write order
    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    pub fn user(&self, user_id: i64) -> Option<&User> {
        self.users.get(&user_id)
    }

    /// Number of `changeset_exists` calls served
    pub fn exists_checks(&self) -> usize {
        self.exists_checks.get()
    }

    /// Changeset ids passed to `recompute_changeset_summary`, in call order
    pub fn summary_recomputations(&self) -> &[i64] {
        &self.summary_recomputations
    }

    /// Number of user inserts plus updates
    pub fn user_writes(&self) -> usize {
        self.user_writes
    }
}

impl EntityStore for MemoryStore {
    fn lookup(&self, entity_type: EntityType, entity_id: i64) -> Result<Option<EntitySnapshot>> {
        Ok(self.entities.get(&(entity_type, entity_id)).cloned())
    }

    fn save_current(&mut self, snapshot: &EntitySnapshot) -> Result<()> {
        self.insert_entity(snapshot.clone());
        Ok(())
    }
}

impl ChangesetStore for MemoryStore {
    fn changeset_exists(&self, changeset_id: i64) -> Result<bool> {
        self.exists_checks.set(self.exists_checks.get() + 1);
        Ok(self.changesets.contains_key(&changeset_id))
    }

    fn create_changeset(&mut self, changeset: &ChangesetRecord) -> Result<()> {
        if self.changesets.contains_key(&changeset.changeset_id) {
            return Err(ExError::new(ExErrorKind::AlreadyExists)
                .with_op("create_changeset")
                .with_changeset_id(changeset.changeset_id)
                .with_message("changeset already exists"));
        }
        self.insert_changeset(changeset.clone());
        Ok(())
    }

    fn recompute_changeset_summary(&mut self, changeset_id: i64) -> Result<()> {
        self.summary_recomputations.push(changeset_id);

        let (count, closed_at) = self
            .changes
            .iter()
            .filter(|c| c.changeset_id == changeset_id)
            .fold((0i64, None), |(count, latest), c| {
                (count + 1, latest.max(c.timestamp))
            });

        let changeset = self.changesets.get_mut(&changeset_id).ok_or_else(|| {
            ExError::new(ExErrorKind::NotFound)
                .with_op("recompute_changeset_summary")
                .with_changeset_id(changeset_id)
                .with_message("changeset not found")
        })?;
        changeset.num_changes = count;
        changeset.closed_at = closed_at;
        Ok(())
    }
}

impl ChangeSink for MemoryStore {
    fn persist(&mut self, record: &ChangeRecord) -> Result<()> {
        self.changes.push(record.clone());
        Ok(())
    }
}

impl UserStore for MemoryStore {
    fn get_user(&self, user_id: i64) -> Result<Option<User>> {
        Ok(self.users.get(&user_id).cloned())
    }

    fn add_user(&mut self, user: &User) -> Result<()> {
        self.user_writes += 1;
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    fn update_user(&mut self, user: &User) -> Result<()> {
        self.user_writes += 1;
        self.users.insert(user.id, user.clone());
        Ok(())
    }
}

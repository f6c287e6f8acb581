//! Per-run user registry.
//!
//! Each entity version may name its author. The first time a user id shows
//! up in a run the user row is brought up to date; later sightings in the
//! same run are free.

use std::collections::HashSet;

use crate::collaborators::UserStore;
use crate::errors::Result;
use crate::model::User;

/// What happened to the user row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserWrite {
    /// No user on the entity, or already handled this run
    Skipped,
    /// Stored row already matched
    Unchanged,
    Added,
    Updated,
}

#[derive(Debug, Clone, Default)]
pub struct UserRegistry {
    seen: HashSet<i64>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `user` at most once per run.
    ///
    /// # Errors
    ///
    /// Propagates store errors unchanged.
    #[allow(clippy::result_large_err)]
    pub fn ensure_user<S: UserStore + ?Sized>(
        &mut self,
        store: &mut S,
        user: Option<&User>,
    ) -> Result<UserWrite> {
        let Some(user) = user else {
            return Ok(UserWrite::Skipped);
        };
        if self.seen.contains(&user.id) {
            return Ok(UserWrite::Skipped);
        }

        let write = match store.get_user(user.id)? {
            Some(existing) if existing == *user => UserWrite::Unchanged,
            Some(_) => {
                store.update_user(user)?;
                UserWrite::Updated
            }
            None => {
                store.add_user(user)?;
                UserWrite::Added
            }
        };

        self.seen.insert(user.id);
        Ok(write)
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::MemoryStore;

    #[test]
    fn test_user_written_once_per_run() {
        let mut store = MemoryStore::new();
        let mut registry = UserRegistry::new();
        let alice = User::new(1, "alice");

        assert_eq!(registry.ensure_user(&mut store, Some(&alice)).unwrap(), UserWrite::Added);
        assert_eq!(registry.ensure_user(&mut store, Some(&alice)).unwrap(), UserWrite::Skipped);
        assert_eq!(store.user_writes(), 1);
    }

    #[test]
    fn test_renamed_user_is_updated() {
        let mut store = MemoryStore::new();
        store.add_user(&User::new(1, "alice")).unwrap();

        let mut registry = UserRegistry::new();
        let renamed = User::new(1, "alice_b");
        assert_eq!(registry.ensure_user(&mut store, Some(&renamed)).unwrap(), UserWrite::Updated);
        assert_eq!(store.user(1).map(|u| u.name.as_str()), Some("alice_b"));
    }

    #[test]
    fn test_unchanged_and_absent_users() {
        let mut store = MemoryStore::new();
        store.add_user(&User::new(2, "bob")).unwrap();

        let mut registry = UserRegistry::new();
        assert_eq!(
            registry.ensure_user(&mut store, Some(&User::new(2, "bob"))).unwrap(),
            UserWrite::Unchanged
        );
        assert_eq!(registry.ensure_user(&mut store, None).unwrap(), UserWrite::Skipped);
        assert_eq!(registry.seen_count(), 1);
    }
}

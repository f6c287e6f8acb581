use std::collections::{HashSet, VecDeque};

/// Default number of changeset ids remembered per run
pub const DEFAULT_CHANGESET_CACHE_CAPACITY: usize = 32_768;

/// Bounded set of changeset ids with insertion-order eviction
///
/// Membership means the id was confirmed to exist in the store during this
/// run. A miss says nothing; the caller must ask the store.
#[derive(Debug, Clone)]
pub struct ChangesetIdCache {
    capacity: usize,
    order: VecDeque<i64>,
    members: HashSet<i64>,
}

impl ChangesetIdCache {
    /// Create a cache holding at most `capacity` ids (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            order: VecDeque::new(),
            members: HashSet::new(),
        }
    }

    pub fn contains(&self, changeset_id: i64) -> bool {
        self.members.contains(&changeset_id)
    }

    /// Add an id, evicting the oldest entry when full.
    ///
    /// Returns the evicted id, if any. Re-inserting a present id is a no-op
    /// and does not refresh its position.
    pub fn insert(&mut self, changeset_id: i64) -> Option<i64> {
        if self.members.contains(&changeset_id) {
            return None;
        }

        let evicted = if self.order.len() >= self.capacity {
            let oldest = self.order.pop_front();
            if let Some(id) = oldest {
                self.members.remove(&id);
            }
            oldest
        } else {
            None
        };

        self.order.push_back(changeset_id);
        self.members.insert(changeset_id);
        evicted
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.members.clear();
    }
}

impl Default for ChangesetIdCache {
    fn default() -> Self {
        Self::new(DEFAULT_CHANGESET_CACHE_CAPACITY)
    }
}

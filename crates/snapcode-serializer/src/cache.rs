//! Deduplicating object cache shared with the rest of the snapshot.

use indexmap::IndexSet;
use snapcode_core::{CacheIndex, ObjectId};

/// What the resolver needs from the cache.
pub trait SnapshotCache {
    /// Index of `object`, assigned on first sight and stable afterwards.
    fn index_of(&mut self, object: ObjectId) -> CacheIndex;
}

/// Insertion-ordered cache: an object's index is its position in the set.
#[derive(Debug, Default, Clone)]
pub struct PartialSnapshotCache {
    entries: IndexSet<ObjectId>,
}

impl PartialSnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, index: CacheIndex) -> Option<ObjectId> {
        self.entries.get_index(index.0 as usize).copied()
    }

    pub fn contains(&self, object: ObjectId) -> bool {
        self.entries.contains(&object)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CacheIndex, ObjectId)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, &object)| (CacheIndex(i as u32), object))
    }
}

impl SnapshotCache for PartialSnapshotCache {
    fn index_of(&mut self, object: ObjectId) -> CacheIndex {
        let (index, _) = self.entries.insert_full(object);
        CacheIndex(index as u32)
    }
}

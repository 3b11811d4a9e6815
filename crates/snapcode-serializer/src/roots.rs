//! Root table.
//!
//! Roots are objects the loader already has before the builtin blob is read.
//! A reference to a root is written as its index and never inlined.

use indexmap::IndexMap;
use snapcode_core::{ObjectId, RootIndex};

/// What the resolver needs from the root table.
pub trait RootTable {
    fn lookup(&self, object: ObjectId) -> Option<RootIndex>;

    /// Whether the startup pass has already written this root.
    fn has_been_serialized(&self, root: RootIndex) -> bool;
}

/// Roots in registration order, each with its serialized flag.
#[derive(Debug, Default, Clone)]
pub struct RootIndexMap {
    roots: IndexMap<ObjectId, bool>,
}

impl RootIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a root. Registering the same object twice returns its first index.
    pub fn register(&mut self, object: ObjectId) -> RootIndex {
        let (index, _) = self.roots.insert_full(object, false);
        RootIndex(index as u32)
    }

    pub fn mark_serialized(&mut self, root: RootIndex) {
        let Some((_, serialized)) = self.roots.get_index_mut(root.0 as usize) else {
            panic!(
                "RootIndexMap: root {root} out of range ({} roots)",
                self.roots.len()
            );
        };
        *serialized = true;
    }

    pub fn mark_all_serialized(&mut self) {
        self.roots.values_mut().for_each(|serialized| *serialized = true);
    }

    pub fn object(&self, root: RootIndex) -> Option<ObjectId> {
        self.roots.get_index(root.0 as usize).map(|(&object, _)| object)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }
}

impl RootTable for RootIndexMap {
    fn lookup(&self, object: ObjectId) -> Option<RootIndex> {
        self.roots
            .get_index_of(&object)
            .map(|index| RootIndex(index as u32))
    }

    fn has_been_serialized(&self, root: RootIndex) -> bool {
        self.roots
            .get_index(root.0 as usize)
            .is_some_and(|(_, &serialized)| serialized)
    }
}

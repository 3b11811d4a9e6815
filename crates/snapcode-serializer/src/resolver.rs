//! Reference resolution.
//!
//! Every pointer out of a unit body is written as one of three encodings,
//! checked in order:
//!
//! 1. Root: the object is in the root table.
//! 2. Self-reference: the object is a unit of this blob.
//! 3. Cache: anything else goes through the shared dedup cache.

use snapcode_core::{
    CacheIndex, CodeKind, Heap, HowToCode, ObjectId, RootIndex, UnitIndex, WhereToPoint,
};
use snapcode_format::constants::SKIP;
use snapcode_format::{IndexSpace, ReferenceKind, SiteCoding, reference_tag};
use tracing::trace;

use crate::cache::SnapshotCache;
use crate::roots::RootTable;
use crate::sink::SnapshotSink;
use crate::stats::ReferenceCounts;

/// A resolved reference.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Reference {
    Root(RootIndex),
    SelfReference(UnitIndex),
    Cache(CacheIndex),
}

impl Reference {
    pub fn kind(self) -> ReferenceKind {
        match self {
            Self::Root(_) => ReferenceKind::Root,
            Self::SelfReference(_) => ReferenceKind::SelfReference,
            Self::Cache(_) => ReferenceKind::CacheReference,
        }
    }

    /// The integer written after the tag.
    pub fn payload(self) -> u32 {
        match self {
            Self::Root(index) => index.0,
            Self::SelfReference(index) => index.get(),
            Self::Cache(index) => index.0,
        }
    }
}

/// Where a reference is written: its coding plus the bytes skipped since the
/// previous patched slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ReferenceSite {
    pub coding: SiteCoding,
    pub skip: u32,
}

impl ReferenceSite {
    pub const PLAIN: Self = Self {
        coding: SiteCoding::PLAIN,
        skip: 0,
    };

    pub fn new(how: HowToCode, point: WhereToPoint) -> Self {
        Self {
            coding: SiteCoding::new(how, point),
            skip: 0,
        }
    }

    pub fn with_skip(mut self, skip: u32) -> Self {
        self.skip = skip;
        self
    }
}

/// Sink for the references a body walker finds.
pub trait ReferenceEncoder {
    fn encode_reference(&mut self, sink: &mut SnapshotSink, object: ObjectId, site: ReferenceSite);
}

/// Resolves references against the root table, the index space, and the cache.
pub struct ReferenceResolver<'a> {
    heap: &'a Heap,
    space: &'a IndexSpace,
    roots: &'a dyn RootTable,
    cache: &'a mut dyn SnapshotCache,
    counts: ReferenceCounts,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(
        heap: &'a Heap,
        space: &'a IndexSpace,
        roots: &'a dyn RootTable,
        cache: &'a mut dyn SnapshotCache,
    ) -> Self {
        Self {
            heap,
            space,
            roots,
            cache,
            counts: ReferenceCounts::default(),
        }
    }

    /// Decide how `object` is referenced.
    ///
    /// # Panics
    /// Panics if `object` is a root the startup pass has not written yet.
    pub fn resolve(&mut self, object: ObjectId) -> Reference {
        if let Some(root) = self.roots.lookup(object) {
            if !self.roots.has_been_serialized(root) {
                panic!(
                    "ReferenceResolver: root {root} (object {}) referenced before it was serialized",
                    object.0
                );
            }
            return Reference::Root(root);
        }

        if let Some(index) = self.unit_index_of(object) {
            return Reference::SelfReference(index);
        }

        Reference::Cache(self.cache.index_of(object))
    }

    /// The unit index `object` occupies in this blob, if any.
    ///
    /// A code object only counts if the table slot it claims actually holds it.
    pub fn unit_index_of(&self, object: ObjectId) -> Option<UnitIndex> {
        let code = self.heap.get(object)?.as_code()?;
        match code.kind {
            CodeKind::Builtin { id } => (self.space.contains_builtin(id)
                && self.heap.builtin(id) == Some(object))
            .then(|| self.space.builtin_index(id)),
            CodeKind::BytecodeHandler { operation, width } => {
                (self.space.contains_handler(operation, width)
                    && self.heap.bytecode_handler(operation, width) == Some(object))
                .then(|| self.space.handler_index(operation, width))
            }
            CodeKind::Stub => None,
        }
    }

    pub fn counts(&self) -> ReferenceCounts {
        self.counts
    }
}

impl ReferenceEncoder for ReferenceResolver<'_> {
    fn encode_reference(&mut self, sink: &mut SnapshotSink, object: ObjectId, site: ReferenceSite) {
        let reference = self.resolve(object);
        let kind = reference.kind();
        trace!(object = object.0, ?reference, skip = site.skip, "reference");

        if site.skip != 0 {
            sink.put(SKIP, "skip");
            sink.put_int(site.skip, "skip distance");
        }
        sink.put(reference_tag(kind, site.coding), kind.mnemonic());
        sink.put_int(reference.payload(), "reference index");
        self.counts.record(kind);
    }
}

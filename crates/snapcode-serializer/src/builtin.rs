//! Builtin blob serialization.
//!
//! Walks the index space in order and writes every builtin and every present
//! bytecode handler into one sink. The layout is:
//!
//! ```text
//! [body 0] ... [body N-1] [NOP padding] [offset table: N × u32 LE]
//! ```
//!
//! Absent handler slots write nothing but still get a table entry equal to
//! the next unit's offset.

use snapcode_core::Heap;
use snapcode_format::{CodeUnit, IndexSpace};
use tracing::{debug, trace};

use crate::cache::SnapshotCache;
use crate::invariants::{
    ensure_builtin_code, ensure_handler_code, ensure_layout, ensure_lazy_handlers,
};
use crate::object::{BodySerializer, ObjectSerializer};
use crate::resolver::ReferenceResolver;
use crate::roots::RootTable;
use crate::sink::SnapshotSink;
use crate::stats::SerializerStats;

/// A finished blob.
#[derive(Clone, Debug)]
pub struct BuiltinSnapshot {
    pub blob: Vec<u8>,
    /// Offset of every unit, index-aligned with the index space.
    pub offsets: Vec<u32>,
    pub stats: SerializerStats,
}

impl BuiltinSnapshot {
    /// Number of offset table entries.
    pub fn unit_count(&self) -> u32 {
        self.offsets.len() as u32
    }
}

/// Serializes the closed set of builtins and bytecode handlers.
pub struct BuiltinSerializer<'a, B = ObjectSerializer> {
    heap: &'a Heap,
    space: &'a IndexSpace,
    roots: &'a dyn RootTable,
    cache: &'a mut dyn SnapshotCache,
    walker: B,
}

impl<'a> BuiltinSerializer<'a> {
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
            walker: ObjectSerializer,
        }
    }
}

impl<'a, B: BodySerializer> BuiltinSerializer<'a, B> {
    /// Replace the body walker.
    pub fn with_walker<W: BodySerializer>(self, walker: W) -> BuiltinSerializer<'a, W> {
        BuiltinSerializer {
            heap: self.heap,
            space: self.space,
            roots: self.roots,
            cache: self.cache,
            walker,
        }
    }

    /// Produce the blob.
    ///
    /// # Panics
    /// Panics on any broken invariant: missing lazy handlers, a table slot
    /// holding the wrong kind of code, an unserialized root, or a blob past
    /// `u32::MAX` bytes.
    pub fn serialize(self) -> BuiltinSnapshot {
        let Self {
            heap,
            space,
            roots,
            cache,
            walker,
        } = self;

        ensure_layout(space);
        ensure_lazy_handlers(heap);
        debug!(
            builtins = space.builtin_count(),
            handler_slots = space.handler_count(),
            "serializing builtins"
        );

        let mut sink = SnapshotSink::new();
        let mut resolver = ReferenceResolver::new(heap, space, roots, cache);
        let mut offsets = Vec::with_capacity(space.total_count() as usize);
        let mut stats = SerializerStats::default();

        for (index, unit) in space.iter() {
            let start = sink.position();
            offsets.push(blob_offset(start));

            let object = match unit {
                CodeUnit::Builtin(id) => {
                    debug_assert!(space.is_builtin_index(index));
                    ensure_builtin_code(heap, id)
                }
                CodeUnit::Handler { operation, width } => {
                    debug_assert!(space.is_handler_index(index));
                    match heap.bytecode_handler(operation, width) {
                        Some(object) => {
                            ensure_handler_code(heap, object, operation, width);
                            object
                        }
                        None => {
                            stats.absent_slots += 1;
                            continue;
                        }
                    }
                }
            };

            walker.serialize(heap, object, &mut sink, &mut resolver);
            stats.units += 1;
            trace!(%index, %unit, offset = start, size = sink.position() - start, "unit");
        }

        stats.body_bytes = sink.position();
        stats.padding_bytes = sink.pad();
        let table = offset_table_bytes(&offsets);
        stats.table_bytes = table.len();
        sink.put_raw(&table, "offset table");
        sink.seal();
        let total = blob_offset(sink.position());

        stats.references = resolver.counts();
        debug!(
            total,
            units = stats.units,
            absent = stats.absent_slots,
            body = stats.body_bytes,
            padding = stats.padding_bytes,
            table = stats.table_bytes,
            root_refs = stats.references.root,
            self_refs = stats.references.self_reference,
            cache_refs = stats.references.cache,
            "builtins serialized"
        );

        BuiltinSnapshot {
            blob: sink.into_bytes(),
            offsets,
            stats,
        }
    }
}

/// Offsets as little-endian `u32` bytes.
pub(crate) fn offset_table_bytes(offsets: &[u32]) -> Vec<u8> {
    offsets.iter().flat_map(|offset| offset.to_le_bytes()).collect()
}

pub(crate) fn blob_offset(position: usize) -> u32 {
    u32::try_from(position)
        .unwrap_or_else(|_| panic!("BuiltinSerializer: blob position {position} exceeds u32::MAX"))
}

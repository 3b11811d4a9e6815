//! Cache section serialization.
//!
//! Objects that builtins reach through the cache are written once, in cache
//! index order, into their own blob. Serializing an entry can add new entries;
//! the loop runs until the cache stops growing. The section has the same
//! trailing offset table as the builtin blob, with one entry per cache index.

use snapcode_core::{CacheIndex, Heap};
use snapcode_format::IndexSpace;
use tracing::{debug, trace};

use crate::builtin::{blob_offset, offset_table_bytes};
use crate::cache::PartialSnapshotCache;
use crate::object::BodySerializer;
use crate::resolver::ReferenceResolver;
use crate::roots::RootTable;
use crate::sink::SnapshotSink;
use crate::stats::SerializerStats;

/// A finished cache section.
#[derive(Clone, Debug)]
pub struct CacheSnapshot {
    pub blob: Vec<u8>,
    pub offsets: Vec<u32>,
    pub stats: SerializerStats,
}

/// Write every cached object, including the ones discovered along the way.
///
/// `space` lets references back into the builtin blob resolve as
/// self-references.
pub fn serialize_cache_section(
    heap: &Heap,
    space: &IndexSpace,
    roots: &dyn RootTable,
    cache: &mut PartialSnapshotCache,
    walker: &impl BodySerializer,
) -> CacheSnapshot {
    let mut sink = SnapshotSink::new();
    let mut offsets = Vec::with_capacity(cache.len());
    let mut stats = SerializerStats::default();

    let mut next = 0;
    while let Some(object) = cache.get(CacheIndex(next)) {
        let start = sink.position();
        offsets.push(blob_offset(start));

        let mut resolver = ReferenceResolver::new(heap, space, roots, cache);
        walker.serialize(heap, object, &mut sink, &mut resolver);
        stats.references.merge(resolver.counts());
        stats.units += 1;
        trace!(index = next, object = object.0, size = sink.position() - start, "cache entry");
        next += 1;
    }

    stats.body_bytes = sink.position();
    stats.padding_bytes = sink.pad();
    let table = offset_table_bytes(&offsets);
    stats.table_bytes = table.len();
    sink.put_raw(&table, "cache offset table");
    sink.seal();

    debug!(
        entries = stats.units,
        body = stats.body_bytes,
        cache_refs = stats.references.cache,
        "cache section serialized"
    );

    CacheSnapshot {
        blob: sink.into_bytes(),
        offsets,
        stats,
    }
}

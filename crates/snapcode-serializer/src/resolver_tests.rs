use snapcode_core::{
    CacheIndex, Code, Heap, HeapObject, HowToCode, ObjectId, RootIndex, UnitIndex, WhereToPoint,
};
use snapcode_format::IndexSpace;
use snapcode_format::constants::{CACHE_REF, ROOT, SELF_REF, SKIP};

use crate::cache::PartialSnapshotCache;
use crate::resolver::{Reference, ReferenceEncoder, ReferenceResolver, ReferenceSite};
use crate::roots::RootIndexMap;
use crate::sink::SnapshotSink;
use crate::test_utils::{add_builtin, add_handler, builtin_code, handler_code};

const SPACE: IndexSpace = IndexSpace::new(2, 2, 3);

struct Fixture {
    heap: Heap,
    builtin: ObjectId,
    handler: ObjectId,
    stray_handler: ObjectId,
    data: ObjectId,
}

fn fixture() -> Fixture {
    let mut heap = Heap::new();
    let builtin = add_builtin(&mut heap, 1, builtin_code(1, vec![]));
    let handler = add_handler(&mut heap, 1, 2, handler_code(1, 2, vec![]));
    // Claims slot (0, 0) but was never installed there.
    let stray_handler = heap.allocate(HeapObject::Code(handler_code(0, 0, vec![])));
    let data = heap.allocate(HeapObject::ByteArray { bytes: vec![] });
    Fixture {
        heap,
        builtin,
        handler,
        stray_handler,
        data,
    }
}

#[test]
fn units_resolve_to_self_references() {
    let f = fixture();
    let roots = RootIndexMap::new();
    let mut cache = PartialSnapshotCache::new();
    let mut resolver = ReferenceResolver::new(&f.heap, &SPACE, &roots, &mut cache);

    assert_eq!(
        resolver.resolve(f.builtin),
        Reference::SelfReference(UnitIndex(1))
    );
    // 2 builtins, then operation 1 × 3 widths, then width 2.
    assert_eq!(
        resolver.resolve(f.handler),
        Reference::SelfReference(UnitIndex(7))
    );
}

#[test]
fn other_objects_go_through_cache() {
    let f = fixture();
    let roots = RootIndexMap::new();
    let mut cache = PartialSnapshotCache::new();
    let mut resolver = ReferenceResolver::new(&f.heap, &SPACE, &roots, &mut cache);

    assert_eq!(resolver.resolve(f.data), Reference::Cache(CacheIndex(0)));
    assert_eq!(
        resolver.resolve(f.stray_handler),
        Reference::Cache(CacheIndex(1))
    );
    assert_eq!(resolver.resolve(f.data), Reference::Cache(CacheIndex(0)));
    assert_eq!(resolver.unit_index_of(f.stray_handler), None);
}

#[test]
fn stubs_are_not_units() {
    let mut heap = Heap::new();
    let stub = heap.allocate(HeapObject::Code(Code::stub(vec![1])));
    let roots = RootIndexMap::new();
    let mut cache = PartialSnapshotCache::new();
    let resolver = ReferenceResolver::new(&heap, &SPACE, &roots, &mut cache);

    assert_eq!(resolver.unit_index_of(stub), None);
}

#[test]
fn builtin_outside_index_space_is_cached() {
    let mut heap = Heap::new();
    let far = add_builtin(&mut heap, 9, builtin_code(9, vec![]));
    let roots = RootIndexMap::new();
    let mut cache = PartialSnapshotCache::new();
    let mut resolver = ReferenceResolver::new(&heap, &SPACE, &roots, &mut cache);

    assert_eq!(resolver.resolve(far), Reference::Cache(CacheIndex(0)));
}

#[test]
fn root_takes_precedence() {
    let f = fixture();
    let mut roots = RootIndexMap::new();
    roots.register(f.data);
    roots.register(f.builtin);
    roots.mark_all_serialized();
    let mut cache = PartialSnapshotCache::new();
    let mut resolver = ReferenceResolver::new(&f.heap, &SPACE, &roots, &mut cache);

    assert_eq!(resolver.resolve(f.builtin), Reference::Root(RootIndex(1)));
    assert_eq!(resolver.resolve(f.data), Reference::Root(RootIndex(0)));
    drop(resolver);
    assert!(cache.is_empty());
}

#[test]
#[should_panic(expected = "referenced before it was serialized")]
fn unserialized_root_is_fatal() {
    let f = fixture();
    let mut roots = RootIndexMap::new();
    roots.register(f.data);
    let mut cache = PartialSnapshotCache::new();
    let mut resolver = ReferenceResolver::new(&f.heap, &SPACE, &roots, &mut cache);
    resolver.resolve(f.data);
}

#[test]
fn skip_precedes_every_kind() {
    let f = fixture();
    let mut roots = RootIndexMap::new();
    let root = roots.register(f.stray_handler);
    roots.mark_serialized(root);
    let mut cache = PartialSnapshotCache::new();
    let mut resolver = ReferenceResolver::new(&f.heap, &SPACE, &roots, &mut cache);
    let mut sink = SnapshotSink::new();
    let site = ReferenceSite::PLAIN.with_skip(5);

    resolver.encode_reference(&mut sink, f.stray_handler, site);
    resolver.encode_reference(&mut sink, f.builtin, site);
    resolver.encode_reference(&mut sink, f.data, site);

    #[rustfmt::skip]
    let expected = [
        SKIP, 0x14, ROOT, 0x00,
        SKIP, 0x14, SELF_REF, 0x04,
        SKIP, 0x14, CACHE_REF, 0x00,
    ];
    assert_eq!(sink.as_bytes(), &expected);

    let counts = resolver.counts();
    assert_eq!((counts.root, counts.self_reference, counts.cache), (1, 1, 1));
    assert_eq!(counts.total(), 3);
}

#[test]
fn zero_skip_writes_no_skip() {
    let f = fixture();
    let roots = RootIndexMap::new();
    let mut cache = PartialSnapshotCache::new();
    let mut resolver = ReferenceResolver::new(&f.heap, &SPACE, &roots, &mut cache);
    let mut sink = SnapshotSink::new();
    let site = ReferenceSite::new(HowToCode::FromCode, WhereToPoint::InnerPointer);

    resolver.encode_reference(&mut sink, f.handler, site);

    assert_eq!(sink.as_bytes(), &[SELF_REF + 3, 0x1C]);
}

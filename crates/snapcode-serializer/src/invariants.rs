//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use snapcode_core::{
    BuiltinId, Code, CodeKind, EMBEDDED_SLOT_SIZE, Heap, LazyHandler, ObjectId, OperandWidth,
    Operation, UnitIndex,
};
use snapcode_format::IndexSpace;

/// Builtins start at 0 and handler slots follow without a gap.
pub(crate) fn ensure_layout(space: &IndexSpace) {
    let first_builtin = space.first_builtin_index();
    let first_handler = space.first_handler_index();
    assert_eq!(
        first_builtin,
        UnitIndex(0),
        "IndexSpace: builtin range starts at {first_builtin}, not U0"
    );
    assert_eq!(
        first_handler.get(),
        space.builtin_count(),
        "IndexSpace: handler range starts at {first_handler}, builtin range ends at U{}",
        space.builtin_count()
    );
    assert_eq!(
        space.total_count() - first_handler.get(),
        space.handler_count(),
        "IndexSpace: handler range length disagrees with its declared count"
    );

    // Iteration order must agree with the flat mapping the table is keyed by.
    let iterated = space
        .iter()
        .find(|(_, unit)| !unit.is_builtin())
        .map(|(index, _)| index);
    if let Some(index) = iterated {
        assert_eq!(
            index, first_handler,
            "IndexSpace: iteration reaches the first handler at {index}, not {first_handler}"
        );
    }
    assert_eq!(
        space.iter().count() as u32,
        space.total_count(),
        "IndexSpace: iteration yields a different number of units than declared"
    );
}

/// The lazy-deserialize stand-ins are produced elsewhere and must already exist.
pub(crate) fn ensure_lazy_handlers(heap: &Heap) {
    for which in LazyHandler::ALL {
        let Some(object) = heap.lazy_handler(which) else {
            panic!("BuiltinSerializer: {} is missing", which.name());
        };
        if !heap.is_code(object) {
            panic!(
                "BuiltinSerializer: {} (object {}) is not code",
                which.name(),
                object.0
            );
        }
    }
}

pub(crate) fn ensure_builtin_code(heap: &Heap, id: BuiltinId) -> ObjectId {
    let Some(object) = heap.builtin(id) else {
        panic!("BuiltinSerializer: builtin {} has no code object", id.0);
    };
    let code = heap.ensure_code(object);
    if code.builtin_id() != Some(id) {
        panic!(
            "BuiltinSerializer: builtin slot {} holds object {} tagged {:?}",
            id.0, object.0, code.kind
        );
    }
    object
}

pub(crate) fn ensure_handler_code(
    heap: &Heap,
    object: ObjectId,
    operation: Operation,
    width: OperandWidth,
) {
    let code = heap.ensure_code(object);
    let expected = CodeKind::BytecodeHandler { operation, width };
    if code.kind != expected {
        panic!(
            "BuiltinSerializer: handler slot ({}, w{}) holds object {} tagged {:?}",
            operation.0, width.0, object.0, code.kind
        );
    }
}

/// Embedded slots are sorted, non-overlapping and inside the instructions.
pub(crate) fn ensure_embedded_layout(object: ObjectId, code: &Code) {
    let len = code.instructions.len() as u64;
    let mut cursor = 0u64;
    for embedded in &code.embedded {
        let start = embedded.offset as u64;
        let end = start + EMBEDDED_SLOT_SIZE as u64;
        if start < cursor {
            panic!(
                "ObjectSerializer: object {} embedded slot at {start} overlaps or precedes slot ending at {cursor}",
                object.0
            );
        }
        if end > len {
            panic!(
                "ObjectSerializer: object {} embedded slot at {start} runs past {len} instruction bytes",
                object.0
            );
        }
        cursor = end;
    }
}

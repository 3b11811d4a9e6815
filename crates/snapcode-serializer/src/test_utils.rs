//! Heap builders and walkers shared by the tests.

use snapcode_core::{
    BuiltinId, Code, EmbeddedRef, Heap, HeapObject, LazyHandler, ObjectId, OperandWidth,
    Operation,
};

use crate::object::BodySerializer;
use crate::resolver::{ReferenceEncoder, ReferenceSite};
use crate::sink::SnapshotSink;

/// A heap whose first three objects are the lazy-deserialize stand-ins.
pub fn heap_with_lazy_handlers() -> Heap {
    let mut heap = Heap::new();
    for which in LazyHandler::ALL {
        let object = heap.allocate(HeapObject::Code(Code::stub(vec![0xCC])));
        heap.set_lazy_handler(which, object);
    }
    heap
}

pub fn add_builtin(heap: &mut Heap, id: u16, code: Code) -> ObjectId {
    let object = heap.allocate(HeapObject::Code(code));
    heap.set_builtin(BuiltinId(id), object);
    object
}

pub fn builtin_code(id: u16, instructions: Vec<u8>) -> Code {
    Code::builtin(BuiltinId(id), instructions)
}

pub fn handler_code(op: u16, width: u8, instructions: Vec<u8>) -> Code {
    Code::handler(Operation(op), OperandWidth(width), instructions)
}

pub fn add_handler(heap: &mut Heap, op: u16, width: u8, code: Code) -> ObjectId {
    let object = heap.allocate(HeapObject::Code(code));
    heap.set_bytecode_handler(Operation(op), OperandWidth(width), object);
    object
}

/// Code with a single embedded slot at `offset`.
pub fn with_ref(code: Code, offset: u32, target: ObjectId) -> Code {
    code.with_embedded(vec![EmbeddedRef::new(offset, target)])
}

/// Writes code instructions verbatim, then each embedded reference with no
/// skip. No `NEW_OBJECT` framing, so body sizes are exactly the instruction
/// length plus the references.
pub struct RawWalker;

impl BodySerializer for RawWalker {
    fn serialize(
        &self,
        heap: &Heap,
        object: ObjectId,
        sink: &mut SnapshotSink,
        refs: &mut dyn ReferenceEncoder,
    ) {
        let code = heap.ensure_code(object);
        sink.put_raw(&code.instructions, "instructions");
        for embedded in &code.embedded {
            refs.encode_reference(sink, embedded.target, ReferenceSite::PLAIN);
        }
    }
}

/// Records every reference instead of resolving it. Writes one `0xEE` marker
/// byte per reference.
#[derive(Default)]
pub struct RecordingEncoder {
    pub seen: Vec<(ObjectId, ReferenceSite)>,
}

impl ReferenceEncoder for RecordingEncoder {
    fn encode_reference(&mut self, sink: &mut SnapshotSink, object: ObjectId, site: ReferenceSite) {
        self.seen.push((object, site));
        sink.put(0xEE, "marker");
    }
}

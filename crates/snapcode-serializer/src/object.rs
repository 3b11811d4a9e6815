//! Object body walking.

use snapcode_core::{Code, EMBEDDED_SLOT_SIZE, Heap, HeapObject, ObjectId, Slot};
use snapcode_format::Shape;
use snapcode_format::constants::{NEW_OBJECT, SMI};

use crate::invariants::ensure_embedded_layout;
use crate::resolver::{ReferenceEncoder, ReferenceSite};
use crate::sink::SnapshotSink;

/// Writes one object's body, handing every embedded pointer to `refs`.
pub trait BodySerializer {
    fn serialize(
        &self,
        heap: &Heap,
        object: ObjectId,
        sink: &mut SnapshotSink,
        refs: &mut dyn ReferenceEncoder,
    );
}

/// Default walker: one `NEW_OBJECT` record per object, dispatched on shape.
#[derive(Clone, Copy, Debug, Default)]
pub struct ObjectSerializer;

impl BodySerializer for ObjectSerializer {
    fn serialize(
        &self,
        heap: &Heap,
        object: ObjectId,
        sink: &mut SnapshotSink,
        refs: &mut dyn ReferenceEncoder,
    ) {
        match heap.object(object) {
            HeapObject::Code(code) => serialize_code(object, code, sink, refs),
            HeapObject::ByteArray { bytes } => {
                new_object(sink, Shape::ByteArray);
                sink.put_int(len_u32(bytes.len()), "length");
                sink.put_raw(bytes, "bytes");
            }
            HeapObject::FixedArray { slots } => {
                new_object(sink, Shape::FixedArray);
                sink.put_int(len_u32(slots.len()), "length");
                for slot in slots {
                    match *slot {
                        Slot::Smi(value) => {
                            sink.put(SMI, "smi");
                            sink.put_raw(&value.to_le_bytes(), "smi value");
                        }
                        Slot::Object(target) => {
                            refs.encode_reference(sink, target, ReferenceSite::PLAIN)
                        }
                    }
                }
            }
            HeapObject::String { value } => {
                new_object(sink, Shape::String);
                sink.put_int(len_u32(value.len()), "length");
                sink.put_raw(value.as_bytes(), "chars");
            }
            HeapObject::HeapNumber { value } => {
                new_object(sink, Shape::HeapNumber);
                sink.put_raw(&value.to_le_bytes(), "number");
            }
        }
    }
}

/// Instructions go out verbatim; each embedded slot then becomes a reference,
/// preceded by the distance from the end of the previous slot.
fn serialize_code(
    object: ObjectId,
    code: &Code,
    sink: &mut SnapshotSink,
    refs: &mut dyn ReferenceEncoder,
) {
    ensure_embedded_layout(object, code);

    new_object(sink, Shape::Code);
    sink.put_int(len_u32(code.instructions.len()), "instruction size");
    sink.put_int(len_u32(code.embedded.len()), "reference count");
    sink.put_raw(&code.instructions, "instructions");

    let mut cursor = 0;
    for embedded in &code.embedded {
        let site =
            ReferenceSite::new(embedded.how, embedded.point).with_skip(embedded.offset - cursor);
        refs.encode_reference(sink, embedded.target, site);
        cursor = embedded.offset + EMBEDDED_SLOT_SIZE;
    }
}

fn new_object(sink: &mut SnapshotSink, shape: Shape) {
    sink.put(NEW_OBJECT, "new object");
    sink.put(shape.to_u8(), "shape");
}

fn len_u32(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| panic!("ObjectSerializer: length {len} exceeds u32"))
}

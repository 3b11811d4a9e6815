//! Minimal heap model.
//!
//! Objects live in an arena and are addressed by [`ObjectId`]. The heap also
//! carries the tables the builtin serializer walks: builtins by id, bytecode
//! handlers by `(operation, width)`, and the lazy-deserialize stand-ins.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ids::{BuiltinId, ObjectId, OperandWidth, Operation};

/// Size of a patchable pointer slot inside code instructions.
pub const EMBEDDED_SLOT_SIZE: u32 = 4;

/// How a reference is coded at its site.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HowToCode {
    /// Tagged pointer stored as data.
    #[default]
    Plain,
    /// Target address baked into an instruction.
    FromCode,
}

/// Which address of the target the slot holds.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WhereToPoint {
    #[default]
    StartOfObject,
    /// Points past the object header (e.g. a code entry point).
    InnerPointer,
}

/// Pointer slot embedded in a code object's instruction stream.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EmbeddedRef {
    /// Byte offset of the slot within `instructions`.
    pub offset: u32,
    pub target: ObjectId,
    #[serde(default)]
    pub how: HowToCode,
    #[serde(default)]
    pub point: WhereToPoint,
}

impl EmbeddedRef {
    pub fn new(offset: u32, target: ObjectId) -> Self {
        Self {
            offset,
            target,
            how: HowToCode::Plain,
            point: WhereToPoint::StartOfObject,
        }
    }

    pub fn with_site(mut self, how: HowToCode, point: WhereToPoint) -> Self {
        self.how = how;
        self.point = point;
        self
    }
}

/// What a code object was compiled as.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CodeKind {
    Builtin {
        id: BuiltinId,
    },
    BytecodeHandler {
        operation: Operation,
        width: OperandWidth,
    },
    /// Any other code (jump targets, lazy-deserialize stand-ins).
    Stub,
}

/// An executable code object.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Code {
    #[serde(flatten)]
    pub kind: CodeKind,
    pub instructions: Vec<u8>,
    /// Sorted by offset, non-overlapping.
    #[serde(default)]
    pub embedded: Vec<EmbeddedRef>,
}

impl Code {
    pub fn builtin(id: BuiltinId, instructions: Vec<u8>) -> Self {
        Self {
            kind: CodeKind::Builtin { id },
            instructions,
            embedded: Vec::new(),
        }
    }

    pub fn handler(operation: Operation, width: OperandWidth, instructions: Vec<u8>) -> Self {
        Self {
            kind: CodeKind::BytecodeHandler { operation, width },
            instructions,
            embedded: Vec::new(),
        }
    }

    pub fn stub(instructions: Vec<u8>) -> Self {
        Self {
            kind: CodeKind::Stub,
            instructions,
            embedded: Vec::new(),
        }
    }

    pub fn with_embedded(mut self, embedded: Vec<EmbeddedRef>) -> Self {
        self.embedded = embedded;
        self
    }

    pub fn builtin_id(&self) -> Option<BuiltinId> {
        match self.kind {
            CodeKind::Builtin { id } => Some(id),
            _ => None,
        }
    }

    pub fn is_bytecode_handler(&self) -> bool {
        matches!(self.kind, CodeKind::BytecodeHandler { .. })
    }
}

/// A field value: either an inline small integer or a heap pointer.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Smi(i32),
    Object(ObjectId),
}

/// Heap object, one variant per shape the body walker knows.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum HeapObject {
    Code(Code),
    ByteArray { bytes: Vec<u8> },
    FixedArray { slots: Vec<Slot> },
    String { value: String },
    HeapNumber { value: f64 },
}

impl HeapObject {
    pub fn as_code(&self) -> Option<&Code> {
        match self {
            Self::Code(code) => Some(code),
            _ => None,
        }
    }

    pub fn shape_name(&self) -> &'static str {
        match self {
            Self::Code(_) => "code",
            Self::ByteArray { .. } => "byte_array",
            Self::FixedArray { .. } => "fixed_array",
            Self::String { .. } => "string",
            Self::HeapNumber { .. } => "heap_number",
        }
    }
}

/// The three handlers that stand in for not-yet-deserialized bytecode handlers,
/// one per operand scale.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum LazyHandler {
    Single,
    Wide,
    ExtraWide,
}

impl LazyHandler {
    pub const ALL: [Self; 3] = [Self::Single, Self::Wide, Self::ExtraWide];

    fn slot(self) -> usize {
        match self {
            Self::Single => 0,
            Self::Wide => 1,
            Self::ExtraWide => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Single => "deserialize_lazy_handler",
            Self::Wide => "deserialize_lazy_handler_wide",
            Self::ExtraWide => "deserialize_lazy_handler_extra_wide",
        }
    }
}

/// Object arena plus the builtin/handler tables.
#[derive(Clone, Debug, Default)]
pub struct Heap {
    objects: Vec<HeapObject>,
    builtins: Vec<Option<ObjectId>>,
    handlers: HashMap<(Operation, OperandWidth), ObjectId>,
    lazy_handlers: [Option<ObjectId>; 3],
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an object, returning its handle.
    pub fn allocate(&mut self, object: HeapObject) -> ObjectId {
        let id = ObjectId(self.objects.len() as u32);
        self.objects.push(object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&HeapObject> {
        self.objects.get(id.index())
    }

    /// Get an object that must exist.
    pub fn object(&self, id: ObjectId) -> &HeapObject {
        self.ensure_object(id)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &HeapObject)> {
        self.objects
            .iter()
            .enumerate()
            .map(|(i, obj)| (ObjectId(i as u32), obj))
    }

    pub fn is_code(&self, id: ObjectId) -> bool {
        matches!(self.get(id), Some(HeapObject::Code(_)))
    }

    pub fn set_builtin(&mut self, id: BuiltinId, object: ObjectId) {
        let slot = id.0 as usize;
        if self.builtins.len() <= slot {
            self.builtins.resize(slot + 1, None);
        }
        self.builtins[slot] = Some(object);
    }

    pub fn builtin(&self, id: BuiltinId) -> Option<ObjectId> {
        self.builtins.get(id.0 as usize).copied().flatten()
    }

    pub fn set_bytecode_handler(
        &mut self,
        operation: Operation,
        width: OperandWidth,
        object: ObjectId,
    ) {
        self.handlers.insert((operation, width), object);
    }

    /// The compiled handler for a slot, or `None` if the combination has none.
    pub fn bytecode_handler(&self, operation: Operation, width: OperandWidth) -> Option<ObjectId> {
        self.handlers.get(&(operation, width)).copied()
    }

    pub fn set_lazy_handler(&mut self, which: LazyHandler, object: ObjectId) {
        self.lazy_handlers[which.slot()] = Some(object);
    }

    pub fn lazy_handler(&self, which: LazyHandler) -> Option<ObjectId> {
        self.lazy_handlers[which.slot()]
    }
}

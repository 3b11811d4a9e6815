//! JSON manifest describing a heap to serialize.
//!
//! ```json
//! {
//!   "space": { "builtins": 1, "operations": 1, "widths": 2 },
//!   "objects": [
//!     { "shape": "code", "kind": "stub", "instructions": [204] },
//!     { "shape": "code", "kind": "builtin", "id": 0, "instructions": [1, 2] },
//!     { "shape": "string", "value": "hi" },
//!     { "shape": "code", "kind": "bytecode_handler", "operation": 0, "width": 1,
//!       "instructions": [0, 0, 0, 0], "embedded": [{ "offset": 0, "target": 2 }] }
//!   ],
//!   "roots": [2],
//!   "builtins": [1],
//!   "handlers": [{ "operation": 0, "width": 1, "object": 3 }],
//!   "lazy_handlers": [0, 0, 0]
//! }
//! ```
//!
//! Object ids are positions in `objects`. Roots are registered in order and
//! treated as already written by the startup pass.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use snapcode_core::{
    BuiltinId, Code, CodeKind, EMBEDDED_SLOT_SIZE, Heap, HeapObject, LazyHandler, ObjectId,
    OperandWidth, Operation, Slot,
};
use snapcode_format::IndexSpace;
use snapcode_serializer::RootIndexMap;

#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("cannot read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid manifest: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{context} refers to object {id}, but only {count} objects are defined")]
    UnknownObject {
        context: String,
        id: u32,
        count: usize,
    },
    #[error("builtin {id} is outside the index space ({count} builtins)")]
    BuiltinOutOfRange { id: usize, count: u32 },
    #[error("handler ({operation}, w{width}) is outside the index space")]
    HandlerOutOfRange { operation: u16, width: u8 },
    #[error("builtin {id} has no entry, but the index space declares {count} builtins")]
    MissingBuiltin { id: usize, count: u32 },
    #[error("{context} is object {id}, a {shape}, not code")]
    NotCode {
        context: String,
        id: u32,
        shape: &'static str,
    },
    #[error("{context} holds object {id}, which is code for {found}")]
    WrongCodeKind {
        context: String,
        id: u32,
        found: String,
    },
    #[error("object {id} embedded slot at {offset} overlaps the slot ending at {previous_end}")]
    EmbeddedOverlap {
        id: usize,
        offset: u32,
        previous_end: u64,
    },
    #[error("object {id} embedded slot at {offset} runs past {len} instruction bytes")]
    EmbeddedOutOfBounds { id: usize, offset: u32, len: usize },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub space: IndexSpace,
    pub objects: Vec<HeapObject>,
    #[serde(default)]
    pub roots: Vec<ObjectId>,
    #[serde(default)]
    pub builtins: Vec<ObjectId>,
    #[serde(default)]
    pub handlers: Vec<HandlerEntry>,
    pub lazy_handlers: [ObjectId; 3],
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HandlerEntry {
    pub operation: Operation,
    pub width: OperandWidth,
    pub object: ObjectId,
}

/// A manifest turned into serializer inputs.
pub struct LoadedHeap {
    pub heap: Heap,
    pub roots: RootIndexMap,
    pub space: IndexSpace,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Allocate every object and install the tables.
    pub fn into_heap(self) -> Result<LoadedHeap, ManifestError> {
        self.validate()?;

        let mut heap = Heap::new();
        for object in self.objects {
            heap.allocate(object);
        }
        for (id, &object) in self.builtins.iter().enumerate() {
            heap.set_builtin(BuiltinId(id as u16), object);
        }
        for entry in &self.handlers {
            heap.set_bytecode_handler(entry.operation, entry.width, entry.object);
        }
        for (which, object) in LazyHandler::ALL.into_iter().zip(self.lazy_handlers) {
            heap.set_lazy_handler(which, object);
        }

        let mut roots = RootIndexMap::new();
        for &object in &self.roots {
            roots.register(object);
        }
        roots.mark_all_serialized();

        Ok(LoadedHeap {
            heap,
            roots,
            space: self.space,
        })
    }

    fn validate(&self) -> Result<(), ManifestError> {
        let count = self.objects.len();

        for (i, object) in self.objects.iter().enumerate() {
            let targets: Vec<ObjectId> = match object {
                HeapObject::Code(code) => code.embedded.iter().map(|e| e.target).collect(),
                HeapObject::FixedArray { slots } => slots
                    .iter()
                    .filter_map(|slot| match *slot {
                        Slot::Object(target) => Some(target),
                        Slot::Smi(_) => None,
                    })
                    .collect(),
                _ => continue,
            };
            for target in targets {
                ensure_known(count, target, || format!("object {i}"))?;
            }
        }
        for &root in &self.roots {
            ensure_known(count, root, || "roots".to_string())?;
        }
        for (id, &object) in self.builtins.iter().enumerate() {
            if id >= self.space.builtin_count() as usize {
                return Err(ManifestError::BuiltinOutOfRange {
                    id,
                    count: self.space.builtin_count(),
                });
            }
            ensure_known(count, object, || format!("builtin {id}"))?;
        }
        for entry in &self.handlers {
            if !self.space.contains_handler(entry.operation, entry.width) {
                return Err(ManifestError::HandlerOutOfRange {
                    operation: entry.operation.0,
                    width: entry.width.0,
                });
            }
            ensure_known(count, entry.object, || "handlers".to_string())?;
        }
        for object in self.lazy_handlers {
            ensure_known(count, object, || "lazy_handlers".to_string())?;
        }

        // Every id is known from here on.
        let builtin_count = self.space.builtin_count();
        if self.builtins.len() < builtin_count as usize {
            return Err(ManifestError::MissingBuiltin {
                id: self.builtins.len(),
                count: builtin_count,
            });
        }
        for (id, &object) in self.builtins.iter().enumerate() {
            let context = || format!("builtin {id}");
            let code = self.ensure_code(object, context)?;
            let expected = CodeKind::Builtin {
                id: BuiltinId(id as u16),
            };
            ensure_kind(code, expected, object, context)?;
        }
        for entry in &self.handlers {
            let context = || format!("handler ({}, w{})", entry.operation.0, entry.width.0);
            let code = self.ensure_code(entry.object, context)?;
            let expected = CodeKind::BytecodeHandler {
                operation: entry.operation,
                width: entry.width,
            };
            ensure_kind(code, expected, entry.object, context)?;
        }
        for (which, object) in LazyHandler::ALL.into_iter().zip(self.lazy_handlers) {
            self.ensure_code(object, || which.name().to_string())?;
        }
        for (id, object) in self.objects.iter().enumerate() {
            if let HeapObject::Code(code) = object {
                ensure_embedded_layout(id, code)?;
            }
        }
        Ok(())
    }

    fn ensure_code(
        &self,
        id: ObjectId,
        context: impl FnOnce() -> String,
    ) -> Result<&Code, ManifestError> {
        let object = &self.objects[id.index()];
        object.as_code().ok_or_else(|| ManifestError::NotCode {
            context: context(),
            id: id.0,
            shape: object.shape_name(),
        })
    }
}

fn ensure_kind(
    code: &Code,
    expected: CodeKind,
    id: ObjectId,
    context: impl FnOnce() -> String,
) -> Result<(), ManifestError> {
    if code.kind == expected {
        return Ok(());
    }
    let found = match code.kind {
        CodeKind::Builtin { id: builtin } => format!("builtin {}", builtin.0),
        CodeKind::BytecodeHandler { operation, width } => {
            format!("handler ({}, w{})", operation.0, width.0)
        }
        CodeKind::Stub => "a stub".to_string(),
    };
    Err(ManifestError::WrongCodeKind {
        context: context(),
        id: id.0,
        found,
    })
}

/// Slots must be sorted, disjoint and inside the instructions.
fn ensure_embedded_layout(id: usize, code: &Code) -> Result<(), ManifestError> {
    let len = code.instructions.len();
    let mut cursor = 0u64;
    for embedded in &code.embedded {
        let start = u64::from(embedded.offset);
        let end = start + u64::from(EMBEDDED_SLOT_SIZE);
        if start < cursor {
            return Err(ManifestError::EmbeddedOverlap {
                id,
                offset: embedded.offset,
                previous_end: cursor,
            });
        }
        if end > len as u64 {
            return Err(ManifestError::EmbeddedOutOfBounds {
                id,
                offset: embedded.offset,
                len,
            });
        }
        cursor = end;
    }
    Ok(())
}

fn ensure_known(
    count: usize,
    id: ObjectId,
    context: impl FnOnce() -> String,
) -> Result<(), ManifestError> {
    if id.index() < count {
        return Ok(());
    }
    Err(ManifestError::UnknownObject {
        context: context(),
        id: id.0,
        count,
    })
}

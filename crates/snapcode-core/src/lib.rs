#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for snapcode.
//!
//! - Identifier newtypes for every table the serializer addresses
//! - A minimal heap model: code objects, byte arrays, fixed arrays, strings,
//!   heap numbers, plus the builtin and bytecode-handler tables
//! - Terminal color palette shared by dump output

mod colors;
mod heap;
mod ids;
mod invariants;


pub use colors::Colors;
pub use heap::{
    Code, CodeKind, EMBEDDED_SLOT_SIZE, EmbeddedRef, Heap, HeapObject, HowToCode, LazyHandler,
    Slot, WhereToPoint,
};
pub use ids::{BuiltinId, CacheIndex, ObjectId, OperandWidth, Operation, RootIndex, UnitIndex};

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Binary format of the builtin blob.
//!
//! This crate contains:
//! - The flat index space of code units (builtins, then handler slots)
//! - Opcode, tag and shape constants, plus the variable-length int codec
//! - A validating read-only view and a human-readable dump

pub mod constants;
mod decode;
mod dump;
mod index_space;
mod int_codec;
mod invariants;
mod opcode;
mod view;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod view_tests;

pub use constants::{BLOB_ALIGN, INT_LIMIT, INT_OVERREAD, NOP, OFFSET_ENTRY_SIZE, align_to_blob};
pub use decode::{Decoder, Instr};
pub use dump::{dump, format_instr};
pub use index_space::{CodeUnit, IndexSpace};
pub use int_codec::{decode_int, encode_int, int_len};
pub use opcode::{Opcode, ReferenceKind, Shape, SiteCoding, decode_reference_tag, reference_tag};
pub use view::{BlobError, BlobView};

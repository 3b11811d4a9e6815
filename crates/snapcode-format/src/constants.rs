//! Binary format constants.
//!
//! These values are part of the blob contract: the loader decodes them
//! byte-for-byte. Changing any of them is a format break.

/// Alignment of the offset table (and therefore of the body region's end).
pub const BLOB_ALIGN: usize = 8;

/// Bytes the integer decoder may read past the last encoded integer.
///
/// `decode_int` always loads a full 4-byte word.
pub const INT_OVERREAD: usize = 3;

/// Size of one offset table entry.
pub const OFFSET_ENTRY_SIZE: usize = 4;

/// Exclusive upper bound for values passed to `encode_int`.
pub const INT_LIMIT: u32 = 1 << 30;

/// Filler byte; decodes as "do nothing".
pub const NOP: u8 = 0x00;

/// Start of an inlined object. Followed by a shape byte.
pub const NEW_OBJECT: u8 = 0x08;

/// Advance the patch cursor by an int distance.
pub const SKIP: u8 = 0x09;

/// Inline small integer, 4 bytes little-endian.
pub const SMI: u8 = 0x0A;

/// Reference tag bases. The low two bits carry the site's coding.
pub const ROOT: u8 = 0x10;
pub const SELF_REF: u8 = 0x14;
pub const CACHE_REF: u8 = 0x18;

/// Shape bytes following `NEW_OBJECT`.
pub const SHAPE_CODE: u8 = 1;
pub const SHAPE_BYTE_ARRAY: u8 = 2;
pub const SHAPE_FIXED_ARRAY: u8 = 3;
pub const SHAPE_STRING: u8 = 4;
pub const SHAPE_HEAP_NUMBER: u8 = 5;

/// Round `value` up to the next multiple of [`BLOB_ALIGN`].
pub const fn align_to_blob(value: usize) -> usize {
    (value + BLOB_ALIGN - 1) & !(BLOB_ALIGN - 1)
}

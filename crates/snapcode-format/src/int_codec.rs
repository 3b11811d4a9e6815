//! Variable-length integer encoding.
//!
//! The value is shifted left by two and the low two bits store the byte count
//! minus one. The decoder always loads a whole 4-byte word and masks it, which
//! is why every blob ends with at least [`INT_OVERREAD`](crate::INT_OVERREAD)
//! bytes of padding.

use crate::constants::INT_LIMIT;

/// Number of bytes `encode_int` uses for `value`.
pub fn int_len(value: u32) -> usize {
    let shifted = value << 2;
    if shifted > 0xFF_FFFF {
        4
    } else if shifted > 0xFFFF {
        3
    } else if shifted > 0xFF {
        2
    } else {
        1
    }
}

/// Append `value` to `out`.
///
/// # Panics
/// Panics if `value` does not fit in 30 bits.
pub fn encode_int(value: u32, out: &mut Vec<u8>) -> usize {
    assert!(
        value < INT_LIMIT,
        "encode_int: {value} does not fit the 30-bit integer encoding"
    );
    let len = int_len(value);
    let word = (value << 2) | (len as u32 - 1);
    out.extend_from_slice(&word.to_le_bytes()[..len]);
    len
}

/// Decode an integer at the start of `bytes`, returning `(value, bytes_used)`.
///
/// Returns `None` if fewer than 4 bytes are readable.
pub fn decode_int(bytes: &[u8]) -> Option<(u32, usize)> {
    let word: [u8; 4] = bytes.get(..4)?.try_into().ok()?;
    let word = u32::from_le_bytes(word);
    let len = (word & 3) as usize + 1;
    let mask = u32::MAX >> (32 - len * 8);
    Some(((word & mask) >> 2, len))
}

//! Read-only view over a finished builtin blob.
//!
//! Slices the trailing offset table and checks it against the index space.
//! Bodies are not decoded here; see [`dump`](crate::dump) for that.

use snapcode_core::UnitIndex;

use crate::constants::{BLOB_ALIGN, INT_OVERREAD, OFFSET_ENTRY_SIZE};
use crate::decode::{Decoder, Instr};
use crate::index_space::{CodeUnit, IndexSpace};

/// Why a byte buffer is not a well-formed blob for an index space.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    #[error("blob too small: {actual} bytes, offset table needs {needed}")]
    TooSmall { needed: usize, actual: usize },
    #[error("offset table starts at {0}, not {BLOB_ALIGN}-byte aligned")]
    MisalignedTable(usize),
    #[error("body region of {0} bytes lacks the {INT_OVERREAD}-byte padding")]
    MissingPadding(usize),
    #[error("offset {offset} of unit {index} is below its predecessor {previous}")]
    NonMonotonic {
        index: u32,
        offset: u32,
        previous: u32,
    },
    #[error("offset {offset} of unit {index} lies past the body region ({end} bytes)")]
    OffsetOutOfRange { index: u32, offset: u32, end: usize },
}

/// A validated blob: body region plus decoded offset table.
#[derive(Debug, Clone)]
pub struct BlobView<'a> {
    bytes: &'a [u8],
    space: IndexSpace,
    offsets: Vec<u32>,
    table_start: usize,
    body_end: usize,
}

impl<'a> BlobView<'a> {
    pub fn new(bytes: &'a [u8], space: &IndexSpace) -> Result<Self, BlobError> {
        let count = space.total_count() as usize;
        let table_len = count * OFFSET_ENTRY_SIZE;
        if bytes.len() < table_len {
            return Err(BlobError::TooSmall {
                needed: table_len,
                actual: bytes.len(),
            });
        }

        let table_start = bytes.len() - table_len;
        if !table_start.is_multiple_of(BLOB_ALIGN) {
            return Err(BlobError::MisalignedTable(table_start));
        }
        if table_start < INT_OVERREAD {
            return Err(BlobError::MissingPadding(table_start));
        }

        let offsets: Vec<u32> = bytes[table_start..]
            .chunks_exact(OFFSET_ENTRY_SIZE)
            .map(|chunk| u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        let end = table_start - INT_OVERREAD;
        let mut previous = 0;
        for (i, &offset) in offsets.iter().enumerate() {
            if offset < previous {
                return Err(BlobError::NonMonotonic {
                    index: i as u32,
                    offset,
                    previous,
                });
            }
            if offset as usize > end {
                return Err(BlobError::OffsetOutOfRange {
                    index: i as u32,
                    offset,
                    end,
                });
            }
            previous = offset;
        }

        let last_start = offsets.last().map_or(0, |&offset| offset as usize);
        let body_end = find_body_end(bytes, last_start, table_start);

        Ok(Self {
            bytes,
            space: *space,
            offsets,
            table_start,
            body_end,
        })
    }

    pub fn space(&self) -> &IndexSpace {
        &self.space
    }

    /// The whole blob.
    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    pub fn offset(&self, index: UnitIndex) -> u32 {
        self.offsets[index.as_usize()]
    }

    /// Start of the trailing offset table.
    pub fn table_start(&self) -> usize {
        self.table_start
    }

    /// Bodies plus padding.
    pub fn body_region(&self) -> &'a [u8] {
        &self.bytes[..self.table_start]
    }

    /// Where the padding starts.
    pub fn body_end(&self) -> usize {
        self.body_end
    }

    pub fn padding_len(&self) -> usize {
        self.table_start - self.body_end
    }

    /// Byte range of a unit's body. The last unit stops at the padding.
    pub fn unit_range(&self, index: UnitIndex) -> std::ops::Range<usize> {
        let i = index.as_usize();
        let start = self.offsets[i] as usize;
        let end = self
            .offsets
            .get(i + 1)
            .map_or(self.body_end, |&next| next as usize);
        start..end
    }

    pub fn unit_bytes(&self, index: UnitIndex) -> &'a [u8] {
        &self.bytes[self.unit_range(index)]
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitIndex, CodeUnit)> + use<> {
        self.space.iter()
    }
}

/// Start of the trailing `NOP` run after the last body.
///
/// `NOP` is never an operand, so a run that decodes as whole instructions up
/// to the table is filler. Undecodable tails count as body.
fn find_body_end(bytes: &[u8], last_start: usize, table_start: usize) -> usize {
    let mut padding_start = None;
    for (pos, instr) in Decoder::new(bytes, last_start..table_start) {
        match instr {
            Instr::Nop => {
                padding_start.get_or_insert(pos);
            }
            _ => padding_start = None,
        }
    }
    padding_start.unwrap_or(table_start)
}

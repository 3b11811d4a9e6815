//! Instruction stream decoder for unit bodies.
//!
//! Used by the dump and by tests. Integers are read with the 4-byte over-read
//! the padding contract allows, but no instruction may end past its unit.

use std::ops::Range;

use crate::int_codec::decode_int;
use crate::opcode::{Opcode, ReferenceKind, Shape, SiteCoding};

/// One decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Instr<'a> {
    Nop,
    NewCode {
        ref_count: u32,
        instructions: &'a [u8],
    },
    NewByteArray(&'a [u8]),
    NewFixedArray {
        len: u32,
    },
    NewString(&'a [u8]),
    NewHeapNumber(f64),
    Skip(u32),
    Smi(i32),
    Reference {
        kind: ReferenceKind,
        coding: SiteCoding,
        index: u32,
    },
    /// Bytes that do not decode; always the rest of the range.
    Raw(&'a [u8]),
}

/// Iterates `(position, instruction)` over a byte range of a blob.
#[derive(Debug, Clone)]
pub struct Decoder<'a> {
    blob: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(blob: &'a [u8], range: Range<usize>) -> Self {
        Self {
            blob,
            pos: range.start,
            end: range.end.min(blob.len()),
        }
    }

    fn byte(&mut self) -> Option<u8> {
        if self.pos >= self.end {
            return None;
        }
        let b = self.blob[self.pos];
        self.pos += 1;
        Some(b)
    }

    fn int(&mut self) -> Option<u32> {
        let (value, len) = decode_int(self.blob.get(self.pos..)?)?;
        if self.pos + len > self.end {
            return None;
        }
        self.pos += len;
        Some(value)
    }

    fn take(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.pos.checked_add(len)?;
        if end > self.end {
            return None;
        }
        let bytes = &self.blob[self.pos..end];
        self.pos = end;
        Some(bytes)
    }

    fn instr(&mut self) -> Option<Instr<'a>> {
        let instr = match Opcode::from_u8(self.byte()?)? {
            Opcode::Nop => Instr::Nop,
            Opcode::Skip => Instr::Skip(self.int()?),
            Opcode::Smi => {
                let bytes: [u8; 4] = self.take(4)?.try_into().ok()?;
                Instr::Smi(i32::from_le_bytes(bytes))
            }
            Opcode::Reference(kind, coding) => Instr::Reference {
                kind,
                coding,
                index: self.int()?,
            },
            Opcode::NewObject => match Shape::from_u8(self.byte()?)? {
                Shape::Code => {
                    let len = self.int()?;
                    let ref_count = self.int()?;
                    Instr::NewCode {
                        ref_count,
                        instructions: self.take(len as usize)?,
                    }
                }
                Shape::ByteArray => {
                    let len = self.int()?;
                    Instr::NewByteArray(self.take(len as usize)?)
                }
                Shape::FixedArray => Instr::NewFixedArray { len: self.int()? },
                Shape::String => {
                    let len = self.int()?;
                    Instr::NewString(self.take(len as usize)?)
                }
                Shape::HeapNumber => {
                    let bytes: [u8; 8] = self.take(8)?.try_into().ok()?;
                    Instr::NewHeapNumber(f64::from_le_bytes(bytes))
                }
            },
        };
        Some(instr)
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = (usize, Instr<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        let start = self.pos;
        match self.instr() {
            Some(instr) => Some((start, instr)),
            None => {
                self.pos = self.end;
                Some((start, Instr::Raw(&self.blob[start..self.end])))
            }
        }
    }
}

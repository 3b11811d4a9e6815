//! Opcode and tag encoding.

use snapcode_core::{HowToCode, WhereToPoint};

use crate::constants::{
    CACHE_REF, NEW_OBJECT, NOP, ROOT, SELF_REF, SHAPE_BYTE_ARRAY, SHAPE_CODE, SHAPE_FIXED_ARRAY,
    SHAPE_HEAP_NUMBER, SHAPE_STRING, SKIP, SMI,
};

/// The three ways a pointer out of a unit body can be encoded.
///
/// Declaration order is resolution precedence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ReferenceKind {
    Root,
    SelfReference,
    CacheReference,
}

impl ReferenceKind {
    pub const ALL: [Self; 3] = [Self::Root, Self::SelfReference, Self::CacheReference];

    fn base(self) -> u8 {
        match self {
            Self::Root => ROOT,
            Self::SelfReference => SELF_REF,
            Self::CacheReference => CACHE_REF,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::SelfReference => "self",
            Self::CacheReference => "cache",
        }
    }
}

/// Coding of a reference site, folded into the low two bits of the tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct SiteCoding {
    pub how: HowToCode,
    pub point: WhereToPoint,
}

impl SiteCoding {
    pub const PLAIN: Self = Self {
        how: HowToCode::Plain,
        point: WhereToPoint::StartOfObject,
    };

    pub fn new(how: HowToCode, point: WhereToPoint) -> Self {
        Self { how, point }
    }

    fn bits(self) -> u8 {
        let how = match self.how {
            HowToCode::Plain => 0,
            HowToCode::FromCode => 1,
        };
        let point = match self.point {
            WhereToPoint::StartOfObject => 0,
            WhereToPoint::InnerPointer => 2,
        };
        how | point
    }

    fn from_bits(bits: u8) -> Self {
        Self {
            how: if bits & 1 == 0 {
                HowToCode::Plain
            } else {
                HowToCode::FromCode
            },
            point: if bits & 2 == 0 {
                WhereToPoint::StartOfObject
            } else {
                WhereToPoint::InnerPointer
            },
        }
    }
}

/// Tag byte for a reference.
pub fn reference_tag(kind: ReferenceKind, coding: SiteCoding) -> u8 {
    kind.base() + coding.bits()
}

/// Split a reference tag byte. `None` if the byte is not a reference tag.
pub fn decode_reference_tag(tag: u8) -> Option<(ReferenceKind, SiteCoding)> {
    let kind = ReferenceKind::ALL
        .into_iter()
        .find(|kind| (kind.base()..kind.base() + 4).contains(&tag))?;
    Some((kind, SiteCoding::from_bits(tag & 3)))
}

/// Object shape following `NEW_OBJECT`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[repr(u8)]
pub enum Shape {
    Code = SHAPE_CODE,
    ByteArray = SHAPE_BYTE_ARRAY,
    FixedArray = SHAPE_FIXED_ARRAY,
    String = SHAPE_STRING,
    HeapNumber = SHAPE_HEAP_NUMBER,
}

impl Shape {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            SHAPE_CODE => Some(Self::Code),
            SHAPE_BYTE_ARRAY => Some(Self::ByteArray),
            SHAPE_FIXED_ARRAY => Some(Self::FixedArray),
            SHAPE_STRING => Some(Self::String),
            SHAPE_HEAP_NUMBER => Some(Self::HeapNumber),
            _ => None,
        }
    }

    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

/// Top-level instruction kind of a byte in the stream.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Opcode {
    Nop,
    NewObject,
    Skip,
    Smi,
    Reference(ReferenceKind, SiteCoding),
}

impl Opcode {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            NOP => Some(Self::Nop),
            NEW_OBJECT => Some(Self::NewObject),
            SKIP => Some(Self::Skip),
            SMI => Some(Self::Smi),
            _ => decode_reference_tag(v).map(|(kind, coding)| Self::Reference(kind, coding)),
        }
    }
}

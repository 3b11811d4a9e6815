//! The flat index space of code units.
//!
//! Builtins occupy `[0, builtins)`. Handler slots follow, one per
//! `(operation, width)` pair in operation-major order. This ordering is the
//! offset table's layout and must never change without a format break.

use serde::{Deserialize, Serialize};
use snapcode_core::{BuiltinId, OperandWidth, Operation, UnitIndex};

/// A code unit slot in the blob.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CodeUnit {
    Builtin(BuiltinId),
    Handler {
        operation: Operation,
        width: OperandWidth,
    },
}

impl CodeUnit {
    pub fn is_builtin(self) -> bool {
        matches!(self, Self::Builtin(_))
    }
}

impl std::fmt::Display for CodeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Builtin(id) => write!(f, "builtin {}", id.0),
            Self::Handler { operation, width } => {
                write!(f, "handler {}/w{}", operation.0, width.0)
            }
        }
    }
}

/// Shape of the closed set: builtin count and the two handler domains.
///
/// Constructed once and passed by reference to everything that needs index
/// arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct IndexSpace {
    builtins: u16,
    operations: u16,
    widths: u8,
}

impl IndexSpace {
    pub const fn new(builtins: u16, operations: u16, widths: u8) -> Self {
        Self {
            builtins,
            operations,
            widths,
        }
    }

    #[inline]
    pub fn builtin_count(&self) -> u32 {
        self.builtins as u32
    }

    #[inline]
    pub fn operation_count(&self) -> u32 {
        self.operations as u32
    }

    #[inline]
    pub fn width_count(&self) -> u32 {
        self.widths as u32
    }

    /// `|operations| × |widths|`.
    #[inline]
    pub fn handler_count(&self) -> u32 {
        self.operation_count() * self.width_count()
    }

    /// Number of offset table entries.
    #[inline]
    pub fn total_count(&self) -> u32 {
        self.builtin_count() + self.handler_count()
    }

    #[inline]
    pub fn first_builtin_index(&self) -> UnitIndex {
        UnitIndex(0)
    }

    #[inline]
    pub fn first_handler_index(&self) -> UnitIndex {
        UnitIndex(self.builtin_count())
    }

    pub fn is_builtin_index(&self, index: UnitIndex) -> bool {
        index.get() < self.builtin_count()
    }

    pub fn is_handler_index(&self, index: UnitIndex) -> bool {
        index.get() >= self.builtin_count() && index.get() < self.total_count()
    }

    pub fn contains_builtin(&self, id: BuiltinId) -> bool {
        (id.0 as u32) < self.builtin_count()
    }

    pub fn contains_handler(&self, operation: Operation, width: OperandWidth) -> bool {
        (operation.0 as u32) < self.operation_count() && (width.0 as u32) < self.width_count()
    }

    /// Flat index of a builtin. Builtin ids map to themselves.
    pub fn builtin_index(&self, id: BuiltinId) -> UnitIndex {
        self.ensure_builtin(id);
        UnitIndex(id.0 as u32)
    }

    /// Flat index of a handler slot.
    pub fn handler_index(&self, operation: Operation, width: OperandWidth) -> UnitIndex {
        self.ensure_handler(operation, width);
        let slot = operation.0 as u32 * self.width_count() + width.0 as u32;
        UnitIndex(self.builtin_count() + slot)
    }

    /// Index of a unit (inverse of `unit`).
    pub fn index_of(&self, unit: CodeUnit) -> UnitIndex {
        match unit {
            CodeUnit::Builtin(id) => self.builtin_index(id),
            CodeUnit::Handler { operation, width } => self.handler_index(operation, width),
        }
    }

    /// The unit stored at a flat index.
    pub fn unit(&self, index: UnitIndex) -> CodeUnit {
        self.ensure_index(index);
        if self.is_builtin_index(index) {
            return CodeUnit::Builtin(BuiltinId(index.get() as u16));
        }
        let slot = index.get() - self.builtin_count();
        CodeUnit::Handler {
            operation: Operation((slot / self.width_count()) as u16),
            width: OperandWidth((slot % self.width_count()) as u8),
        }
    }

    /// Every unit in blob order.
    pub fn iter(&self) -> impl Iterator<Item = (UnitIndex, CodeUnit)> + use<> {
        let widths = self.widths;
        let builtins = (0..self.builtins).map(|id| CodeUnit::Builtin(BuiltinId(id)));
        let handlers = (0..self.operations).flat_map(move |op| {
            (0..widths).map(move |w| CodeUnit::Handler {
                operation: Operation(op),
                width: OperandWidth(w),
            })
        });
        builtins
            .chain(handlers)
            .enumerate()
            .map(|(i, unit)| (UnitIndex(i as u32), unit))
    }

    pub fn operations(&self) -> impl Iterator<Item = Operation> {
        (0..self.operations).map(Operation)
    }

    pub fn widths(&self) -> impl Iterator<Item = OperandWidth> {
        (0..self.widths).map(OperandWidth)
    }
}

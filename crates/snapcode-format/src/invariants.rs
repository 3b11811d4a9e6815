//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use snapcode_core::{BuiltinId, OperandWidth, Operation, UnitIndex};

use crate::IndexSpace;

impl IndexSpace {
    pub(crate) fn ensure_builtin(&self, id: BuiltinId) {
        if !self.contains_builtin(id) {
            panic!(
                "IndexSpace: builtin {} out of range (builtin count {})",
                id.0,
                self.builtin_count()
            );
        }
    }

    pub(crate) fn ensure_handler(&self, operation: Operation, width: OperandWidth) {
        if !self.contains_handler(operation, width) {
            panic!(
                "IndexSpace: handler ({}, w{}) out of range ({} operations × {} widths)",
                operation.0,
                width.0,
                self.operation_count(),
                self.width_count()
            );
        }
    }

    pub(crate) fn ensure_index(&self, index: UnitIndex) {
        if index.get() >= self.total_count() {
            panic!(
                "IndexSpace: unit index {} out of range (total {})",
                index.get(),
                self.total_count()
            );
        }
    }
}

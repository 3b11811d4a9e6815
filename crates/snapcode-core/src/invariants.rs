//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{Code, Heap, HeapObject, ObjectId};

impl Heap {
    pub(crate) fn ensure_object(&self, id: ObjectId) -> &HeapObject {
        self.get(id).unwrap_or_else(|| {
            panic!(
                "Heap: object {} not allocated (heap holds {} objects)",
                id.0,
                self.len()
            )
        })
    }

    /// Get an object that must be code.
    pub fn ensure_code(&self, id: ObjectId) -> &Code {
        match self.ensure_object(id) {
            HeapObject::Code(code) => code,
            other => panic!(
                "Heap: object {} is a {}, expected code",
                id.0,
                other.shape_name()
            ),
        }
    }
}

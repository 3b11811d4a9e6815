//! Output statistics.

use snapcode_format::ReferenceKind;

/// How many references were written per encoding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReferenceCounts {
    pub root: u32,
    pub self_reference: u32,
    pub cache: u32,
}

impl ReferenceCounts {
    pub fn record(&mut self, kind: ReferenceKind) {
        match kind {
            ReferenceKind::Root => self.root += 1,
            ReferenceKind::SelfReference => self.self_reference += 1,
            ReferenceKind::CacheReference => self.cache += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.root + self.self_reference + self.cache
    }

    pub fn merge(&mut self, other: ReferenceCounts) {
        self.root += other.root;
        self.self_reference += other.self_reference;
        self.cache += other.cache;
    }
}

/// Summary of one serialization pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SerializerStats {
    /// Units with a body (absent handler slots excluded).
    pub units: u32,
    pub absent_slots: u32,
    pub body_bytes: usize,
    pub padding_bytes: usize,
    pub table_bytes: usize,
    pub references: ReferenceCounts,
}

impl SerializerStats {
    pub fn total_bytes(&self) -> usize {
        self.body_bytes + self.padding_bytes + self.table_bytes
    }
}

impl std::fmt::Display for SerializerStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "units      {} ({} absent)", self.units, self.absent_slots)?;
        writeln!(f, "body       {} bytes", self.body_bytes)?;
        writeln!(f, "padding    {} bytes", self.padding_bytes)?;
        writeln!(f, "table      {} bytes", self.table_bytes)?;
        write!(
            f,
            "references {} root, {} self, {} cache",
            self.references.root, self.references.self_reference, self.references.cache
        )
    }
}

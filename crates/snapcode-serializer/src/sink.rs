//! Append-only byte stream the serializer writes into.

use snapcode_format::{BLOB_ALIGN, INT_OVERREAD, NOP, align_to_blob, encode_int};
use tracing::trace;

/// Growable output buffer with labelled writes.
///
/// Labels only reach the `trace` log; they never change the bytes.
#[derive(Debug, Default)]
pub struct SnapshotSink {
    data: Vec<u8>,
    sealed: bool,
}

impl SnapshotSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    pub fn position(&self) -> usize {
        self.data.len()
    }

    /// Append one opcode or filler byte.
    pub fn put(&mut self, byte: u8, label: &str) {
        self.ensure_open(label);
        trace!(pos = self.data.len(), byte, label, "put");
        self.data.push(byte);
    }

    /// Append a variable-length integer.
    pub fn put_int(&mut self, value: u32, label: &str) {
        self.ensure_open(label);
        trace!(pos = self.data.len(), value, label, "put_int");
        encode_int(value, &mut self.data);
    }

    /// Append bytes verbatim.
    pub fn put_raw(&mut self, bytes: &[u8], label: &str) {
        self.ensure_open(label);
        trace!(pos = self.data.len(), len = bytes.len(), label, "put_raw");
        self.data.extend_from_slice(bytes);
    }

    /// Write the integer over-read margin, then fill to [`BLOB_ALIGN`].
    ///
    /// Returns the number of filler bytes written.
    pub fn pad(&mut self) -> usize {
        self.ensure_open("padding");
        let start = self.data.len();
        let end = align_to_blob(start + INT_OVERREAD);
        debug_assert!(end.is_multiple_of(BLOB_ALIGN));
        self.data.resize(end, NOP);
        trace!(pos = start, len = end - start, "pad");
        end - start
    }

    /// Finalize the stream. Later writes panic.
    pub fn seal(&mut self) {
        self.ensure_open("seal");
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn ensure_open(&self, label: &str) {
        if self.sealed {
            panic!(
                "SnapshotSink: write '{label}' after seal (position {})",
                self.data.len()
            );
        }
    }
}

//! Input accumulation across writes.

/// Unconsumed input bytes.
///
/// Holds the tail of the stream that the tokenizer could not resolve yet: an
/// incomplete tag, comment or doctype, an undecidable `<`, or the trailing
/// bytes of a partial multi-byte character. New chunks are appended to it and
/// the whole span is scanned again from its start.
#[derive(Debug, Default)]
pub(crate) struct InputBuffer {
    bytes: Vec<u8>,
    base: usize,
}

impl InputBuffer {
    pub(crate) fn append(&mut self, chunk: &[u8]) {
        self.bytes.extend_from_slice(chunk);
    }

    pub(crate) fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Absolute stream offset of `bytes()[0]`.
    pub(crate) fn base(&self) -> usize {
        self.base
    }

    pub(crate) fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Drop the first `count` bytes after they were fully tokenized.
    pub(crate) fn consume(&mut self, count: usize) {
        debug_assert!(count <= self.bytes.len(), "consumed past the buffer end");
        self.bytes.drain(..count);
        self.base += count;
    }
}

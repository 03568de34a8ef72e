//! Output assembly.
//!
//! Unmodified tokens are never re-encoded: their source spans are coalesced
//! into one pending range that is written in a single sink call once
//! something else has to be written, or when the current write ends. Spans
//! handed to the serializer are offsets into the current input buffer, so the
//! pending range must be flushed before that buffer is consumed.

use std::mem;

use crate::shared::Span;
use crate::units::Mutations;

/// Receives rewritten output as it is produced.
pub trait OutputSink {
    fn handle_chunk(&mut self, chunk: &[u8]);
}

impl<F: FnMut(&[u8])> OutputSink for F {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        self(chunk);
    }
}

/// A token that can be written with its mutations applied.
pub(crate) trait SerializableToken {
    fn mutations(&self) -> &Mutations;

    /// Whether the token itself changed and has to be re-serialized.
    fn is_modified(&self) -> bool;

    fn serialize_modified(&self, out: &mut Vec<u8>);
}

pub(crate) struct Serializer<O> {
    sink: O,
    pending: Option<Span>,
    scratch: Vec<u8>,
}

impl<O: OutputSink> Serializer<O> {
    pub(crate) fn new(sink: O) -> Self {
        Self {
            sink,
            pending: None,
            scratch: Vec::new(),
        }
    }

    /// Copy `span` of `src` to the output unchanged.
    pub(crate) fn passthrough(&mut self, src: &[u8], span: Span) {
        if span.is_empty() {
            return;
        }
        if let Some(pending) = &mut self.pending
            && pending.end == span.start
        {
            pending.end = span.end;
            return;
        }
        self.flush(src);
        self.pending = Some(span);
    }

    pub(crate) fn flush(&mut self, src: &[u8]) {
        if let Some(pending) = self.pending.take() {
            self.sink.handle_chunk(&src[pending.range()]);
        }
    }

    /// Write bytes that are not part of the input.
    pub(crate) fn emit(&mut self, src: &[u8], bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.flush(src);
        self.sink.handle_chunk(bytes);
    }

    /// Write a token found at `span` of `src` with its mutations applied:
    /// inserted-before content, then the replacement or the token itself,
    /// then inserted-after content.
    pub(crate) fn token(&mut self, src: &[u8], span: Span, token: &impl SerializableToken) {
        let mutations = token.mutations();
        self.emit(src, &mutations.before);
        if mutations.removed {
            self.emit(src, &mutations.replacement);
        } else if token.is_modified() {
            let mut scratch = mem::take(&mut self.scratch);
            scratch.clear();
            token.serialize_modified(&mut scratch);
            self.emit(src, &scratch);
            self.scratch = scratch;
        } else {
            self.passthrough(src, span);
        }
        self.emit(src, &mutations.after);
    }

    pub(crate) fn into_sink(self) -> O {
        self.sink
    }
}

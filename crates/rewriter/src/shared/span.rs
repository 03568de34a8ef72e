//! Byte spans over the input stream.

use std::ops::Range;

/// Byte range `[start, end)` of a token in the input stream.
///
/// Offsets are absolute: they count bytes from the first byte ever written to
/// the rewriter, regardless of how the input was split into chunks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start must be <= end");
        Self { start, end }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    pub(crate) fn offset(self, base: usize) -> Self {
        Self::new(self.start + base, self.end + base)
    }

    pub(crate) fn range(self) -> Range<usize> {
        self.start..self.end
    }
}

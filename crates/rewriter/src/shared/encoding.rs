//! Document encoding support.
//!
//! The tokenizer only looks at ASCII bytes to find markup, so any encoding
//! that keeps ASCII as single bytes can be processed without decoding the
//! stream. Decoding happens lazily when a handler reads token content, and
//! encoding happens when a handler inserts content.

use std::borrow::Cow;

use encoding_rs::{BIG5, EUC_JP, EUC_KR, Encoding, GB18030, GBK, SHIFT_JIS, UTF_8};

use super::error::EncodingError;

/// An [`Encoding`] in which every ASCII character is encoded as its ASCII
/// byte and no other character uses bytes below 0x80 as a lead byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AsciiCompatibleEncoding(&'static Encoding);

impl AsciiCompatibleEncoding {
    /// Returns `None` for encodings such as UTF-16 or ISO-2022-JP.
    pub fn new(encoding: &'static Encoding) -> Option<Self> {
        encoding.is_ascii_compatible().then_some(Self(encoding))
    }

    pub fn utf_8() -> Self {
        Self(UTF_8)
    }

    /// Resolve a WHATWG encoding label such as `"utf-8"` or `"windows-1251"`.
    pub fn from_label(label: &str) -> Result<Self, EncodingError> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| EncodingError::UnknownEncoding(label.to_string()))?;
        Self::new(encoding).ok_or(EncodingError::NonAsciiCompatibleEncoding(encoding.name()))
    }

    pub fn encoding(self) -> &'static Encoding {
        self.0
    }

    pub fn name(self) -> &'static str {
        self.0.name()
    }

    /// Lossy decode: malformed sequences become U+FFFD.
    pub(crate) fn decode<'b>(self, bytes: &'b [u8]) -> Cow<'b, str> {
        self.0.decode_without_bom_handling(bytes).0
    }

    /// Encode inserted content. Characters the encoding can't represent are
    /// written as numeric character references.
    pub(crate) fn encode_content<'s>(self, text: &'s str) -> Cow<'s, [u8]> {
        self.0.encode(text).0
    }

    /// Encode a name; `None` if any character is not representable.
    pub(crate) fn encode_strict(self, text: &str) -> Option<Vec<u8>> {
        let (bytes, _, had_unmappable) = self.0.encode(text);
        (!had_unmappable).then(|| bytes.into_owned())
    }

    /// Number of trailing bytes of a text run that may be an incomplete
    /// multi-byte character and have to wait for the next chunk.
    pub(crate) fn incomplete_suffix_len(self, bytes: &[u8]) -> usize {
        if self.0 == UTF_8 {
            return tools::utf8::incomplete_suffix_len(bytes);
        }
        if self.is_multi_byte_legacy() {
            // Without decoder state the pairing of a non-ASCII run is unknown,
            // so the whole run waits for an ASCII byte or the end of the text.
            return bytes.iter().rev().take_while(|b| !b.is_ascii()).count();
        }
        0
    }

    fn is_multi_byte_legacy(self) -> bool {
        [SHIFT_JIS, EUC_JP, EUC_KR, BIG5, GBK, GB18030].contains(&self.0)
    }
}

impl Default for AsciiCompatibleEncoding {
    fn default() -> Self {
        Self::utf_8()
    }
}

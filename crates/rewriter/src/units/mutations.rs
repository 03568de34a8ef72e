//! Content inserted around, or instead of, a token.

use tools::escape::escape_text;

use crate::shared::AsciiCompatibleEncoding;

/// How inserted content is interpreted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ContentType {
    /// Inserted as is.
    #[default]
    Html,
    /// HTML-escaped before insertion: `&`, `<` and `>` become character
    /// references. Inside raw text elements such as `<script>` there is no
    /// escaping mechanism and text is inserted as is.
    Text,
}

pub(crate) fn encode_content(
    content: &str,
    content_type: ContentType,
    encoding: AsciiCompatibleEncoding,
    escape: bool,
) -> Vec<u8> {
    match content_type {
        ContentType::Text if escape => encoding.encode_content(&escape_text(content)).into_owned(),
        _ => encoding.encode_content(content).into_owned(),
    }
}

/// Pending changes to one token, already encoded for the output.
#[derive(Debug)]
pub(crate) struct Mutations {
    pub(crate) before: Vec<u8>,
    pub(crate) replacement: Vec<u8>,
    pub(crate) after: Vec<u8>,
    pub(crate) removed: bool,
    encoding: AsciiCompatibleEncoding,
    escape_text: bool,
}

impl Mutations {
    pub(crate) fn new(encoding: AsciiCompatibleEncoding) -> Self {
        Self::with_escaping(encoding, true)
    }

    pub(crate) fn with_escaping(encoding: AsciiCompatibleEncoding, escape_text: bool) -> Self {
        Self {
            before: Vec::new(),
            replacement: Vec::new(),
            after: Vec::new(),
            removed: false,
            encoding,
            escape_text,
        }
    }

    pub(crate) fn encode(&self, content: &str, content_type: ContentType) -> Vec<u8> {
        encode_content(content, content_type, self.encoding, self.escape_text)
    }

    /// Consecutive calls append after previously inserted content.
    pub(crate) fn before(&mut self, content: &str, content_type: ContentType) {
        let bytes = self.encode(content, content_type);
        self.before.extend_from_slice(&bytes);
    }

    /// Consecutive calls insert before previously inserted content, so the
    /// latest insertion ends up closest to the token.
    pub(crate) fn after(&mut self, content: &str, content_type: ContentType) {
        let bytes = self.encode(content, content_type);
        self.after.splice(0..0, bytes);
    }

    pub(crate) fn replace(&mut self, content: &str, content_type: ContentType) {
        self.replacement = self.encode(content, content_type);
        self.removed = true;
    }

    pub(crate) fn remove(&mut self) {
        self.replacement.clear();
        self.removed = true;
    }

    /// No output other than the token's own source bytes.
    pub(crate) fn is_untouched(&self) -> bool {
        !self.removed && self.before.is_empty() && self.after.is_empty()
    }
}

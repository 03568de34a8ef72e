use std::borrow::Cow;
use std::fmt;

use super::{ContentType, Mutations};
use crate::serializer::SerializableToken;
use crate::shared::{AsciiCompatibleEncoding, Span};
use crate::tokenizer::TextType;

/// A piece of a text node.
///
/// A text node may be delivered in several chunks, split wherever the input
/// was split. The last chunk of a node has [`TextChunk::last_in_text_node`]
/// set and may be empty.
pub struct TextChunk<'t> {
    text: Cow<'t, str>,
    text_type: TextType,
    last_in_text_node: bool,
    span: Span,
    mutations: Mutations,
}

impl<'t> TextChunk<'t> {
    pub(crate) fn new(
        raw: &'t [u8],
        text_type: TextType,
        last_in_text_node: bool,
        span: Span,
        encoding: AsciiCompatibleEncoding,
    ) -> Self {
        Self {
            text: encoding.decode(raw),
            text_type,
            last_in_text_node,
            span,
            mutations: Mutations::with_escaping(encoding, text_type.allows_character_references()),
        }
    }

    /// Decoded text. Character references are not resolved.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn text_type(&self) -> TextType {
        self.text_type
    }

    pub fn last_in_text_node(&self) -> bool {
        self.last_in_text_node
    }

    pub fn source_location(&self) -> Span {
        self.span
    }

    pub fn before(&mut self, content: &str, content_type: ContentType) {
        self.mutations.before(content, content_type);
    }

    pub fn after(&mut self, content: &str, content_type: ContentType) {
        self.mutations.after(content, content_type);
    }

    pub fn replace(&mut self, content: &str, content_type: ContentType) {
        self.mutations.replace(content, content_type);
    }

    pub fn remove(&mut self) {
        self.mutations.remove();
    }

    pub fn removed(&self) -> bool {
        self.mutations.removed
    }
}

impl SerializableToken for TextChunk<'_> {
    fn mutations(&self) -> &Mutations {
        &self.mutations
    }

    fn is_modified(&self) -> bool {
        false
    }

    fn serialize_modified(&self, _out: &mut Vec<u8>) {}
}

impl fmt::Debug for TextChunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextChunk")
            .field("text", &self.text)
            .field("text_type", &self.text_type)
            .field("last_in_text_node", &self.last_in_text_node)
            .finish()
    }
}

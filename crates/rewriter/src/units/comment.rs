use std::borrow::Cow;
use std::fmt;

use memchr::memmem;

use super::{ContentType, Mutations};
use crate::serializer::SerializableToken;
use crate::shared::{AsciiCompatibleEncoding, CommentTextError, Span};

/// An HTML comment, including bogus comments such as `<?xml ...>`.
pub struct Comment<'t> {
    text: Cow<'t, [u8]>,
    span: Span,
    encoding: AsciiCompatibleEncoding,
    mutations: Mutations,
    modified: bool,
}

impl<'t> Comment<'t> {
    pub(crate) fn new(text: &'t [u8], span: Span, encoding: AsciiCompatibleEncoding) -> Self {
        Self {
            text: Cow::Borrowed(text),
            span,
            encoding,
            mutations: Mutations::new(encoding),
            modified: false,
        }
    }

    pub fn text(&self) -> String {
        self.encoding.decode(&self.text).into_owned()
    }

    /// Replace the comment text. The comment is then written as
    /// `<!--text-->`, so text that would end it early is rejected.
    pub fn set_text(&mut self, text: &str) -> Result<(), CommentTextError> {
        if closes_comment_early(text.as_bytes()) {
            return Err(CommentTextError::CommentClosingSequence);
        }
        let encoded = self
            .encoding
            .encode_strict(text)
            .ok_or(CommentTextError::UnencodableCharacter)?;
        self.text = Cow::Owned(encoded);
        self.modified = true;
        Ok(())
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

/// `<!-->` and `<!--->` are complete comments, and `--!>` ends one too.
fn closes_comment_early(text: &[u8]) -> bool {
    text.starts_with(b">")
        || text.starts_with(b"->")
        || memmem::find(text, b"-->").is_some()
        || memmem::find(text, b"--!>").is_some()
}

impl SerializableToken for Comment<'_> {
    fn mutations(&self) -> &Mutations {
        &self.mutations
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn serialize_modified(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"<!--");
        out.extend_from_slice(&self.text);
        out.extend_from_slice(b"-->");
    }
}

impl fmt::Debug for Comment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comment")
            .field("text", &self.text())
            .field("source_location", &self.span)
            .finish()
    }
}

use std::borrow::Cow;
use std::fmt;

use super::{ContentType, Mutations, encode_tag_name};
use crate::serializer::SerializableToken;
use crate::shared::{AsciiCompatibleEncoding, Span, TagNameError};

/// The end tag of an element, passed to callbacks registered with
/// [`super::Element::on_end_tag`].
pub struct EndTag<'t> {
    name: Cow<'t, [u8]>,
    span: Span,
    encoding: AsciiCompatibleEncoding,
    mutations: Mutations,
    modified: bool,
}

impl<'t> EndTag<'t> {
    /// `renamed` carries a name set on the element's start tag.
    pub(crate) fn new(
        name: &'t [u8],
        renamed: Option<Vec<u8>>,
        span: Span,
        encoding: AsciiCompatibleEncoding,
        mutations: Mutations,
    ) -> Self {
        let modified = renamed.is_some();
        Self {
            name: renamed.map_or(Cow::Borrowed(name), Cow::Owned),
            span,
            encoding,
            mutations,
            modified,
        }
    }

    /// Lowercase tag name.
    pub fn name(&self) -> String {
        self.name_preserve_case().to_ascii_lowercase()
    }

    pub fn name_preserve_case(&self) -> String {
        self.encoding.decode(&self.name).into_owned()
    }

    pub fn set_name(&mut self, name: &str) -> Result<(), TagNameError> {
        self.name = Cow::Owned(encode_tag_name(name, self.encoding)?);
        self.modified = true;
        Ok(())
    }

    /// Absolute byte range of the tag in the input.
    pub fn source_location(&self) -> Span {
        self.span
    }

    pub fn before(&mut self, content: &str, content_type: ContentType) {
        self.mutations.before(content, content_type);
    }

    pub fn after(&mut self, content: &str, content_type: ContentType) {
        self.mutations.after(content, content_type);
    }

    pub fn remove(&mut self) {
        self.mutations.remove();
    }

    pub fn removed(&self) -> bool {
        self.mutations.removed
    }
}

impl SerializableToken for EndTag<'_> {
    fn mutations(&self) -> &Mutations {
        &self.mutations
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn serialize_modified(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(b"</");
        out.extend_from_slice(&self.name);
        out.push(b'>');
    }
}

impl fmt::Debug for EndTag<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndTag")
            .field("name", &self.name())
            .field("source_location", &self.span)
            .finish()
    }
}

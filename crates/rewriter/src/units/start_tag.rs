use std::borrow::Cow;

use super::{Attributes, Mutations};
use crate::serializer::SerializableToken;
use crate::shared::{AsciiCompatibleEncoding, Span};

/// A start tag as seen by element handlers, through [`super::Element`].
#[derive(Debug)]
pub(crate) struct StartTag<'t> {
    name: Cow<'t, [u8]>,
    pub(crate) attributes: Attributes<'t>,
    self_closing: bool,
    span: Span,
    encoding: AsciiCompatibleEncoding,
    pub(crate) mutations: Mutations,
    modified: bool,
}

impl<'t> StartTag<'t> {
    pub(crate) fn new(
        name: &'t [u8],
        attributes: Attributes<'t>,
        self_closing: bool,
        span: Span,
        encoding: AsciiCompatibleEncoding,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            attributes,
            self_closing,
            span,
            encoding,
            mutations: Mutations::new(encoding),
            modified: false,
        }
    }

    pub(crate) fn name_preserve_case(&self) -> String {
        self.encoding.decode(&self.name).into_owned()
    }

    pub(crate) fn set_name(&mut self, name: Vec<u8>) {
        self.name = Cow::Owned(name);
        self.modified = true;
    }

    pub(crate) fn mark_modified(&mut self) {
        self.modified = true;
    }

    pub(crate) fn self_closing(&self) -> bool {
        self.self_closing
    }

    pub(crate) fn span(&self) -> Span {
        self.span
    }

    pub(crate) fn encoding(&self) -> AsciiCompatibleEncoding {
        self.encoding
    }
}

impl SerializableToken for StartTag<'_> {
    fn mutations(&self) -> &Mutations {
        &self.mutations
    }

    fn is_modified(&self) -> bool {
        self.modified
    }

    fn serialize_modified(&self, out: &mut Vec<u8>) {
        out.push(b'<');
        out.extend_from_slice(&self.name);
        self.attributes.serialize(out);
        if self.self_closing {
            out.push(b'/');
        }
        out.push(b'>');
    }
}

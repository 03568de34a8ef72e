use std::fmt;

use super::Mutations;
use crate::serializer::SerializableToken;
use crate::shared::{AsciiCompatibleEncoding, Span};

/// A document type declaration.
pub struct Doctype<'t> {
    name: Option<&'t [u8]>,
    public_id: Option<&'t [u8]>,
    system_id: Option<&'t [u8]>,
    force_quirks: bool,
    span: Span,
    encoding: AsciiCompatibleEncoding,
    mutations: Mutations,
}

impl<'t> Doctype<'t> {
    pub(crate) fn new(
        name: Option<&'t [u8]>,
        public_id: Option<&'t [u8]>,
        system_id: Option<&'t [u8]>,
        force_quirks: bool,
        span: Span,
        encoding: AsciiCompatibleEncoding,
    ) -> Self {
        Self {
            name,
            public_id,
            system_id,
            force_quirks,
            span,
            encoding,
            mutations: Mutations::new(encoding),
        }
    }

    fn decode(&self, bytes: Option<&[u8]>) -> Option<String> {
        bytes.map(|bytes| self.encoding.decode(bytes).into_owned())
    }

    /// Lowercase doctype name, `html` for standards-mode documents.
    pub fn name(&self) -> Option<String> {
        self.decode(self.name).map(|name| name.to_ascii_lowercase())
    }

    pub fn public_id(&self) -> Option<String> {
        self.decode(self.public_id)
    }

    pub fn system_id(&self) -> Option<String> {
        self.decode(self.system_id)
    }

    pub fn force_quirks(&self) -> bool {
        self.force_quirks
    }

    pub fn source_location(&self) -> Span {
        self.span
    }

    pub fn remove(&mut self) {
        self.mutations.remove();
    }

    pub fn removed(&self) -> bool {
        self.mutations.removed
    }
}

impl SerializableToken for Doctype<'_> {
    fn mutations(&self) -> &Mutations {
        &self.mutations
    }

    fn is_modified(&self) -> bool {
        false
    }

    fn serialize_modified(&self, _out: &mut Vec<u8>) {}
}

impl fmt::Debug for Doctype<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Doctype")
            .field("name", &self.name())
            .field("public_id", &self.public_id())
            .field("system_id", &self.system_id())
            .field("force_quirks", &self.force_quirks)
            .finish()
    }
}

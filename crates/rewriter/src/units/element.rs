use std::fmt;

use super::{Attribute, ContentType, EndTag, Mutations, StartTag, encode_tag_name};
use crate::dispatch::EndTagHandler;
use crate::shared::{
    AsciiCompatibleEncoding, AttributeNameError, EndTagError, HandlerResult, Span, TagNameError,
};

/// Per-element state that outlives the start tag: it is kept on the open
/// element stack until the element closes.
pub(crate) struct ElementState<'h> {
    pub(crate) end_tag_handlers: Vec<EndTagHandler<'h>>,
    /// Content scheduled around the end tag by `append` and `after`.
    pub(crate) end_tag_mutations: Mutations,
    /// Set when the start tag was renamed.
    pub(crate) end_tag_name: Option<Vec<u8>>,
    pub(crate) remove_content: bool,
}

impl ElementState<'_> {
    pub(crate) fn new(encoding: AsciiCompatibleEncoding) -> Self {
        Self {
            end_tag_handlers: Vec::new(),
            end_tag_mutations: Mutations::new(encoding),
            end_tag_name: None,
            remove_content: false,
        }
    }
}

/// An element, as seen from its start tag.
///
/// The handle is only valid during the element handler call. Changes to the
/// start tag are written out once every handler for the element has run;
/// changes to the end tag are kept until the element closes.
pub struct Element<'r, 't, 'h> {
    start_tag: &'r mut StartTag<'t>,
    state: &'r mut ElementState<'h>,
    can_have_content: bool,
}

impl<'r, 't, 'h> Element<'r, 't, 'h> {
    pub(crate) fn new(
        start_tag: &'r mut StartTag<'t>,
        state: &'r mut ElementState<'h>,
        can_have_content: bool,
    ) -> Self {
        Self {
            start_tag,
            state,
            can_have_content,
        }
    }

    fn encoding(&self) -> AsciiCompatibleEncoding {
        self.start_tag.encoding()
    }

    /// Lowercase tag name.
    pub fn tag_name(&self) -> String {
        self.tag_name_preserve_case().to_ascii_lowercase()
    }

    pub fn tag_name_preserve_case(&self) -> String {
        self.start_tag.name_preserve_case()
    }

    /// Rename the element. The end tag, if the element has one, is renamed
    /// too.
    pub fn set_tag_name(&mut self, name: &str) -> Result<(), TagNameError> {
        let name = encode_tag_name(name, self.encoding())?;
        if self.can_have_content {
            self.state.end_tag_name = Some(name.clone());
        }
        self.start_tag.set_name(name);
        Ok(())
    }

    pub fn attributes(&self) -> &[Attribute<'t>] {
        self.start_tag.attributes.as_slice()
    }

    /// Raw value of the first attribute named `name`, compared
    /// ASCII-case-insensitively.
    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.start_tag
            .attributes
            .get(name, self.encoding())
            .map(Attribute::value)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.start_tag.attributes.get(name, self.encoding()).is_some()
    }

    /// Set the value of an attribute, adding it after the existing ones if
    /// it is not present. The value is written double-quoted.
    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), AttributeNameError> {
        let encoding = self.encoding();
        self.start_tag.attributes.set(name, value, encoding)?;
        self.start_tag.mark_modified();
        Ok(())
    }

    pub fn remove_attribute(&mut self, name: &str) {
        let encoding = self.encoding();
        if self.start_tag.attributes.remove(name, encoding) {
            self.start_tag.mark_modified();
        }
    }

    pub fn is_self_closing(&self) -> bool {
        self.start_tag.self_closing()
    }

    /// `false` for HTML void elements and self-closing SVG or MathML
    /// elements. Such elements have neither content nor an end tag. A
    /// self-closing HTML element like `<div/>` stays open.
    pub fn can_have_content(&self) -> bool {
        self.can_have_content
    }

    /// Absolute byte range of the start tag in the input.
    pub fn source_location(&self) -> Span {
        self.start_tag.span()
    }

    /// Insert content before the start tag.
    pub fn before(&mut self, content: &str, content_type: ContentType) {
        self.start_tag.mutations.before(content, content_type);
    }

    /// Insert content after the end tag, or after the start tag of an element
    /// without content.
    pub fn after(&mut self, content: &str, content_type: ContentType) {
        if self.can_have_content {
            self.state.end_tag_mutations.after(content, content_type);
        } else {
            self.start_tag.mutations.after(content, content_type);
        }
    }

    /// Insert content at the start of the element's content. No-op for
    /// elements without content.
    pub fn prepend(&mut self, content: &str, content_type: ContentType) {
        if self.can_have_content {
            self.start_tag.mutations.after(content, content_type);
        }
    }

    /// Insert content at the end of the element's content. No-op for
    /// elements without content.
    pub fn append(&mut self, content: &str, content_type: ContentType) {
        if self.can_have_content {
            self.state.end_tag_mutations.before(content, content_type);
        }
    }

    /// Replace the element's content, dropping anything prepended or
    /// appended so far.
    pub fn set_inner_content(&mut self, content: &str, content_type: ContentType) {
        if !self.can_have_content {
            return;
        }
        self.state.remove_content = true;
        self.start_tag.mutations.after = self.start_tag.mutations.encode(content, content_type);
        self.state.end_tag_mutations.before.clear();
    }

    /// Replace the whole element, tags and content.
    pub fn replace(&mut self, content: &str, content_type: ContentType) {
        self.start_tag.mutations.replace(content, content_type);
        self.remove_content_and_end_tag();
    }

    /// Remove the whole element, tags and content.
    pub fn remove(&mut self) {
        self.start_tag.mutations.remove();
        self.remove_content_and_end_tag();
    }

    /// Remove the start and end tags but keep the content.
    pub fn remove_and_keep_content(&mut self) {
        self.start_tag.mutations.remove();
        if self.can_have_content {
            self.state.end_tag_mutations.remove();
        }
    }

    pub fn removed(&self) -> bool {
        self.start_tag.mutations.removed
    }

    fn remove_content_and_end_tag(&mut self) {
        if self.can_have_content {
            self.state.remove_content = true;
            self.start_tag.mutations.after.clear();
            self.state.end_tag_mutations.before.clear();
            self.state.end_tag_mutations.remove();
        }
    }

    /// Run `handler` when the element's own end tag is reached.
    ///
    /// Elements closed implicitly, by an ancestor's end tag or by the end of
    /// the document, drop their handlers without running them.
    pub fn on_end_tag(
        &mut self,
        handler: impl FnOnce(&mut EndTag<'_>) -> HandlerResult + 'h,
    ) -> Result<(), EndTagError> {
        if !self.can_have_content {
            return Err(EndTagError::NoEndTag);
        }
        self.state.end_tag_handlers.push(Box::new(handler));
        Ok(())
    }
}

impl fmt::Debug for Element<'_, '_, '_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag_name", &self.tag_name())
            .field("attributes", &self.attributes())
            .field("self_closing", &self.is_self_closing())
            .field("source_location", &self.source_location())
            .finish()
    }
}

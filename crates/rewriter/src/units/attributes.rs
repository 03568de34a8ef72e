//! Start tag attributes.

use std::borrow::Cow;
use std::fmt;

use tools::escape::push_double_quoted_value;

use crate::shared::{AsciiCompatibleEncoding, AttributeNameError, Span};
use crate::tokenizer::{AttributeSpans, is_html_whitespace};

/// An attribute of a start tag, in source order.
///
/// Names and values are kept in the document encoding. Values are raw: no
/// character references are decoded.
#[derive(Clone)]
pub struct Attribute<'t> {
    name: Cow<'t, [u8]>,
    value: Cow<'t, [u8]>,
    /// Source bytes, kept while the attribute is unmodified so it can be
    /// written back exactly as it was.
    raw: Option<&'t [u8]>,
    encoding: AsciiCompatibleEncoding,
}

impl<'t> Attribute<'t> {
    pub(crate) fn from_spans(
        src: &'t [u8],
        spans: &AttributeSpans,
        encoding: AsciiCompatibleEncoding,
    ) -> Self {
        let slice = |span: Span| &src[span.range()];
        Self {
            name: Cow::Borrowed(slice(spans.name)),
            value: Cow::Borrowed(slice(spans.value)),
            raw: Some(slice(spans.raw)),
            encoding,
        }
    }

    fn new(name: Vec<u8>, value: Vec<u8>, encoding: AsciiCompatibleEncoding) -> Self {
        Self {
            name: Cow::Owned(name),
            value: Cow::Owned(value),
            raw: None,
            encoding,
        }
    }

    /// Lowercase name.
    pub fn name(&self) -> String {
        self.name_preserve_case().to_ascii_lowercase()
    }

    pub fn name_preserve_case(&self) -> String {
        self.encoding.decode(&self.name).into_owned()
    }

    pub fn value(&self) -> String {
        self.encoding.decode(&self.value).into_owned()
    }

    pub(crate) fn name_bytes(&self) -> &[u8] {
        &self.name
    }

    pub(crate) fn value_bytes(&self) -> &[u8] {
        &self.value
    }

    fn set_value(&mut self, value: Vec<u8>) {
        self.value = Cow::Owned(value);
        self.raw = None;
    }

    pub(crate) fn serialize(&self, out: &mut Vec<u8>) {
        match self.raw {
            Some(raw) => out.extend_from_slice(raw),
            None => {
                out.extend_from_slice(&self.name);
                out.extend_from_slice(b"=\"");
                push_double_quoted_value(out, &self.value);
                out.push(b'"');
            }
        }
    }
}

impl fmt::Debug for Attribute<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Attribute")
            .field("name", &self.name())
            .field("value", &self.value())
            .finish()
    }
}

/// Attribute list of one start tag. Lookups are ASCII case-insensitive.
#[derive(Clone, Debug, Default)]
pub(crate) struct Attributes<'t> {
    items: Vec<Attribute<'t>>,
}

impl<'t> Attributes<'t> {
    pub(crate) fn from_spans(
        src: &'t [u8],
        spans: &[AttributeSpans],
        encoding: AsciiCompatibleEncoding,
    ) -> Self {
        Self {
            items: spans
                .iter()
                .map(|spans| Attribute::from_spans(src, spans, encoding))
                .collect(),
        }
    }

    pub(crate) fn as_slice(&self) -> &[Attribute<'t>] {
        &self.items
    }

    fn position(&self, name: &[u8]) -> Option<usize> {
        self.items
            .iter()
            .position(|attr| attr.name.eq_ignore_ascii_case(name))
    }

    pub(crate) fn get(&self, name: &str, encoding: AsciiCompatibleEncoding) -> Option<&Attribute<'t>> {
        let name = encoding.encode_strict(name)?;
        self.position(&name).map(|index| &self.items[index])
    }

    /// Replace the value of an existing attribute or append a new one.
    pub(crate) fn set(
        &mut self,
        name: &str,
        value: &str,
        encoding: AsciiCompatibleEncoding,
    ) -> Result<(), AttributeNameError> {
        let name = validate_attribute_name(name, encoding)?;
        let value = encoding.encode_content(value).into_owned();
        match self.position(&name) {
            Some(index) => self.items[index].set_value(value),
            None => self.items.push(Attribute::new(name, value, encoding)),
        }
        Ok(())
    }

    /// Returns whether an attribute was removed.
    pub(crate) fn remove(&mut self, name: &str, encoding: AsciiCompatibleEncoding) -> bool {
        let Some(name) = encoding.encode_strict(name) else {
            return false;
        };
        let before = self.items.len();
        self.items.retain(|attr| !attr.name.eq_ignore_ascii_case(&name));
        self.items.len() != before
    }

    pub(crate) fn serialize(&self, out: &mut Vec<u8>) {
        for attr in &self.items {
            out.push(b' ');
            attr.serialize(out);
        }
    }
}

/// Validate and encode a name for a new attribute. Names are stored in
/// lowercase.
fn validate_attribute_name(
    name: &str,
    encoding: AsciiCompatibleEncoding,
) -> Result<Vec<u8>, AttributeNameError> {
    if name.is_empty() {
        return Err(AttributeNameError::Empty);
    }
    if let Some(ch) = name
        .chars()
        .find(|&ch| (ch.is_ascii() && is_html_whitespace(ch as u8)) || matches!(ch, '/' | '=' | '>'))
    {
        return Err(AttributeNameError::ForbiddenCharacter(ch));
    }
    encoding
        .encode_strict(&name.to_ascii_lowercase())
        .ok_or(AttributeNameError::UnencodableCharacter)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &[u8]) -> Attributes<'_> {
        let spans = [
            AttributeSpans {
                name: Span::new(0, 4),
                value: Span::new(6, 9),
                raw: Span::new(0, 10),
            },
            AttributeSpans {
                name: Span::new(11, 17),
                value: Span::new(17, 17),
                raw: Span::new(11, 17),
            },
        ];
        Attributes::from_spans(src, &spans, AsciiCompatibleEncoding::utf_8())
    }

    fn serialized(attrs: &Attributes<'_>) -> String {
        let mut out = Vec::new();
        attrs.serialize(&mut out);
        String::from_utf8(out).expect("utf-8 output")
    }

    #[test]
    fn untouched_attributes_keep_source_bytes() {
        let attrs = parse(b"HREF='x y' HIDDEN");
        assert_eq!(serialized(&attrs), " HREF='x y' HIDDEN");
        let utf8 = AsciiCompatibleEncoding::utf_8();
        assert_eq!(attrs.get("href", utf8).map(Attribute::value), Some("x y".into()));
        assert_eq!(attrs.get("hidden", utf8).map(Attribute::value), Some(String::new()));
        assert_eq!(attrs.as_slice()[0].name(), "href");
        assert_eq!(attrs.as_slice()[0].name_preserve_case(), "HREF");
    }

    #[test]
    fn set_replaces_in_place_and_appends_new() {
        let utf8 = AsciiCompatibleEncoding::utf_8();
        let mut attrs = parse(b"HREF='x y' HIDDEN");
        attrs.set("href", "say \"hi\"", utf8).expect("valid name");
        attrs.set("Data-New", "1", utf8).expect("valid name");
        assert_eq!(
            serialized(&attrs),
            " HREF=\"say &quot;hi&quot;\" HIDDEN data-new=\"1\""
        );
        assert!(attrs.remove("hidden", utf8));
        assert!(!attrs.remove("missing", utf8));
        assert_eq!(serialized(&attrs), " HREF=\"say &quot;hi&quot;\" data-new=\"1\"");
    }

    #[test]
    fn invalid_names_are_rejected() {
        let utf8 = AsciiCompatibleEncoding::utf_8();
        let mut attrs = Attributes::default();
        assert_eq!(attrs.set("", "v", utf8), Err(AttributeNameError::Empty));
        assert_eq!(
            attrs.set("a b", "v", utf8),
            Err(AttributeNameError::ForbiddenCharacter(' '))
        );
        assert_eq!(
            attrs.set("a=b", "v", utf8),
            Err(AttributeNameError::ForbiddenCharacter('='))
        );
        let latin = AsciiCompatibleEncoding::from_label("windows-1252").expect("known label");
        assert_eq!(
            attrs.set("\u{4e2d}", "v", latin),
            Err(AttributeNameError::UnencodableCharacter)
        );
    }
}

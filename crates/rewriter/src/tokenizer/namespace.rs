//! SVG and MathML content.
//!
//! Only the namespace changes that affect lexing are tracked: text modes
//! switch for HTML elements only, CDATA sections exist only in foreign
//! content, and the self-closing flag only closes foreign elements. The
//! stack is independent of the open element stack; like the tokenizer it
//! only sees tag names and attributes.

use crate::shared::names;

/// Namespace of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum Namespace {
    #[default]
    Html,
    Svg,
    MathMl,
}

/// Namespaces entered above the document's HTML namespace, innermost last.
#[derive(Debug, Default)]
pub(crate) struct NamespaceStack {
    entries: Vec<Namespace>,
}

impl NamespaceStack {
    pub(crate) fn current(&self) -> Namespace {
        self.entries.last().copied().unwrap_or_default()
    }

    pub(crate) fn depth(&self) -> usize {
        self.entries.len()
    }

    fn parent(&self) -> Option<Namespace> {
        let index = self.entries.len().checked_sub(2)?;
        Some(self.entries[index])
    }

    /// Track a start tag and return the namespace of the element it opens.
    /// `attribute` looks up an attribute value by lowercase name.
    pub(crate) fn start_tag<'b>(
        &mut self,
        name: &[u8],
        self_closing: bool,
        attribute: impl Fn(&[u8]) -> Option<&'b [u8]>,
    ) -> Namespace {
        let entered = match name {
            b"svg" => Namespace::Svg,
            b"math" => Namespace::MathMl,
            _ => return self.start_tag_in_current(name, self_closing, attribute),
        };
        if !self_closing {
            self.entries.push(entered);
        }
        entered
    }

    fn start_tag_in_current<'b>(
        &mut self,
        name: &[u8],
        self_closing: bool,
        attribute: impl Fn(&[u8]) -> Option<&'b [u8]>,
    ) -> Namespace {
        let current = self.current();
        if current == Namespace::Html {
            return current;
        }

        let font_breakout = name == b"font"
            && names::FONT_BREAKOUT_ATTRIBUTES
                .iter()
                .any(|&attr| attribute(attr).is_some());
        if font_breakout || names::breaks_out_of_foreign_content(name) {
            self.entries.pop();
            return self.current();
        }

        let integration_point = match current {
            Namespace::Svg => names::is_svg_html_integration_point(name),
            Namespace::MathMl => {
                names::is_mathml_text_integration_point(name)
                    || (name == b"annotation-xml"
                        && attribute(b"encoding").is_some_and(|encoding| {
                            encoding.eq_ignore_ascii_case(b"text/html")
                                || encoding.eq_ignore_ascii_case(b"application/xhtml+xml")
                        }))
            }
            Namespace::Html => false,
        };
        if integration_point && !self_closing {
            self.entries.push(Namespace::Html);
        }
        current
    }

    pub(crate) fn end_tag(&mut self, name: &[u8]) {
        let leaves = match (self.current(), self.parent()) {
            (Namespace::Svg, _) => name == b"svg",
            (Namespace::MathMl, _) => name == b"math",
            (Namespace::Html, Some(Namespace::Svg)) => names::is_svg_html_integration_point(name),
            (Namespace::Html, Some(Namespace::MathMl)) => {
                names::is_mathml_text_integration_point(name) || name == b"annotation-xml"
            }
            (Namespace::Html, _) => false,
        };
        if leaves {
            self.entries.pop();
        }
    }
}

//! Streaming HTML lexer.
//!
//! The lexer works on the unconsumed input buffer and produces one lexeme at a
//! time. Spans in lexemes are offsets into the slice passed to
//! [`Tokenizer::next_lexeme`]; the caller turns them into absolute stream
//! offsets.
//!
//! Invariants:
//! - A non-text lexeme is only produced once it is complete, or at the end of
//!   the stream, where unterminated constructs run to the last byte.
//! - Text is produced eagerly. A text node that reaches the end of the
//!   available input is emitted as a chunk with `last_in_text_node == false`,
//!   minus any trailing bytes of an incomplete multi-byte character. The node
//!   is closed later by a chunk with `last_in_text_node == true`, which may be
//!   empty.
//! - Feeding the same bytes in any number of chunks yields the same sequence
//!   of non-text lexemes and the same concatenated text.

use crate::shared::{AsciiCompatibleEncoding, Span, names};

mod markup;
mod namespace;
mod tag;
mod text;

pub(crate) use namespace::Namespace;
use namespace::NamespaceStack;


/// Lexical context of a text chunk.
///
/// Determines how characters in the text are interpreted: `&` starts a
/// character reference in `Data` and `RcData` only, and markup is recognized
/// in `Data` only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextType {
    /// Text after `<plaintext>`: everything up to the end of the stream.
    PlainText,
    /// Content of `<textarea>` and `<title>`.
    RcData,
    /// Content of `<style>`, `<xmp>`, `<iframe>`, `<noembed>`, `<noframes>`
    /// and `<noscript>`.
    RawText,
    /// Content of `<script>`.
    ScriptData,
    /// Regular text content.
    Data,
    /// Content of a `<![CDATA[` section in SVG or MathML content. The
    /// delimiters themselves are not part of the text.
    CDataSection,
}

impl TextType {
    /// Whether inserted text has to be HTML-escaped in this context.
    pub(crate) fn allows_character_references(self) -> bool {
        matches!(self, TextType::Data | TextType::RcData)
    }
}

/// Source spans of one attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AttributeSpans {
    pub(crate) name: Span,
    /// Value without quotes; empty for attributes without a value.
    pub(crate) value: Span,
    /// Everything from the first name byte to the end of the value,
    /// including quotes.
    pub(crate) raw: Span,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Lexeme {
    Text {
        span: Span,
        text_type: TextType,
        last_in_text_node: bool,
    },
    StartTag {
        span: Span,
        name: Span,
        attributes: Vec<AttributeSpans>,
        self_closing: bool,
        namespace: Namespace,
    },
    EndTag {
        span: Span,
        name: Span,
    },
    Comment {
        span: Span,
        text: Span,
    },
    Doctype {
        span: Span,
        name: Option<Span>,
        public_id: Option<Span>,
        system_id: Option<Span>,
        force_quirks: bool,
    },
    /// Bytes that form no token, such as `</>` or the delimiters of a CDATA
    /// section. They are copied to the output unless they sit inside
    /// removed content.
    Passthrough { span: Span },
}

impl Lexeme {
    pub(crate) fn span(&self) -> Span {
        match self {
            Lexeme::Text { span, .. }
            | Lexeme::StartTag { span, .. }
            | Lexeme::EndTag { span, .. }
            | Lexeme::Comment { span, .. }
            | Lexeme::Doctype { span, .. }
            | Lexeme::Passthrough { span } => *span,
        }
    }
}

/// Outcome of looking at a `<`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum MarkupStart {
    Markup,
    Text,
    NeedMoreInput,
}

pub(crate) struct Tokenizer {
    encoding: AsciiCompatibleEncoding,
    text_type: TextType,
    /// Lowercase name of the element whose end tag terminates raw text.
    raw_text_owner: Option<Box<[u8]>>,
    /// A text node has emitted chunks but has not ended yet.
    text_open: bool,
    namespaces: NamespaceStack,
}

impl Tokenizer {
    pub(crate) fn new(encoding: AsciiCompatibleEncoding) -> Self {
        Self {
            encoding,
            text_type: TextType::Data,
            raw_text_owner: None,
            text_open: false,
            namespaces: NamespaceStack::default(),
        }
    }

    /// Number of SVG, MathML and integration point namespaces entered.
    pub(crate) fn namespace_depth(&self) -> usize {
        self.namespaces.depth()
    }

    /// Lex the next lexeme starting at `pos`.
    ///
    /// Returns `None` when the bytes from `pos` on can't be resolved without
    /// more input; they must be passed again, followed by new bytes, on the
    /// next call. With `eof` set everything resolves.
    pub(crate) fn next_lexeme(&mut self, bytes: &[u8], pos: usize, eof: bool) -> Option<Lexeme> {
        let lexeme = self.lex(bytes, pos, eof)?;
        #[cfg(any(test, feature = "debug-trace"))]
        log::trace!(
            target: "rewriter.tokenizer",
            "lexeme {:?} next_text_type={:?}",
            lexeme,
            self.text_type
        );
        Some(lexeme)
    }

    fn lex(&mut self, bytes: &[u8], pos: usize, eof: bool) -> Option<Lexeme> {
        if pos == bytes.len() {
            return (eof && self.text_open).then(|| self.close_text_node(pos));
        }

        let markup = match self.text_type {
            TextType::Data if bytes[pos] == b'<' => markup_start(bytes, pos, eof),
            TextType::RcData | TextType::RawText | TextType::ScriptData if bytes[pos] == b'<' => {
                let owner = self.raw_text_owner.as_deref().unwrap_or_default();
                text::raw_text_end_at(bytes, pos, owner, eof)
            }
            TextType::CDataSection if bytes[pos] == b']' => text::cdata_end_at(bytes, pos, eof),
            _ => MarkupStart::Text,
        };

        match markup {
            MarkupStart::NeedMoreInput => None,
            MarkupStart::Markup if self.text_open => Some(self.close_text_node(pos)),
            MarkupStart::Markup if self.text_type == TextType::CDataSection => {
                self.text_type = TextType::Data;
                Some(Lexeme::Passthrough {
                    span: Span::new(pos, pos + text::CDATA_END.len()),
                })
            }
            MarkupStart::Markup => self.lex_markup(bytes, pos, eof),
            MarkupStart::Text => self.lex_text(bytes, pos, eof),
        }
    }

    fn close_text_node(&mut self, pos: usize) -> Lexeme {
        self.text_open = false;
        Lexeme::Text {
            span: Span::new(pos, pos),
            text_type: self.text_type,
            last_in_text_node: true,
        }
    }

    fn lex_text(&mut self, bytes: &[u8], pos: usize, eof: bool) -> Option<Lexeme> {
        let owner = self.raw_text_owner.as_deref().unwrap_or_default();
        let run = text::scan_text(bytes, pos, self.text_type, owner, eof);

        if run.node_ended {
            self.text_open = false;
            return Some(Lexeme::Text {
                span: Span::new(pos, run.end),
                text_type: self.text_type,
                last_in_text_node: true,
            });
        }

        let end = if run.end == bytes.len() {
            run.end - self.encoding.incomplete_suffix_len(&bytes[pos..run.end])
        } else {
            run.end
        };
        if end == pos {
            return None;
        }
        self.text_open = true;
        Some(Lexeme::Text {
            span: Span::new(pos, end),
            text_type: self.text_type,
            last_in_text_node: false,
        })
    }

    fn lex_markup(&mut self, bytes: &[u8], pos: usize, eof: bool) -> Option<Lexeme> {
        match bytes[pos + 1] {
            b'/' => {
                let after = bytes[pos + 2];
                if after.is_ascii_alphabetic() {
                    let scan = tag::scan_tag(bytes, pos + 2, eof)?;
                    self.text_type = TextType::Data;
                    self.raw_text_owner = None;
                    self.namespaces
                        .end_tag(&names::to_ascii_lowercase(&bytes[scan.name.range()]));
                    Some(Lexeme::EndTag {
                        span: Span::new(pos, scan.end),
                        name: scan.name,
                    })
                } else if after == b'>' {
                    Some(Lexeme::Passthrough {
                        span: Span::new(pos, pos + 3),
                    })
                } else {
                    markup::scan_bogus_comment(bytes, pos, pos + 2, eof)
                }
            }
            b'!' if self.namespaces.current() != Namespace::Html => {
                if markup::is_cdata_start(bytes, pos, eof)? {
                    self.text_type = TextType::CDataSection;
                    return Some(Lexeme::Passthrough {
                        span: Span::new(pos, pos + markup::CDATA_START.len()),
                    });
                }
                markup::scan_declaration(bytes, pos, eof)
            }
            b'!' => markup::scan_declaration(bytes, pos, eof),
            b'?' => markup::scan_bogus_comment(bytes, pos, pos + 1, eof),
            _ => {
                let scan = tag::scan_tag(bytes, pos + 1, eof)?;
                let local_name = names::to_ascii_lowercase(&bytes[scan.name.range()]);
                let attribute = |name: &[u8]| {
                    scan.attributes
                        .iter()
                        .find(|attr| bytes[attr.name.range()].eq_ignore_ascii_case(name))
                        .map(|attr| &bytes[attr.value.range()])
                };
                let namespace = self
                    .namespaces
                    .start_tag(&local_name, scan.self_closing, attribute);
                self.text_type = match namespace {
                    Namespace::Html => names::text_type_after_start_tag(&local_name),
                    Namespace::Svg | Namespace::MathMl => TextType::Data,
                };
                self.raw_text_owner = (self.text_type != TextType::Data).then_some(local_name);
                Some(Lexeme::StartTag {
                    span: Span::new(pos, scan.end),
                    name: scan.name,
                    attributes: scan.attributes,
                    self_closing: scan.self_closing,
                    namespace,
                })
            }
        }
    }
}

/// Decide whether the `<` at `pos` opens markup in the data state.
fn markup_start(bytes: &[u8], pos: usize, eof: bool) -> MarkupStart {
    let pending = if eof {
        MarkupStart::Text
    } else {
        MarkupStart::NeedMoreInput
    };
    match bytes.get(pos + 1) {
        None => pending,
        Some(b'/') if bytes.len() == pos + 2 => pending,
        Some(b) if b.is_ascii_alphabetic() || matches!(b, b'/' | b'!' | b'?') => MarkupStart::Markup,
        Some(_) => MarkupStart::Text,
    }
}

pub(crate) fn is_html_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | b'\x0C')
}

//! Streaming, selector-driven HTML rewriting.
//!
//! The document is fed to an [`HtmlRewriter`] in chunks of any size. Start
//! tags are matched against CSS selectors as they arrive, and registered
//! handlers can inspect and change elements, text, comments and doctypes.
//! Everything a handler leaves untouched is copied to the output byte for
//! byte.

mod buffer;
mod dispatch;
mod rewriter;
mod selectors;
mod serializer;
mod shared;
mod tokenizer;
mod units;

pub use dispatch::{
    CommentHandler, DoctypeHandler, DocumentContentHandlers, ElementContentHandlers,
    ElementHandler, EndHandler, EndTagHandler, TextHandler,
};
pub use rewriter::{HtmlRewriter, RewriterConfig, rewrite_str};
pub use selectors::Selector;
pub use serializer::OutputSink;
pub use shared::{
    AsciiCompatibleEncoding, AttributeNameError, CommentTextError, EncodingError, EndTagError,
    HandlerError, HandlerResult, LimitError, RewritingError, SelectorError, Span, StateError,
    TagNameError,
};
pub use tokenizer::TextType;
pub use units::{Attribute, Comment, ContentType, Doctype, DocumentEnd, Element, EndTag, TextChunk};

/// Re-exported so callers can build an [`AsciiCompatibleEncoding`] from an
/// `encoding_rs` encoding.
pub use encoding_rs;

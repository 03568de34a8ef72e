//! Error types surfaced by the rewriter and its handles.

use thiserror::Error;

/// Error returned by a content handler. Any error type can be boxed into it.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Result type of every content handler.
pub type HandlerResult = Result<(), HandlerError>;

/// Misuse of the rewriter session lifecycle.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StateError {
    #[error("data was written after the end of the document")]
    WriteAfterEnd,
    #[error("the end of the document was signalled more than once")]
    EndCalledTwice,
    #[error("handlers must be registered before the first write")]
    RegistrationAfterWrite,
    #[error("the rewriter was aborted by an earlier error")]
    Aborted,
}

/// Selector parse errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("unexpected token in selector")]
    UnexpectedToken,
    #[error("unexpected end of selector")]
    UnexpectedEnd,
    #[error("missing attribute name in attribute selector")]
    MissingAttributeName,
    #[error("the selector is empty")]
    EmptySelector,
    #[error("a combinator is not followed by a selector")]
    DanglingCombinator,
    #[error("unexpected token in attribute selector")]
    UnexpectedTokenInAttribute,
    #[error("unsupported pseudo-class or pseudo-element")]
    UnsupportedPseudoClassOrElement,
    #[error("nested negation pseudo-classes are not supported")]
    NestedNegation,
    #[error("namespaced selectors are not supported")]
    NamespacedSelector,
    #[error("invalid class name")]
    InvalidClassName,
    #[error("empty negation pseudo-class")]
    EmptyNegation,
    #[error("unsupported combinator `{0}`")]
    UnsupportedCombinator(char),
    #[error("unsupported selector syntax")]
    UnsupportedSyntax,
}

/// Errors configuring the document encoding.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("unknown character encoding `{0}`")]
    UnknownEncoding(String),
    #[error("encoding `{0}` is not ASCII-compatible")]
    NonAsciiCompatibleEncoding(&'static str),
}

/// Resource limits configured in [`crate::RewriterConfig`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum LimitError {
    #[error("buffered input exceeded the limit of {limit} bytes")]
    BufferCapacityExceeded { limit: usize },
    #[error("element nesting exceeded the limit of {limit} open elements")]
    MaxNestingReached { limit: usize },
}

/// Top-level error of a rewriting session.
#[derive(Debug, Error)]
pub enum RewritingError {
    #[error(transparent)]
    State(#[from] StateError),
    #[error("invalid selector: {0}")]
    Selector(#[from] SelectorError),
    #[error("content handler error: {0}")]
    ContentHandler(#[source] HandlerError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Limit(#[from] LimitError),
}

/// Invalid attribute name passed to [`crate::Element::set_attribute`].
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AttributeNameError {
    #[error("attribute name can't be empty")]
    Empty,
    #[error("`{0}` character is forbidden in attribute names")]
    ForbiddenCharacter(char),
    #[error("the attribute name contains a character that can't be represented in the document encoding")]
    UnencodableCharacter,
}

/// Invalid tag name passed to a renaming operation.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TagNameError {
    #[error("tag name can't be empty")]
    Empty,
    #[error("first character of a tag name should be an ASCII alphabetical character")]
    InvalidFirstCharacter,
    #[error("`{0}` character is forbidden in tag names")]
    ForbiddenCharacter(char),
    #[error("the tag name contains a character that can't be represented in the document encoding")]
    UnencodableCharacter,
}

/// Invalid replacement text for a comment.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum CommentTextError {
    #[error("comment text contains a sequence that would close the comment early, like `-->` or `--!>`")]
    CommentClosingSequence,
    #[error("the comment text contains a character that can't be represented in the document encoding")]
    UnencodableCharacter,
}

/// End-tag callbacks registered on elements that never have an end tag.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum EndTagError {
    #[error("void and self-closing elements have no end tag")]
    NoEndTag,
}

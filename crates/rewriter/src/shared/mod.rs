pub mod encoding;
pub mod error;
pub(crate) mod names;
pub mod span;

pub use encoding::AsciiCompatibleEncoding;
pub use error::{
    AttributeNameError, CommentTextError, EncodingError, EndTagError, HandlerError, HandlerResult,
    LimitError, RewritingError, SelectorError, StateError, TagNameError,
};
pub use span::Span;

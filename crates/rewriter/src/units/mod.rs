//! Handles passed to content handlers.
//!
//! Every handle borrows the token it describes for the duration of a single
//! handler call. Changes are recorded on the token and serialized once all
//! handlers for it have run.

mod attributes;
mod comment;
mod doctype;
mod document_end;
mod element;
mod end_tag;
mod mutations;
mod start_tag;
mod text_chunk;

pub use attributes::Attribute;
pub use comment::Comment;
pub use doctype::Doctype;
pub use document_end::DocumentEnd;
pub use element::Element;
pub use end_tag::EndTag;
pub use mutations::ContentType;
pub use text_chunk::TextChunk;

pub(crate) use attributes::Attributes;
pub(crate) use element::ElementState;
pub(crate) use mutations::Mutations;
pub(crate) use start_tag::StartTag;

use crate::shared::{AsciiCompatibleEncoding, TagNameError};
use crate::tokenizer::is_html_whitespace;

/// Validate and encode a new tag name.
pub(crate) fn encode_tag_name(
    name: &str,
    encoding: AsciiCompatibleEncoding,
) -> Result<Vec<u8>, TagNameError> {
    let first = name.chars().next().ok_or(TagNameError::Empty)?;
    if !first.is_ascii_alphabetic() {
        return Err(TagNameError::InvalidFirstCharacter);
    }
    if let Some(ch) = name
        .chars()
        .find(|&ch| (ch.is_ascii() && is_html_whitespace(ch as u8)) || matches!(ch, '/' | '>'))
    {
        return Err(TagNameError::ForbiddenCharacter(ch));
    }
    encoding
        .encode_strict(name)
        .ok_or(TagNameError::UnencodableCharacter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_names_are_validated() {
        let utf8 = AsciiCompatibleEncoding::utf_8();
        assert_eq!(encode_tag_name("Section", utf8), Ok(b"Section".to_vec()));
        assert_eq!(encode_tag_name("", utf8), Err(TagNameError::Empty));
        assert_eq!(
            encode_tag_name("1a", utf8),
            Err(TagNameError::InvalidFirstCharacter)
        );
        assert_eq!(
            encode_tag_name("a/b", utf8),
            Err(TagNameError::ForbiddenCharacter('/'))
        );
        let latin = AsciiCompatibleEncoding::from_label("windows-1252").expect("known label");
        assert_eq!(
            encode_tag_name("x\u{4e2d}", latin),
            Err(TagNameError::UnencodableCharacter)
        );
    }
}

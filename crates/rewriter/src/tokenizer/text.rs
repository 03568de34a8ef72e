//! Text runs, raw-text end tag and CDATA section end detection.

use memchr::memchr;

use super::{MarkupStart, TextType, is_html_whitespace, markup_start};

pub(super) const CDATA_END: &[u8] = b"]]>";

/// Extent of a text run starting at some position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct TextRun {
    pub(super) end: usize,
    /// The text node ends at `end` (markup follows, or the stream ended).
    /// Otherwise the run stopped because more input is needed.
    pub(super) node_ended: bool,
}

pub(super) fn scan_text(
    bytes: &[u8],
    pos: usize,
    text_type: TextType,
    raw_text_owner: &[u8],
    eof: bool,
) -> TextRun {
    let until_end = TextRun {
        end: bytes.len(),
        node_ended: eof,
    };
    if text_type == TextType::PlainText {
        return until_end;
    }

    let delimiter = match text_type {
        TextType::CDataSection => b']',
        _ => b'<',
    };
    let mut from = pos;
    while let Some(rel) = memchr(delimiter, &bytes[from..]) {
        let at = from + rel;
        let start = match text_type {
            TextType::Data => markup_start(bytes, at, eof),
            TextType::CDataSection => cdata_end_at(bytes, at, eof),
            _ => raw_text_end_at(bytes, at, raw_text_owner, eof),
        };
        match start {
            MarkupStart::Markup => {
                return TextRun {
                    end: at,
                    node_ended: true,
                };
            }
            MarkupStart::NeedMoreInput => {
                return TextRun {
                    end: at,
                    node_ended: false,
                };
            }
            MarkupStart::Text => from = at + 1,
        }
    }
    until_end
}

/// Whether the `]` at `pos` starts the `]]>` that ends a CDATA section.
pub(super) fn cdata_end_at(bytes: &[u8], pos: usize, eof: bool) -> MarkupStart {
    let candidate = &bytes[pos..];
    if candidate.starts_with(CDATA_END) {
        MarkupStart::Markup
    } else if !eof && CDATA_END.starts_with(candidate) {
        MarkupStart::NeedMoreInput
    } else {
        MarkupStart::Text
    }
}

/// Whether the `<` at `pos` starts the end tag that terminates raw text:
/// `</` + owner name (ASCII case-insensitive) + whitespace, `/` or `>`.
pub(super) fn raw_text_end_at(
    bytes: &[u8],
    pos: usize,
    owner: &[u8],
    eof: bool,
) -> MarkupStart {
    let pending = if eof {
        MarkupStart::Text
    } else {
        MarkupStart::NeedMoreInput
    };
    let candidate = &bytes[pos..];
    let expected_len = owner.len() + 2;

    let prefix_len = candidate.len().min(expected_len);
    let prefix_matches = candidate[..prefix_len]
        .iter()
        .enumerate()
        .all(|(i, byte)| match i {
            0 => *byte == b'<',
            1 => *byte == b'/',
            _ => byte.eq_ignore_ascii_case(&owner[i - 2]),
        });
    if !prefix_matches {
        return MarkupStart::Text;
    }

    match candidate.get(expected_len) {
        None => pending,
        Some(&byte) if is_html_whitespace(byte) || byte == b'/' || byte == b'>' => {
            MarkupStart::Markup
        }
        Some(_) => MarkupStart::Text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_text_end_requires_delimiter() {
        assert_eq!(
            raw_text_end_at(b"</script>", 0, b"script", false),
            MarkupStart::Markup
        );
        assert_eq!(
            raw_text_end_at(b"</SCRIPT ", 0, b"script", false),
            MarkupStart::Markup
        );
        assert_eq!(
            raw_text_end_at(b"</scripts>", 0, b"script", false),
            MarkupStart::Text
        );
        assert_eq!(
            raw_text_end_at(b"</scr", 0, b"script", false),
            MarkupStart::NeedMoreInput
        );
        assert_eq!(
            raw_text_end_at(b"</script", 0, b"script", true),
            MarkupStart::Text
        );
        assert_eq!(raw_text_end_at(b"</div>", 0, b"script", false), MarkupStart::Text);
    }

    #[test]
    fn cdata_sections_end_at_double_bracket() {
        let run = scan_text(b"a<b]]]>c", 0, TextType::CDataSection, b"", false);
        assert_eq!(
            run,
            TextRun {
                end: 4,
                node_ended: true
            }
        );
        let run = scan_text(b"x]]", 0, TextType::CDataSection, b"", false);
        assert_eq!(
            run,
            TextRun {
                end: 1,
                node_ended: false
            }
        );
        assert_eq!(cdata_end_at(b"]]", 0, true), MarkupStart::Text);
        assert_eq!(cdata_end_at(b"]x", 0, false), MarkupStart::Text);
    }

    #[test]
    fn data_text_skips_non_markup_lt() {
        let run = scan_text(b"a < b <3 <p>", 0, TextType::Data, b"", false);
        assert_eq!(
            run,
            TextRun {
                end: 9,
                node_ended: true
            }
        );
    }

    #[test]
    fn trailing_lt_waits_for_input() {
        let run = scan_text(b"abc<", 0, TextType::Data, b"", false);
        assert_eq!(
            run,
            TextRun {
                end: 3,
                node_ended: false
            }
        );
        let run = scan_text(b"abc<", 0, TextType::Data, b"", true);
        assert_eq!(
            run,
            TextRun {
                end: 4,
                node_ended: true
            }
        );
    }
}

//! Start and end tag scanning.
//!
//! Follows the HTML tag and attribute states leniently: attribute names may
//! start with `=`, values may be double-quoted, single-quoted, unquoted or
//! missing, and a `/` that is not followed by `>` is skipped.

use memchr::memchr;

use super::{AttributeSpans, is_html_whitespace};
use crate::shared::Span;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) struct TagScan {
    /// Offset just past the tag.
    pub(super) end: usize,
    pub(super) name: Span,
    pub(super) attributes: Vec<AttributeSpans>,
    pub(super) self_closing: bool,
}

struct TagScanner<'b> {
    bytes: &'b [u8],
    pos: usize,
    eof: bool,
    name: Span,
    attributes: Vec<AttributeSpans>,
}

impl TagScanner<'_> {
    fn finish(self, end: usize, self_closing: bool) -> Option<TagScan> {
        Some(TagScan {
            end,
            name: self.name,
            attributes: self.attributes,
            self_closing,
        })
    }

    /// Input ran out inside the tag: resolve at end of stream, otherwise wait.
    fn out_of_input(self) -> Option<TagScan> {
        if self.eof {
            let end = self.bytes.len();
            self.finish(end, false)
        } else {
            None
        }
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && is_html_whitespace(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }

    fn push_attribute(&mut self, name: Span, value: Span, raw_end: usize) {
        self.attributes.push(AttributeSpans {
            name,
            value,
            raw: Span::new(name.start, raw_end),
        });
    }
}

/// Scan a tag whose name starts at `name_start` (just past `<` or `</`).
pub(super) fn scan_tag(bytes: &[u8], name_start: usize, eof: bool) -> Option<TagScan> {
    let len = bytes.len();
    let mut name_end = name_start;
    while name_end < len && !is_tag_name_end(bytes[name_end]) {
        name_end += 1;
    }

    let mut scanner = TagScanner {
        bytes,
        pos: name_end,
        eof,
        name: Span::new(name_start, name_end),
        attributes: Vec::new(),
    };

    loop {
        scanner.skip_whitespace();
        let Some(&byte) = bytes.get(scanner.pos) else {
            return scanner.out_of_input();
        };
        match byte {
            b'>' => {
                let end = scanner.pos + 1;
                return scanner.finish(end, false);
            }
            b'/' => match bytes.get(scanner.pos + 1) {
                Some(b'>') => {
                    let end = scanner.pos + 2;
                    return scanner.finish(end, true);
                }
                Some(_) => {
                    scanner.pos += 1;
                    continue;
                }
                None => return scanner.out_of_input(),
            },
            _ => {}
        }

        // The first name byte is taken as is, which lets names start with `=`.
        let attr_start = scanner.pos;
        let mut attr_end = attr_start + 1;
        while attr_end < len && !is_attribute_name_end(bytes[attr_end]) {
            attr_end += 1;
        }
        let name = Span::new(attr_start, attr_end);
        let no_value = Span::new(attr_end, attr_end);

        scanner.pos = attr_end;
        scanner.skip_whitespace();
        if scanner.pos == len {
            if eof {
                scanner.push_attribute(name, no_value, attr_end);
            }
            return scanner.out_of_input();
        }
        if bytes[scanner.pos] != b'=' {
            scanner.push_attribute(name, no_value, attr_end);
            continue;
        }

        scanner.pos += 1;
        scanner.skip_whitespace();
        let Some(&first) = bytes.get(scanner.pos) else {
            if eof {
                scanner.push_attribute(name, Span::new(len, len), len);
            }
            return scanner.out_of_input();
        };

        match first {
            b'"' | b'\'' => {
                let value_start = scanner.pos + 1;
                match memchr(first, &bytes[value_start..]) {
                    Some(rel) => {
                        let value_end = value_start + rel;
                        scanner.push_attribute(name, Span::new(value_start, value_end), value_end + 1);
                        scanner.pos = value_end + 1;
                    }
                    None => {
                        if eof {
                            scanner.push_attribute(name, Span::new(value_start, len), len);
                        }
                        return scanner.out_of_input();
                    }
                }
            }
            b'>' => {
                // `name=>`: the value is missing, the `>` closes the tag.
                let at = scanner.pos;
                scanner.push_attribute(name, Span::new(at, at), at);
            }
            _ => {
                let value_start = scanner.pos;
                let mut value_end = value_start;
                while value_end < len
                    && !is_html_whitespace(bytes[value_end])
                    && bytes[value_end] != b'>'
                {
                    value_end += 1;
                }
                if value_end == len && !eof {
                    return None;
                }
                scanner.push_attribute(name, Span::new(value_start, value_end), value_end);
                scanner.pos = value_end;
            }
        }
    }
}

fn is_tag_name_end(byte: u8) -> bool {
    is_html_whitespace(byte) || byte == b'/' || byte == b'>'
}

fn is_attribute_name_end(byte: u8) -> bool {
    is_tag_name_end(byte) || byte == b'='
}

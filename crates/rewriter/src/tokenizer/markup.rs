//! Comments, bogus comments, doctypes and CDATA section starts.

use memchr::{memchr, memmem};

use super::{Lexeme, is_html_whitespace};
use crate::shared::Span;

const DOCTYPE: &[u8] = b"doctype";

pub(super) const CDATA_START: &[u8] = b"<![CDATA[";

/// Whether `<![CDATA[` (case-sensitive) starts at `pos`. `None` while the
/// buffered bytes are a strict prefix of it.
pub(super) fn is_cdata_start(bytes: &[u8], pos: usize, eof: bool) -> Option<bool> {
    let candidate = &bytes[pos..];
    if candidate.starts_with(CDATA_START) {
        Some(true)
    } else if !eof && CDATA_START.starts_with(candidate) {
        None
    } else {
        Some(false)
    }
}

/// Scan markup starting with `<!` at `pos`.
pub(super) fn scan_declaration(bytes: &[u8], pos: usize, eof: bool) -> Option<Lexeme> {
    let rest = &bytes[pos + 2..];
    if rest.starts_with(b"--") {
        return scan_comment(bytes, pos, eof);
    }
    if starts_with_ignore_ascii_case(rest, DOCTYPE) {
        return scan_doctype(bytes, pos, eof);
    }
    let may_grow_into = |keyword: &[u8]| {
        rest.len() < keyword.len() && starts_with_ignore_ascii_case(keyword, rest)
    };
    if !eof && (may_grow_into(b"--") || may_grow_into(DOCTYPE)) {
        return None;
    }
    scan_bogus_comment(bytes, pos, pos + 2, eof)
}

/// `<!--` ... `-->`, also closed by `--!>`. `<!-->` and `<!--->` are empty
/// comments.
fn scan_comment(bytes: &[u8], pos: usize, eof: bool) -> Option<Lexeme> {
    let len = bytes.len();
    let body = pos + 4;
    let comment = |text_end: usize, end: usize| Lexeme::Comment {
        span: Span::new(pos, end),
        text: Span::new(body, text_end),
    };

    match (bytes.get(body), bytes.get(body + 1)) {
        (Some(b'>'), _) => return Some(comment(body, body + 1)),
        (Some(b'-'), Some(b'>')) => return Some(comment(body, body + 2)),
        (None, _) | (Some(b'-'), None) if !eof => return None,
        _ => {}
    }

    let mut from = body;
    while let Some(rel) = memmem::find(&bytes[from..], b"--") {
        let dashes = from + rel;
        match (bytes.get(dashes + 2), bytes.get(dashes + 3)) {
            (Some(b'>'), _) => return Some(comment(dashes, dashes + 3)),
            (Some(b'!'), Some(b'>')) => return Some(comment(dashes, dashes + 4)),
            (None, _) | (Some(b'!'), None) => break,
            _ => from = dashes + 1,
        }
    }

    eof.then(|| comment(len, len))
}

/// Everything from `text_start` up to the next `>` is comment text.
pub(super) fn scan_bogus_comment(
    bytes: &[u8],
    pos: usize,
    text_start: usize,
    eof: bool,
) -> Option<Lexeme> {
    let len = bytes.len();
    match memchr(b'>', &bytes[text_start..]) {
        Some(rel) => Some(Lexeme::Comment {
            span: Span::new(pos, text_start + rel + 1),
            text: Span::new(text_start, text_start + rel),
        }),
        None => eof.then(|| Lexeme::Comment {
            span: Span::new(pos, len),
            text: Span::new(text_start, len),
        }),
    }
}

fn scan_doctype(bytes: &[u8], pos: usize, eof: bool) -> Option<Lexeme> {
    let body = pos + 2 + DOCTYPE.len();
    let (stop, end, terminated) = match memchr(b'>', &bytes[body..]) {
        Some(rel) => (body + rel, body + rel + 1, true),
        None if eof => (bytes.len(), bytes.len(), false),
        None => return None,
    };

    let mut fields = DoctypeFields {
        bytes,
        pos: body,
        stop,
        force_quirks: !terminated,
    };
    fields.skip_whitespace();
    let name = fields.word();
    fields.skip_whitespace();

    let (mut public_id, mut system_id) = (None, None);
    if fields.keyword(b"public") {
        fields.skip_whitespace();
        public_id = fields.quoted();
        fields.skip_whitespace();
        system_id = fields.quoted();
    } else if fields.keyword(b"system") {
        fields.skip_whitespace();
        system_id = fields.quoted();
    }

    Some(Lexeme::Doctype {
        span: Span::new(pos, end),
        force_quirks: fields.force_quirks || name.is_none(),
        name,
        public_id,
        system_id,
    })
}

struct DoctypeFields<'b> {
    bytes: &'b [u8],
    pos: usize,
    stop: usize,
    force_quirks: bool,
}

impl DoctypeFields<'_> {
    fn skip_whitespace(&mut self) {
        while self.pos < self.stop && is_html_whitespace(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }

    fn word(&mut self) -> Option<Span> {
        let start = self.pos;
        while self.pos < self.stop && !is_html_whitespace(self.bytes[self.pos]) {
            self.pos += 1;
        }
        (self.pos > start).then(|| Span::new(start, self.pos))
    }

    fn keyword(&mut self, keyword: &[u8]) -> bool {
        let matched = starts_with_ignore_ascii_case(&self.bytes[self.pos..self.stop], keyword);
        if matched {
            self.pos += keyword.len();
        }
        matched
    }

    fn quoted(&mut self) -> Option<Span> {
        let quote = *self.bytes.get(self.pos).filter(|_| self.pos < self.stop)?;
        if quote != b'"' && quote != b'\'' {
            self.force_quirks = true;
            return None;
        }
        let start = self.pos + 1;
        match memchr(quote, &self.bytes[start..self.stop]) {
            Some(rel) => {
                self.pos = start + rel + 1;
                Some(Span::new(start, start + rel))
            }
            None => {
                self.force_quirks = true;
                self.pos = self.stop;
                Some(Span::new(start, self.stop))
            }
        }
    }
}

fn starts_with_ignore_ascii_case(haystack: &[u8], prefix: &[u8]) -> bool {
    haystack.len() >= prefix.len() && haystack[..prefix.len()].eq_ignore_ascii_case(prefix)
}

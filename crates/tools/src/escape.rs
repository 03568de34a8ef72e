//! HTML escaping for inserted content.

use std::borrow::Cow;

/// Escape `&`, `<` and `>` so `text` is inserted as character data.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.bytes().any(|b| matches!(b, b'&' | b'<' | b'>')) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Append an attribute value for a double-quoted context, escaping `"`.
///
/// Works on encoded bytes: every ASCII-compatible encoding keeps `"` as
/// the single byte 0x22.
pub fn push_double_quoted_value(out: &mut Vec<u8>, value: &[u8]) {
    let mut rest = value;
    while let Some(pos) = rest.iter().position(|&b| b == b'"') {
        out.extend_from_slice(&rest[..pos]);
        out.extend_from_slice(b"&quot;");
        rest = &rest[pos + 1..];
    }
    out.extend_from_slice(rest);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_specials_is_borrowed() {
        assert!(matches!(escape_text("plain"), Cow::Borrowed("plain")));
    }

    #[test]
    fn text_escapes_markup_characters() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_text("\"quotes\" stay"), "\"quotes\" stay");
    }

    #[test]
    fn attribute_value_escapes_only_double_quote() {
        let mut out = Vec::new();
        push_double_quoted_value(&mut out, b"say \"hi\" & <bye>");
        assert_eq!(out, b"say &quot;hi&quot; & <bye>");
    }
}

//! Tag-name classification tables.
//!
//! All lookups take lowercase local names.

use crate::tokenizer::TextType;

const VOID_ELEMENTS: &[&[u8]] = &[
    b"area", b"base", b"basefont", b"bgsound", b"br", b"col", b"embed", b"frame", b"hr", b"img",
    b"input", b"keygen", b"link", b"meta", b"param", b"source", b"track", b"wbr",
];

/// Start tags that close an open `p` element.
const CLOSES_P: &[&[u8]] = &[
    b"address", b"article", b"aside", b"blockquote", b"details", b"div", b"dl", b"fieldset",
    b"figcaption", b"figure", b"footer", b"form", b"h1", b"h2", b"h3", b"h4", b"h5", b"h6",
    b"header", b"hgroup", b"hr", b"main", b"menu", b"nav", b"ol", b"p", b"pre", b"section",
    b"table", b"ul",
];

/// Start tags that leave SVG or MathML content.
const BREAKS_OUT_OF_FOREIGN_CONTENT: &[&[u8]] = &[
    b"b", b"big", b"blockquote", b"body", b"br", b"center", b"code", b"dd", b"div", b"dl", b"dt",
    b"em", b"embed", b"h1", b"h2", b"h3", b"h4", b"h5", b"h6", b"head", b"hr", b"i", b"img",
    b"li", b"listing", b"menu", b"meta", b"nobr", b"ol", b"p", b"pre", b"ruby", b"s", b"small",
    b"span", b"strong", b"strike", b"sub", b"sup", b"table", b"tt", b"u", b"ul", b"var",
];

/// A `font` start tag with one of these attributes also leaves foreign
/// content.
pub(crate) const FONT_BREAKOUT_ATTRIBUTES: &[&[u8]] = &[b"color", b"face", b"size"];

pub(crate) fn to_ascii_lowercase(name: &[u8]) -> Box<[u8]> {
    name.to_ascii_lowercase().into_boxed_slice()
}

pub(crate) fn is_void_element(name: &[u8]) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// Text mode the tokenizer enters after a start tag with this name.
pub(crate) fn text_type_after_start_tag(name: &[u8]) -> TextType {
    match name {
        b"script" => TextType::ScriptData,
        b"style" | b"xmp" | b"iframe" | b"noembed" | b"noframes" | b"noscript" => {
            TextType::RawText
        }
        b"textarea" | b"title" => TextType::RcData,
        b"plaintext" => TextType::PlainText,
        _ => TextType::Data,
    }
}

pub(crate) fn breaks_out_of_foreign_content(name: &[u8]) -> bool {
    BREAKS_OUT_OF_FOREIGN_CONTENT.contains(&name)
}

/// SVG elements whose content is HTML.
pub(crate) fn is_svg_html_integration_point(name: &[u8]) -> bool {
    matches!(name, b"desc" | b"title" | b"foreignobject")
}

/// MathML elements whose content is HTML.
pub(crate) fn is_mathml_text_integration_point(name: &[u8]) -> bool {
    matches!(name, b"mi" | b"mo" | b"mn" | b"ms" | b"mtext")
}

/// Whether the start tag `incoming` implicitly closes the current element
/// `open`.
pub(crate) fn implicitly_closes(open: &[u8], incoming: &[u8]) -> bool {
    match open {
        b"p" => CLOSES_P.contains(&incoming),
        b"li" => incoming == b"li",
        b"dt" | b"dd" => matches!(incoming, b"dt" | b"dd"),
        b"option" => matches!(incoming, b"option" | b"optgroup"),
        b"optgroup" => incoming == b"optgroup",
        b"tr" => incoming == b"tr",
        b"td" | b"th" => matches!(incoming, b"td" | b"th" | b"tr"),
        _ => false,
    }
}

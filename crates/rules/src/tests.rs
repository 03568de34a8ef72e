use std::cell::RefCell;

use pretty_assertions::assert_eq;
use rewriter::SelectorError;

use super::*;
use crate::action::TextReplacer;

fn rules(source: &str) -> RuleSet {
    RuleSet::from_toml_str(source).expect("valid rule set")
}

#[test]
fn parses_every_action() {
    let set = rules(
        r#"
max_nesting_depth = 64

[[rule]]
selector = "a"
action = "set_attribute"
name = "rel"
value = "noopener"

[[rule]]
selector = "a"
action = "remove_attribute"
name = "target"

[[rule]]
selector = "a"
action = "replace_in_attribute"
attribute = "href"
from = "http:"
to = "https:"

[[rule]]
selector = "b"
action = "set_tag_name"
name = "strong"

[[rule]]
selector = "p"
action = "before"
content = "<hr>"

[[rule]]
selector = "p"
action = "after"
content = "<br>"

[[rule]]
selector = "p"
action = "prepend"
content = "1 < 2"
content_type = "text"

[[rule]]
selector = "p"
action = "append"
content = "."

[[rule]]
selector = "div"
action = "set_inner_content"
content = "x"

[[rule]]
selector = "img"
action = "replace"
content = "[img]"

[[rule]]
selector = "script"
action = "remove"

[[rule]]
selector = "font"
action = "remove_and_keep_content"

[[rule]]
action = "replace_text"
from = "foo"
to = "bar"

[[rule]]
selector = "main"
action = "remove_comments"
"#,
    );
    assert_eq!(set.len(), 14);
    assert_eq!(set.config().max_nesting_depth, 64);
    assert_eq!(set.encoding().name(), "UTF-8");
}

#[test]
fn rejects_invalid_rules() {
    let missing = RuleSet::from_toml_str("[[rule]]\naction = \"remove\"\n");
    assert!(matches!(
        missing,
        Err(RulesError::MissingSelector {
            index: 0,
            action: "remove"
        })
    ));

    let selector = RuleSet::from_toml_str(
        "[[rule]]\naction = \"remove_comments\"\n\n[[rule]]\nselector = \"a:hover\"\naction = \"remove\"\n",
    );
    match selector {
        Err(RulesError::Selector {
            index,
            selector,
            source,
        }) => {
            assert_eq!(index, 1);
            assert_eq!(selector, "a:hover");
            assert_eq!(source, SelectorError::UnsupportedPseudoClassOrElement);
        }
        other => panic!("expected a selector error, got {other:?}"),
    }

    assert!(matches!(
        RuleSet::from_toml_str("[[rule]]\naction = \"replace_text\"\nfrom = \"\"\nto = \"x\"\n"),
        Err(RulesError::EmptyPattern { index: 0 })
    ));
    assert!(matches!(
        RuleSet::from_toml_str("encoding = \"utf-16\"\n"),
        Err(RulesError::Encoding(_))
    ));
    assert!(matches!(
        RuleSet::from_toml_str("[[rule]]\nselector = \"a\"\naction = \"explode\"\n"),
        Err(RulesError::Toml(_))
    ));
    assert!(matches!(
        RuleSet::from_toml_str("colour = \"red\"\n"),
        Err(RulesError::Toml(_))
    ));
}

#[test]
fn selectors_match_source_attributes() {
    let set = rules(
        r#"
[[rule]]
selector = "a[href]"
action = "replace_in_attribute"
attribute = "href"
from = "http:"
to = "https:"

[[rule]]
selector = "a[href^='https:']"
action = "set_attribute"
name = "rel"
value = "external"

[[rule]]
selector = "p"
action = "prepend"
content = "<&>"
content_type = "text"
"#,
    );
    let out = set
        .rewrite_str("<p><a href=http://x>x</a><a href=/y>y</a></p>")
        .expect("rewrite succeeds");
    assert_eq!(
        out,
        "<p>&lt;&amp;&gt;<a href=\"https://x\">x</a><a href=/y>y</a></p>"
    );
}

#[test]
fn text_replacement_sees_whole_text_nodes() {
    let set = rules("[[rule]]\nselector = \"p\"\naction = \"replace_text\"\nfrom = \"cat\"\nto = \"dog\"\n");
    let mut output = Vec::new();
    let mut rewriter = HtmlRewriter::new(set.config(), |chunk: &[u8]| {
        output.extend_from_slice(chunk)
    });
    set.register(&mut rewriter).expect("register");
    for chunk in ["<p>the c", "a", "t sat</p><div>cat</div>"] {
        rewriter.write(chunk.as_bytes()).expect("write");
    }
    rewriter.end().expect("end");
    drop(rewriter);
    assert_eq!(
        String::from_utf8(output).expect("utf-8 output"),
        "<p>the dog sat</p><div>cat</div>"
    );
}

#[test]
fn long_text_nodes_are_flushed_as_they_arrive() {
    let output = RefCell::new(Vec::new());
    let mut rewriter = HtmlRewriter::new(RewriterConfig::default(), |chunk: &[u8]| {
        output.borrow_mut().extend_from_slice(chunk)
    });
    let mut replacer = TextReplacer::with_limit("cat", "dog", 8);
    rewriter
        .on_document(
            DocumentContentHandlers::default().text(move |chunk| replacer.on_chunk(chunk)),
        )
        .expect("document handlers");
    rewriter.write(b"<p>").expect("write");
    for _ in 0..10 {
        rewriter.write(b"xx cat xx ").expect("write");
    }
    {
        let written = output.borrow();
        assert!(written.len() >= 3 + 100 - 8, "only {} bytes written", written.len());
        assert!(written.starts_with(b"<p>xx dog xx xx dog"));
    }
    for chunk in ["c", "a", "t</p>caca", "t"] {
        rewriter.write(chunk.as_bytes()).expect("write");
    }
    rewriter.end().expect("end");
    drop(rewriter);
    let expected = format!("<p>{}dog</p>cadog", "xx dog xx ".repeat(10));
    assert_eq!(String::from_utf8(output.into_inner()).expect("utf-8 output"), expected);
}

#[test]
fn flushed_text_keeps_multibyte_characters_whole() {
    let output = RefCell::new(Vec::new());
    let mut rewriter = HtmlRewriter::new(RewriterConfig::default(), |chunk: &[u8]| {
        output.borrow_mut().extend_from_slice(chunk)
    });
    let mut replacer = TextReplacer::with_limit("\u{e9}t\u{e9}", "summer", 4);
    rewriter
        .on_document(
            DocumentContentHandlers::default().text(move |chunk| replacer.on_chunk(chunk)),
        )
        .expect("document handlers");
    for chunk in ["un \u{e9}", "t\u{e9} \u{e0} l'\u{e9}", "t\u{e9}", " fini"] {
        rewriter.write(chunk.as_bytes()).expect("write");
    }
    rewriter.end().expect("end");
    drop(rewriter);
    assert_eq!(
        String::from_utf8(output.into_inner()).expect("utf-8 output"),
        "un summer \u{e0} l'summer fini"
    );
}

#[test]
fn document_scope_comment_removal() {
    let set = rules("[[rule]]\naction = \"remove_comments\"\n");
    let out = set
        .rewrite_str("<!-- a --><p>x<!-- b --></p>")
        .expect("rewrite succeeds");
    assert_eq!(out, "<p>x</p>");
}

#[test]
fn legacy_encoding_rule_sets() {
    let set = rules(
        "encoding = \"windows-1252\"\n\n[[rule]]\nselector = \"p\"\naction = \"append\"\ncontent = \"\u{e9}\u{4e2d}\"\n",
    );
    assert_eq!(
        set.rewrite_bytes(b"<p>caf\xE9</p>").expect("rewrite succeeds"),
        b"<p>caf\xE9\xE9&#20013;</p>".to_vec()
    );
    assert_eq!(
        set.rewrite_str("<p>caf\u{e9}</p>").expect("rewrite succeeds"),
        "<p>caf\u{e9}\u{e9}&#20013;</p>"
    );
}

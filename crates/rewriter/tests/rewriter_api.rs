mod common;

use std::cell::RefCell;

use pretty_assertions::assert_eq;
use rewriter::{
    ContentType, DocumentContentHandlers, ElementContentHandlers, HtmlRewriter, RewriterConfig,
    TextType,
};
use rewriter_test_support::deterministic_chunk_plans;

use common::{SharedSink, rewrite_chunks, rewrite_utf8};

#[test]
fn attribute_rewrite_across_chunks_with_end_tag_callback() {
    let end_tags = RefCell::new(Vec::new());
    let recorded = &end_tags;
    let out = rewrite_utf8(
        &["<div><a href=", "http://example.com>", "</a></div>"],
        |rw| {
            rw.on(
                "a[href]",
                ElementContentHandlers::default().element(move |el| {
                    let href = el.get_attribute("href").unwrap_or_default();
                    el.set_attribute("href", &href.replace("http://", "https://"))?;
                    el.on_end_tag(move |end| {
                        recorded.borrow_mut().push(end.name());
                        Ok(())
                    })?;
                    Ok(())
                }),
            )
            .expect("valid selector");
        },
    );
    assert_eq!(out, "<div><a href=\"https://example.com\"></a></div>");
    assert_eq!(end_tags.into_inner(), vec!["a".to_string()]);
}

#[test]
fn source_location_is_absolute_under_every_chunk_plan() {
    let input = "<div><a href=http://example.com></a></div>";
    for plan in deterministic_chunk_plans(input) {
        let chunks = plan.split(input);
        let out = rewrite_chunks(RewriterConfig::default(), &chunks, |rw| {
            rw.on(
                "a",
                ElementContentHandlers::default().element(|el| {
                    let start = el.source_location().start.to_string();
                    el.set_attribute("data-start", &start)?;
                    Ok(())
                }),
            )
            .expect("valid selector");
        })
        .expect("rewrite succeeds");
        assert_eq!(
            String::from_utf8(out).expect("utf-8 output"),
            "<div><a href=http://example.com data-start=\"5\"></a></div>",
            "plan {plan}"
        );
    }
}

#[test]
fn end_tag_callback_runs_after_start_tag_is_written() {
    let sink = SharedSink::default();
    let observed = RefCell::new(None);
    let calls = RefCell::new(0);
    {
        let (observed, calls, probe) = (&observed, &calls, sink.clone());
        let mut rw = HtmlRewriter::new(RewriterConfig::default(), sink.clone());
        rw.on(
            "a",
            ElementContentHandlers::default().element(move |el| {
                el.set_attribute("id", "x")?;
                let probe = probe.clone();
                el.on_end_tag(move |end| {
                    *calls.borrow_mut() += 1;
                    *observed.borrow_mut() = Some((end.name(), probe.text()));
                    Ok(())
                })?;
                Ok(())
            }),
        )
        .expect("valid selector");
        rw.write(b"<p><a>link").expect("write");
        rw.write(b"</a></p>").expect("write");
        rw.end().expect("end");
    }
    assert_eq!(calls.into_inner(), 1);
    assert_eq!(
        observed.into_inner(),
        Some(("a".to_string(), "<p><a id=\"x\">link".to_string()))
    );
    assert_eq!(sink.text(), "<p><a id=\"x\">link</a></p>");
}

#[test]
fn element_content_mutations() {
    let out = rewrite_utf8(&["<ul><li>one</li><li class=x>two</li></ul><br>"], |rw| {
        rw.on(
            "li.x",
            ElementContentHandlers::default().element(|el| {
                el.before("<!--b-->", ContentType::Html);
                el.after("<!--a-->", ContentType::Html);
                el.prepend("<i>", ContentType::Html);
                el.append("</i>", ContentType::Html);
                el.prepend("1 & ", ContentType::Text);
                Ok(())
            }),
        )
        .expect("valid selector");
        rw.on(
            "br",
            ElementContentHandlers::default().element(|el| {
                el.replace("<hr>", ContentType::Html);
                Ok(())
            }),
        )
        .expect("valid selector");
    });
    assert_eq!(
        out,
        "<ul><li>one</li><!--b--><li class=x>1 &amp; <i>two</i></li><!--a--></ul><hr>"
    );
}

#[test]
fn renaming_elements_renames_end_tags() {
    let out = rewrite_utf8(&["<DIV id=a>x</DIV><b>y</b>"], |rw| {
        rw.on(
            "div",
            ElementContentHandlers::default().element(|el| {
                assert_eq!(el.tag_name(), "div");
                assert_eq!(el.tag_name_preserve_case(), "DIV");
                el.set_tag_name("section")?;
                Ok(())
            }),
        )
        .expect("valid selector");
        rw.on(
            "b",
            ElementContentHandlers::default().element(|el| {
                el.on_end_tag(|end| {
                    end.set_name("strong")?;
                    end.after("!", ContentType::Text);
                    Ok(())
                })?;
                Ok(())
            }),
        )
        .expect("valid selector");
    });
    assert_eq!(out, "<section id=a>x</section><b>y</strong>!");
}

#[test]
fn comments_doctypes_and_text() {
    let doctypes = &RefCell::new(Vec::new());
    let out = rewrite_utf8(
        &[
            "<!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" \"http://www.w3.org/TR/html4/strict.dtd\">",
            "<!-- keep --><p>hello <!-- secret --></p>",
        ],
        |rw| {
            rw.on_document(
                DocumentContentHandlers::default()
                    .doctype(move |doctype| {
                        doctypes.borrow_mut().push((
                            doctype.name(),
                            doctype.public_id(),
                            doctype.system_id(),
                            doctype.force_quirks(),
                        ));
                        doctype.remove();
                        Ok(())
                    })
                    .comments(|comment| {
                        if comment.text().trim() == "keep" {
                            comment.set_text("kept")?;
                        }
                        Ok(())
                    }),
            )
            .expect("document handlers");
            rw.on(
                "p",
                ElementContentHandlers::default()
                    .comments(|comment| {
                        comment.remove();
                        Ok(())
                    })
                    .text(|chunk| {
                        if !chunk.as_str().is_empty() {
                            let upper = chunk.as_str().to_uppercase();
                            chunk.replace(&upper, ContentType::Text);
                        }
                        Ok(())
                    }),
            )
            .expect("valid selector");
        },
    );
    assert_eq!(out, "<!--kept--><p>HELLO </p>");
    assert_eq!(
        doctypes.take(),
        vec![(
            Some("html".to_string()),
            Some("-//W3C//DTD HTML 4.01//EN".to_string()),
            Some("http://www.w3.org/TR/html4/strict.dtd".to_string()),
            false
        )]
    );
}

#[test]
fn raw_text_replacements_are_not_escaped() {
    let types = &RefCell::new(Vec::new());
    let out = rewrite_utf8(&["<script>old()</script><p>a</p>"], |rw| {
        rw.on(
            "script, p",
            ElementContentHandlers::default().text(move |chunk| {
                types.borrow_mut().push(chunk.text_type());
                if chunk.last_in_text_node() {
                    chunk.replace("x < y && z", ContentType::Text);
                }
                Ok(())
            }),
        )
        .expect("valid selector");
    });
    assert_eq!(
        out,
        "<script>x < y && z</script><p>x &lt; y &amp;&amp; z</p>"
    );
    assert_eq!(types.take(), vec![TextType::ScriptData, TextType::Data]);
}

#[test]
fn legacy_encoding_round_trip() {
    let seen = &RefCell::new(None);
    let input: &[u8] = b"<p title=caf\xE9>\xE9t\xE9</p>";
    let chunks: Vec<&[u8]> = input.chunks(3).collect();
    let out = rewrite_chunks(
        RewriterConfig {
            encoding: rewriter::AsciiCompatibleEncoding::from_label("windows-1252")
                .expect("known label"),
            ..RewriterConfig::default()
        },
        &chunks,
        |rw| {
            rw.on(
                "p",
                ElementContentHandlers::default().element(move |el| {
                    *seen.borrow_mut() = el.get_attribute("title");
                    el.set_attribute("data-x", "\u{e9}\u{4e2d}")?;
                    assert!(el.set_attribute("\u{4e2d}", "v").is_err());
                    Ok(())
                }),
            )
            .expect("valid selector");
        },
    )
    .expect("rewrite succeeds");
    assert_eq!(seen.take().as_deref(), Some("caf\u{e9}"));
    assert_eq!(
        out,
        b"<p title=caf\xE9 data-x=\"\xE9&#20013;\">\xE9t\xE9</p>".to_vec()
    );
}

#[test]
fn multi_byte_characters_split_across_writes_are_decoded_whole() {
    let text = &RefCell::new(String::new());
    let input: &[u8] = b"<p>\x82\xa0\x82\xa2</p>";
    for split in 1..input.len() {
        text.borrow_mut().clear();
        let out = rewrite_chunks(
            RewriterConfig {
                encoding: rewriter::AsciiCompatibleEncoding::from_label("shift_jis")
                    .expect("known label"),
                ..RewriterConfig::default()
            },
            &[&input[..split], &input[split..]],
            |rw| {
                rw.on_document(DocumentContentHandlers::default().text(move |chunk| {
                    text.borrow_mut().push_str(chunk.as_str());
                    Ok(())
                }))
                .expect("document handlers");
            },
        )
        .expect("rewrite succeeds");
        assert_eq!(out, input, "split at {split}");
        assert_eq!(*text.borrow(), "\u{3042}\u{3044}", "split at {split}");
    }
}

#[test]
fn document_end_appends_after_everything() {
    let out = rewrite_utf8(&["<body><p>x"], |rw| {
        rw.on(
            "body",
            ElementContentHandlers::default().element(|el| {
                el.append("<footer>f</footer>", ContentType::Html);
                Ok(())
            }),
        )
        .expect("valid selector");
        rw.on_document(DocumentContentHandlers::default().end(|end| {
            end.append("<!-- end -->", ContentType::Html);
            Ok(())
        }))
        .expect("document handlers");
    });
    assert_eq!(out, "<body><p>x<footer>f</footer><!-- end -->");
}

#[test]
fn rewrite_str_convenience() {
    let out = rewriter::rewrite_str(
        "<div><img src=a.png></div>",
        vec![(
            "div > img",
            ElementContentHandlers::default().element(|el| {
                el.set_attribute("loading", "lazy")?;
                Ok(())
            }),
        )],
    )
    .expect("rewrite succeeds");
    assert_eq!(out, "<div><img src=a.png loading=\"lazy\"></div>");
}

#[test]
fn self_closing_flag_only_closes_foreign_elements() {
    let seen = RefCell::new(Vec::new());
    let recorded = &seen;
    let out = rewrite_utf8(&["<div/>a</div><svg><path/></svg>"], |rw| {
        rw.on(
            "div, path",
            ElementContentHandlers::default().element(move |el| {
                el.append("[end]", ContentType::Html);
                let has_end_tag = el.on_end_tag(|_| Ok(())).is_ok();
                recorded
                    .borrow_mut()
                    .push((el.tag_name(), el.can_have_content(), has_end_tag));
                Ok(())
            }),
        )
        .expect("valid selector");
    });
    assert_eq!(out, "<div/>a[end]</div><svg><path/></svg>");
    assert_eq!(
        seen.into_inner(),
        vec![("div".to_string(), true, true), ("path".to_string(), false, false)]
    );
}

#[test]
fn foreign_text_handlers_see_cdata_sections() {
    let seen = RefCell::new(Vec::new());
    let recorded = &seen;
    let out = rewrite_utf8(&["<svg><![CDATA[a<b]]></svg><style>a<b</style>"], |rw| {
        rw.on_document(DocumentContentHandlers::default().text(move |chunk| {
            if !chunk.as_str().is_empty() {
                recorded
                    .borrow_mut()
                    .push((chunk.as_str().to_string(), chunk.text_type()));
            }
            Ok(())
        }))
        .expect("document handlers");
    });
    assert_eq!(out, "<svg><![CDATA[a<b]]></svg><style>a<b</style>");
    assert_eq!(
        seen.into_inner(),
        vec![
            ("a<b".to_string(), TextType::CDataSection),
            ("a<b".to_string(), TextType::RawText),
        ]
    );
}

#![no_main]

use libfuzzer_sys::fuzz_target;
use rewriter::{
    ContentType, DocumentContentHandlers, ElementContentHandlers, HtmlRewriter, RewriterConfig,
};

/// The first byte picks the chunk size; the rest is the document.
fn split(data: &[u8]) -> (usize, &[u8]) {
    match data.split_first() {
        Some((&size, rest)) => (usize::from(size % 32) + 1, rest),
        None => (1, data),
    }
}

fn passthrough(input: &[u8], chunk_size: usize) -> Vec<u8> {
    let mut output = Vec::with_capacity(input.len());
    let config = RewriterConfig {
        max_nesting_depth: usize::MAX,
        ..RewriterConfig::default()
    };
    let mut rewriter = HtmlRewriter::new(config, |chunk: &[u8]| output.extend_from_slice(chunk));
    rewriter
        .on_document(DocumentContentHandlers::default().text(|_| Ok(())))
        .expect("fresh rewriter");
    for chunk in input.chunks(chunk_size) {
        rewriter.write(chunk).expect("untouched input never fails");
    }
    rewriter.end().expect("untouched input never fails");
    drop(rewriter);
    output
}

fn mutating(input: &[u8], chunk_size: usize) {
    let mut rewriter = HtmlRewriter::new(
        RewriterConfig {
            max_buffered_bytes: Some(4096),
            max_nesting_depth: 64,
            ..RewriterConfig::default()
        },
        |_: &[u8]| {},
    );
    rewriter
        .on(
            "div, a[href], p > span, :not(b)",
            ElementContentHandlers::default()
                .element(|el| {
                    el.set_attribute("data-x", "1")?;
                    el.prepend("<i>", ContentType::Html);
                    if el.has_attribute("id") {
                        el.set_inner_content("x", ContentType::Text);
                    }
                    if el.tag_name() == "a" {
                        el.on_end_tag(|end| {
                            end.after("!", ContentType::Text);
                            Ok(())
                        })?;
                    }
                    Ok(())
                })
                .text(|chunk| {
                    let upper = chunk.as_str().to_uppercase();
                    chunk.replace(&upper, ContentType::Text);
                    Ok(())
                })
                .comments(|comment| {
                    comment.remove();
                    Ok(())
                }),
        )
        .expect("valid selector");
    for chunk in input.chunks(chunk_size) {
        if rewriter.write(chunk).is_err() {
            return;
        }
    }
    let _ = rewriter.end();
}

fuzz_target!(|data: &[u8]| {
    let (chunk_size, input) = split(data);
    assert_eq!(passthrough(input, chunk_size), input);
    mutating(input, chunk_size);
});

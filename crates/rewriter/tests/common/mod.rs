#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use rewriter::{HtmlRewriter, OutputSink, RewriterConfig, RewritingError};

/// Output sink whose contents stay readable while the rewriter is alive.
#[derive(Clone, Default)]
pub struct SharedSink {
    pub output: Rc<RefCell<Vec<u8>>>,
    pub calls: Rc<RefCell<usize>>,
}

impl SharedSink {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.output.borrow()).into_owned()
    }

    pub fn calls(&self) -> usize {
        *self.calls.borrow()
    }
}

impl OutputSink for SharedSink {
    fn handle_chunk(&mut self, chunk: &[u8]) {
        assert!(!chunk.is_empty(), "sink received an empty chunk");
        self.output.borrow_mut().extend_from_slice(chunk);
        *self.calls.borrow_mut() += 1;
    }
}

/// Run `chunks` through a fresh rewriter configured by `setup`.
pub fn rewrite_chunks<'h, C: AsRef<[u8]>>(
    config: RewriterConfig,
    chunks: &[C],
    setup: impl FnOnce(&mut HtmlRewriter<'h, SharedSink>),
) -> Result<Vec<u8>, RewritingError> {
    let sink = SharedSink::default();
    let mut rewriter = HtmlRewriter::new(config, sink.clone());
    setup(&mut rewriter);
    for chunk in chunks {
        rewriter.write(chunk.as_ref())?;
    }
    rewriter.end()?;
    drop(rewriter);
    Ok(sink.output.take())
}

pub fn rewrite_utf8<'h>(
    chunks: &[&str],
    setup: impl FnOnce(&mut HtmlRewriter<'h, SharedSink>),
) -> String {
    let output = rewrite_chunks(RewriterConfig::default(), chunks, setup).expect("rewrite succeeds");
    String::from_utf8(output).expect("utf-8 output")
}

//! The rewriting session.

use crate::buffer::InputBuffer;
use crate::dispatch::{DocumentContentHandlers, Dispatcher, ElementContentHandlers};
use crate::selectors::Selector;
use crate::serializer::{OutputSink, Serializer};
use crate::shared::{AsciiCompatibleEncoding, LimitError, RewritingError, StateError};
use crate::tokenizer::Tokenizer;


/// Rewriter configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RewriterConfig {
    /// Encoding of the input. The output uses the same encoding.
    pub encoding: AsciiCompatibleEncoding,
    /// Upper bound on input held back between writes, such as a tag that
    /// has not been closed yet. `None` means unbounded.
    pub max_buffered_bytes: Option<usize>,
    /// Upper bound on the number of simultaneously open elements.
    pub max_nesting_depth: usize,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            encoding: AsciiCompatibleEncoding::utf_8(),
            max_buffered_bytes: None,
            max_nesting_depth: 1024,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SessionState {
    Accepting,
    Ended,
    /// An error aborted the session; every later call fails.
    Poisoned,
}

/// Streaming HTML rewriter.
///
/// Register handlers with [`HtmlRewriter::on`] and
/// [`HtmlRewriter::on_document`], then feed the document with any number of
/// [`HtmlRewriter::write`] calls followed by one [`HtmlRewriter::end`].
/// Rewritten output is passed to the sink as soon as it is known.
///
/// ```
/// use rewriter::{ElementContentHandlers, HtmlRewriter, RewriterConfig};
///
/// let mut output = Vec::new();
/// let mut rewriter = HtmlRewriter::new(RewriterConfig::default(), |chunk: &[u8]| {
///     output.extend_from_slice(chunk)
/// });
/// rewriter
///     .on(
///         "a[href]",
///         ElementContentHandlers::default().element(|el| {
///             el.set_attribute("rel", "noopener")?;
///             Ok(())
///         }),
///     )
///     .unwrap();
/// rewriter.write(b"<p><a href=/x>link</a></p>").unwrap();
/// rewriter.end().unwrap();
/// drop(rewriter);
/// assert_eq!(output, b"<p><a href=/x rel=\"noopener\">link</a></p>");
/// ```
pub struct HtmlRewriter<'h, O: OutputSink> {
    config: RewriterConfig,
    buffer: InputBuffer,
    tokenizer: Tokenizer,
    dispatcher: Dispatcher<'h>,
    serializer: Serializer<O>,
    state: SessionState,
    started: bool,
}

impl<'h, O: OutputSink> HtmlRewriter<'h, O> {
    pub fn new(config: RewriterConfig, sink: O) -> Self {
        Self {
            config,
            buffer: InputBuffer::default(),
            tokenizer: Tokenizer::new(config.encoding),
            dispatcher: Dispatcher::new(config.encoding, config.max_nesting_depth),
            serializer: Serializer::new(sink),
            state: SessionState::Accepting,
            started: false,
        }
    }

    /// Create a rewriter with default limits for the encoding named by a
    /// WHATWG label.
    pub fn with_encoding(label: &str, sink: O) -> Result<Self, RewritingError> {
        let config = RewriterConfig {
            encoding: AsciiCompatibleEncoding::from_label(label)?,
            ..RewriterConfig::default()
        };
        Ok(Self::new(config, sink))
    }

    pub fn config(&self) -> &RewriterConfig {
        &self.config
    }

    /// Register handlers for elements matching `selector`.
    pub fn on(
        &mut self,
        selector: &str,
        handlers: ElementContentHandlers<'h>,
    ) -> Result<(), RewritingError> {
        self.check_registration()?;
        let selector: Selector = selector.parse()?;
        self.dispatcher.add_element_handlers(&selector, handlers);
        Ok(())
    }

    /// Register handlers for elements matching a parsed selector.
    pub fn on_selector(
        &mut self,
        selector: &Selector,
        handlers: ElementContentHandlers<'h>,
    ) -> Result<(), RewritingError> {
        self.check_registration()?;
        self.dispatcher.add_element_handlers(selector, handlers);
        Ok(())
    }

    /// Register handlers that apply to the whole document.
    pub fn on_document(&mut self, handlers: DocumentContentHandlers<'h>) -> Result<(), RewritingError> {
        self.check_registration()?;
        self.dispatcher.add_document_handlers(handlers);
        Ok(())
    }

    fn check_registration(&self) -> Result<(), StateError> {
        match self.state {
            SessionState::Poisoned => Err(StateError::Aborted),
            SessionState::Ended => Err(StateError::RegistrationAfterWrite),
            SessionState::Accepting if self.started => Err(StateError::RegistrationAfterWrite),
            SessionState::Accepting => Ok(()),
        }
    }

    /// Feed the next chunk of the document.
    pub fn write(&mut self, chunk: &[u8]) -> Result<(), RewritingError> {
        match self.state {
            SessionState::Accepting => {}
            SessionState::Ended => return Err(StateError::WriteAfterEnd.into()),
            SessionState::Poisoned => return Err(StateError::Aborted.into()),
        }
        self.start();
        if chunk.is_empty() {
            return Ok(());
        }
        self.buffer.append(chunk);
        let result = self.pump(false).and_then(|()| self.check_buffer_limit());
        self.poison_on_error(result)
    }

    /// Signal the end of the document. Everything still buffered is
    /// resolved and written out.
    pub fn end(&mut self) -> Result<(), RewritingError> {
        match self.state {
            SessionState::Accepting => {}
            SessionState::Ended => return Err(StateError::EndCalledTwice.into()),
            SessionState::Poisoned => return Err(StateError::Aborted.into()),
        }
        self.start();
        let result = self.finish_document();
        self.poison_on_error(result)?;
        self.state = SessionState::Ended;
        log::debug!(target: "rewriter", "document ended at byte {}", self.buffer.base());
        Ok(())
    }

    pub fn into_sink(self) -> O {
        self.serializer.into_sink()
    }

    fn start(&mut self) {
        if !self.started {
            self.started = true;
            log::debug!(
                target: "rewriter",
                "session started: {} registrations, encoding {}",
                self.dispatcher.registration_count(),
                self.config.encoding.name()
            );
        }
    }

    fn finish_document(&mut self) -> Result<(), RewritingError> {
        self.pump(true)?;
        self.dispatcher
            .finish(self.buffer.bytes(), &mut self.serializer)
    }

    /// Tokenize and dispatch everything that can be resolved, then drop the
    /// resolved bytes from the buffer.
    fn pump(&mut self, eof: bool) -> Result<(), RewritingError> {
        let bytes = self.buffer.bytes();
        let base = self.buffer.base();
        let mut pos = 0;
        let result = loop {
            let Some(lexeme) = self.tokenizer.next_lexeme(bytes, pos, eof) else {
                break Ok(());
            };
            pos = lexeme.span().end;
            let limit = self.config.max_nesting_depth;
            if self.tokenizer.namespace_depth() > limit {
                break Err(LimitError::MaxNestingReached { limit }.into());
            }
            if let Err(err) = self
                .dispatcher
                .dispatch(lexeme, bytes, base, &mut self.serializer)
            {
                break Err(err);
            }
        };
        self.serializer.flush(bytes);
        self.buffer.consume(pos);
        result
    }

    fn check_buffer_limit(&self) -> Result<(), RewritingError> {
        match self.config.max_buffered_bytes {
            Some(limit) if self.buffer.len() > limit => {
                Err(LimitError::BufferCapacityExceeded { limit }.into())
            }
            _ => Ok(()),
        }
    }

    fn poison_on_error(&mut self, result: Result<(), RewritingError>) -> Result<(), RewritingError> {
        if let Err(err) = &result {
            log::warn!(target: "rewriter", "rewriting aborted: {err}");
            self.state = SessionState::Poisoned;
        }
        result
    }
}

/// Rewrite a complete UTF-8 document in one call.
///
/// `handlers` pairs selectors with their element handlers, in registration
/// order.
pub fn rewrite_str<'h>(
    html: &str,
    handlers: Vec<(&str, ElementContentHandlers<'h>)>,
) -> Result<String, RewritingError> {
    let mut output = Vec::new();
    let mut rewriter = HtmlRewriter::new(RewriterConfig::default(), |chunk: &[u8]| {
        output.extend_from_slice(chunk)
    });
    for (selector, handlers) in handlers {
        rewriter.on(selector, handlers)?;
    }
    rewriter.write(html.as_bytes())?;
    rewriter.end()?;
    drop(rewriter);
    Ok(String::from_utf8_lossy(&output).into_owned())
}

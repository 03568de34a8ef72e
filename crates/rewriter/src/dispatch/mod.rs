//! Routing of lexemes to registered handlers.
//!
//! The dispatcher owns the open element stack. For every start tag it runs
//! the selector matcher, calls the element handlers of matching
//! registrations and remembers which registrations have text or comment
//! handlers active inside the element. End tags pop the stack; elements
//! above the matching entry are closed implicitly, as are elements closed by
//! the small set of tree construction rules in [`names::implicitly_closes`].
//!
//! Invariants:
//! - `active[i]` is the number of open elements that activated the content
//!   handlers of registration `i`.
//! - `removing` is the number of open elements whose content is removed;
//!   every token seen while it is non-zero is marked removed before any
//!   handler sees it.
//! - The matcher has exactly one frame per open element.

mod handlers;
mod stack;

pub use handlers::{
    CommentHandler, DoctypeHandler, DocumentContentHandlers, ElementContentHandlers,
    ElementHandler, EndHandler, EndTagHandler, TextHandler,
};

use handlers::Registration;
use stack::{OpenElement, OpenElements};

use crate::selectors::Selector;
use crate::selectors::matcher::SelectorMatcher;
use crate::serializer::{OutputSink, Serializer};
use crate::shared::{AsciiCompatibleEncoding, LimitError, RewritingError, Span, names};
use crate::tokenizer::{AttributeSpans, Lexeme, Namespace, TextType};
use crate::units::{
    Attributes, Comment, Doctype, DocumentEnd, Element, ElementState, EndTag, StartTag, TextChunk,
};

/// Start tag fields other than the attributes.
struct TagLexeme {
    span: Span,
    name: Span,
    self_closing: bool,
    namespace: Namespace,
}

pub(crate) struct Dispatcher<'h> {
    registrations: Vec<Registration<'h>>,
    active: Vec<usize>,
    matcher: SelectorMatcher,
    stack: OpenElements<'h>,
    removing: usize,
    encoding: AsciiCompatibleEncoding,
    max_nesting_depth: usize,
}

impl<'h> Dispatcher<'h> {
    pub(crate) fn new(encoding: AsciiCompatibleEncoding, max_nesting_depth: usize) -> Self {
        Self {
            registrations: Vec::new(),
            active: Vec::new(),
            matcher: SelectorMatcher::default(),
            stack: OpenElements::default(),
            removing: 0,
            encoding,
            max_nesting_depth,
        }
    }

    pub(crate) fn add_element_handlers(
        &mut self,
        selector: &Selector,
        handlers: ElementContentHandlers<'h>,
    ) {
        let index = self.registrations.len();
        self.matcher.add(selector, index, self.encoding);
        self.push_registration(handlers.into());
    }

    pub(crate) fn add_document_handlers(&mut self, handlers: DocumentContentHandlers<'h>) {
        self.push_registration(handlers.into());
    }

    fn push_registration(&mut self, registration: Registration<'h>) {
        self.registrations.push(registration);
        self.active.push(0);
    }

    pub(crate) fn registration_count(&self) -> usize {
        self.registrations.len()
    }

    /// Handle one lexeme. Spans in `lexeme` are offsets into `src`, which
    /// starts at absolute stream offset `base`.
    pub(crate) fn dispatch<O: OutputSink>(
        &mut self,
        lexeme: Lexeme,
        src: &[u8],
        base: usize,
        out: &mut Serializer<O>,
    ) -> Result<(), RewritingError> {
        match lexeme {
            Lexeme::Text {
                span,
                text_type,
                last_in_text_node,
            } => self.text(span, text_type, last_in_text_node, src, base, out),
            Lexeme::StartTag {
                span,
                name,
                attributes,
                self_closing,
                namespace,
            } => {
                let tag = TagLexeme {
                    span,
                    name,
                    self_closing,
                    namespace,
                };
                self.start_tag(tag, &attributes, src, base, out)
            }
            Lexeme::EndTag { span, name } => self.end_tag(span, name, src, base, out),
            Lexeme::Comment { span, text } => self.comment(span, text, src, base, out),
            Lexeme::Doctype {
                span,
                name,
                public_id,
                system_id,
                force_quirks,
            } => {
                let slice = |field: Option<Span>| field.map(|field| &src[field.range()]);
                let doctype = Doctype::new(
                    slice(name),
                    slice(public_id),
                    slice(system_id),
                    force_quirks,
                    span.offset(base),
                    self.encoding,
                );
                self.doctype(span, doctype, src, out)
            }
            Lexeme::Passthrough { span } => {
                if self.removing == 0 {
                    out.passthrough(src, span);
                }
                Ok(())
            }
        }
    }

    /// Close every open element and run the document end handlers.
    pub(crate) fn finish<O: OutputSink>(
        &mut self,
        src: &[u8],
        out: &mut Serializer<O>,
    ) -> Result<(), RewritingError> {
        while !self.stack.is_empty() {
            self.close_top(src, out);
        }

        let mut document_end = DocumentEnd::new(self.encoding);
        for registration in &mut self.registrations {
            if let Some(handler) = registration.end.take() {
                handler(&mut document_end).map_err(RewritingError::ContentHandler)?;
            }
        }
        out.emit(src, &document_end.into_content());
        out.flush(src);
        Ok(())
    }

    fn in_scope(&self, index: usize) -> bool {
        self.registrations[index].document_scope || self.active[index] > 0
    }

    fn text<O: OutputSink>(
        &mut self,
        span: Span,
        text_type: TextType,
        last_in_text_node: bool,
        src: &[u8],
        base: usize,
        out: &mut Serializer<O>,
    ) -> Result<(), RewritingError> {
        let encoding = self.encoding;
        let removing = self.removing > 0;
        let mut chunk = None;
        for index in 0..self.registrations.len() {
            if !self.in_scope(index) {
                continue;
            }
            let Some(handler) = self.registrations[index].text.as_mut() else {
                continue;
            };
            let chunk = chunk.get_or_insert_with(|| {
                out.flush(src);
                let mut chunk = TextChunk::new(
                    &src[span.range()],
                    text_type,
                    last_in_text_node,
                    span.offset(base),
                    encoding,
                );
                if removing {
                    chunk.remove();
                }
                chunk
            });
            handler(chunk).map_err(RewritingError::ContentHandler)?;
        }

        match chunk {
            Some(chunk) => out.token(src, span, &chunk),
            None if removing => {}
            None => out.passthrough(src, span),
        }
        Ok(())
    }

    fn comment<O: OutputSink>(
        &mut self,
        span: Span,
        text: Span,
        src: &[u8],
        base: usize,
        out: &mut Serializer<O>,
    ) -> Result<(), RewritingError> {
        let encoding = self.encoding;
        let removing = self.removing > 0;
        let mut comment = None;
        for index in 0..self.registrations.len() {
            if !self.in_scope(index) {
                continue;
            }
            let Some(handler) = self.registrations[index].comments.as_mut() else {
                continue;
            };
            let comment = comment.get_or_insert_with(|| {
                out.flush(src);
                let mut comment = Comment::new(&src[text.range()], span.offset(base), encoding);
                if removing {
                    comment.remove();
                }
                comment
            });
            handler(comment).map_err(RewritingError::ContentHandler)?;
        }

        match comment {
            Some(comment) => out.token(src, span, &comment),
            None if removing => {}
            None => out.passthrough(src, span),
        }
        Ok(())
    }

    fn doctype<O: OutputSink>(
        &mut self,
        span: Span,
        mut doctype: Doctype<'_>,
        src: &[u8],
        out: &mut Serializer<O>,
    ) -> Result<(), RewritingError> {
        if self.removing > 0 {
            doctype.remove();
        }
        let mut flushed = false;
        for registration in &mut self.registrations {
            let Some(handler) = registration.doctype.as_mut() else {
                continue;
            };
            if !flushed {
                out.flush(src);
                flushed = true;
            }
            handler(&mut doctype).map_err(RewritingError::ContentHandler)?;
        }
        out.token(src, span, &doctype);
        Ok(())
    }

    fn start_tag<O: OutputSink>(
        &mut self,
        tag: TagLexeme,
        attributes: &[AttributeSpans],
        src: &[u8],
        base: usize,
        out: &mut Serializer<O>,
    ) -> Result<(), RewritingError> {
        let TagLexeme {
            span,
            name,
            self_closing,
            namespace,
        } = tag;
        let raw_name = &src[name.range()];
        let local_name = names::to_ascii_lowercase(raw_name);

        while self
            .stack
            .current_name()
            .is_some_and(|current| names::implicitly_closes(current, &local_name))
        {
            self.close_top(src, out);
        }

        // The self-closing flag is ignored on HTML elements.
        let can_have_content = match namespace {
            Namespace::Html => !names::is_void_element(&local_name),
            Namespace::Svg | Namespace::MathMl => !self_closing,
        };
        if can_have_content && self.stack.len() >= self.max_nesting_depth {
            return Err(LimitError::MaxNestingReached {
                limit: self.max_nesting_depth,
            }
            .into());
        }

        let attributes = Attributes::from_spans(src, attributes, self.encoding);
        let matched = self
            .matcher
            .match_element(&local_name, attributes.as_slice());
        let removing = self.removing > 0;
        let mut state = ElementState::new(self.encoding);

        let has_element_handlers = matched
            .registrations
            .iter()
            .any(|&index| self.registrations[index].element.is_some());
        if has_element_handlers {
            let mut tag = StartTag::new(
                raw_name,
                attributes,
                self_closing,
                span.offset(base),
                self.encoding,
            );
            if removing {
                tag.mutations.remove();
            }
            out.flush(src);
            for &index in &matched.registrations {
                if let Some(handler) = self.registrations[index].element.as_mut() {
                    let mut element = Element::new(&mut tag, &mut state, can_have_content);
                    handler(&mut element).map_err(RewritingError::ContentHandler)?;
                }
            }
            out.token(src, span, &tag);
        } else if !removing {
            out.passthrough(src, span);
        }

        if !can_have_content {
            return Ok(());
        }
        let activated: Vec<usize> = matched
            .registrations
            .iter()
            .copied()
            .filter(|&index| self.registrations[index].has_content_handlers())
            .collect();
        for &index in &activated {
            self.active[index] += 1;
        }
        if state.remove_content {
            self.removing += 1;
        }
        self.matcher.push(matched);
        self.stack.push(OpenElement {
            local_name,
            activated,
            state,
        });
        Ok(())
    }

    fn end_tag<O: OutputSink>(
        &mut self,
        span: Span,
        name: Span,
        src: &[u8],
        base: usize,
        out: &mut Serializer<O>,
    ) -> Result<(), RewritingError> {
        let raw_name = &src[name.range()];
        let local_name = names::to_ascii_lowercase(raw_name);
        let Some(depth) = self.stack.position(&local_name) else {
            if self.removing == 0 {
                out.passthrough(src, span);
            }
            return Ok(());
        };
        while self.stack.len() > depth + 1 {
            self.close_top(src, out);
        }
        let Some(OpenElement { state, .. }) = self.pop_entry() else {
            return Ok(());
        };

        let removed = self.removing > 0;
        if state.end_tag_handlers.is_empty()
            && state.end_tag_name.is_none()
            && state.end_tag_mutations.is_untouched()
            && !removed
        {
            out.passthrough(src, span);
            return Ok(());
        }

        let mut mutations = state.end_tag_mutations;
        if removed {
            mutations.remove();
        }
        let mut end_tag = EndTag::new(
            raw_name,
            state.end_tag_name,
            span.offset(base),
            self.encoding,
            mutations,
        );
        if !state.end_tag_handlers.is_empty() {
            out.flush(src);
        }
        for handler in state.end_tag_handlers {
            handler(&mut end_tag).map_err(RewritingError::ContentHandler)?;
        }
        out.token(src, span, &end_tag);
        Ok(())
    }

    /// Close the innermost open element without an end tag of its own.
    /// Content scheduled around its end tag is still written; its end tag
    /// handlers are dropped.
    fn close_top<O: OutputSink>(&mut self, src: &[u8], out: &mut Serializer<O>) {
        let Some(entry) = self.pop_entry() else {
            return;
        };
        #[cfg(any(test, feature = "debug-trace"))]
        log::trace!(
            target: "rewriter.dispatch",
            "implicitly closed <{}>, dropped {} end tag handlers",
            String::from_utf8_lossy(&entry.local_name),
            entry.state.end_tag_handlers.len()
        );
        let mutations = &entry.state.end_tag_mutations;
        out.emit(src, &mutations.before);
        out.emit(src, &mutations.after);
    }

    fn pop_entry(&mut self) -> Option<OpenElement<'h>> {
        let entry = self.stack.pop()?;
        self.matcher.pop();
        for &index in &entry.activated {
            self.active[index] -= 1;
        }
        if entry.state.remove_content {
            self.removing -= 1;
        }
        Some(entry)
    }
}

//! Handler records registered on a rewriter.

use crate::shared::HandlerResult;
use crate::units::{Comment, Doctype, DocumentEnd, Element, EndTag, TextChunk};

pub type ElementHandler<'h> = Box<dyn FnMut(&mut Element<'_, '_, 'h>) -> HandlerResult + 'h>;
pub type EndTagHandler<'h> = Box<dyn FnOnce(&mut EndTag<'_>) -> HandlerResult + 'h>;
pub type TextHandler<'h> = Box<dyn FnMut(&mut TextChunk<'_>) -> HandlerResult + 'h>;
pub type CommentHandler<'h> = Box<dyn FnMut(&mut Comment<'_>) -> HandlerResult + 'h>;
pub type DoctypeHandler<'h> = Box<dyn FnMut(&mut Doctype<'_>) -> HandlerResult + 'h>;
pub type EndHandler<'h> = Box<dyn FnOnce(&mut DocumentEnd) -> HandlerResult + 'h>;

/// Handlers for elements matched by a selector and for the text and
/// comments inside them.
///
/// ```
/// use rewriter::{ContentType, ElementContentHandlers};
///
/// let handlers = ElementContentHandlers::default()
///     .element(|el| {
///         el.set_attribute("loading", "lazy")?;
///         Ok(())
///     })
///     .text(|chunk| {
///         chunk.after("!", ContentType::Text);
///         Ok(())
///     });
/// # drop(handlers);
/// ```
#[derive(Default)]
pub struct ElementContentHandlers<'h> {
    pub(crate) element: Option<ElementHandler<'h>>,
    pub(crate) text: Option<TextHandler<'h>>,
    pub(crate) comments: Option<CommentHandler<'h>>,
}

impl<'h> ElementContentHandlers<'h> {
    pub fn element(
        mut self,
        handler: impl FnMut(&mut Element<'_, '_, 'h>) -> HandlerResult + 'h,
    ) -> Self {
        self.element = Some(Box::new(handler));
        self
    }

    pub fn text(mut self, handler: impl FnMut(&mut TextChunk<'_>) -> HandlerResult + 'h) -> Self {
        self.text = Some(Box::new(handler));
        self
    }

    pub fn comments(mut self, handler: impl FnMut(&mut Comment<'_>) -> HandlerResult + 'h) -> Self {
        self.comments = Some(Box::new(handler));
        self
    }
}

/// Handlers that see the whole document regardless of selectors.
#[derive(Default)]
pub struct DocumentContentHandlers<'h> {
    pub(crate) doctype: Option<DoctypeHandler<'h>>,
    pub(crate) text: Option<TextHandler<'h>>,
    pub(crate) comments: Option<CommentHandler<'h>>,
    pub(crate) end: Option<EndHandler<'h>>,
}

impl<'h> DocumentContentHandlers<'h> {
    pub fn doctype(mut self, handler: impl FnMut(&mut Doctype<'_>) -> HandlerResult + 'h) -> Self {
        self.doctype = Some(Box::new(handler));
        self
    }

    pub fn text(mut self, handler: impl FnMut(&mut TextChunk<'_>) -> HandlerResult + 'h) -> Self {
        self.text = Some(Box::new(handler));
        self
    }

    pub fn comments(mut self, handler: impl FnMut(&mut Comment<'_>) -> HandlerResult + 'h) -> Self {
        self.comments = Some(Box::new(handler));
        self
    }

    pub fn end(mut self, handler: impl FnOnce(&mut DocumentEnd) -> HandlerResult + 'h) -> Self {
        self.end = Some(Box::new(handler));
        self
    }
}

/// One registration: the handlers of a single `on` or `on_document` call.
#[derive(Default)]
pub(crate) struct Registration<'h> {
    pub(crate) element: Option<ElementHandler<'h>>,
    pub(crate) text: Option<TextHandler<'h>>,
    pub(crate) comments: Option<CommentHandler<'h>>,
    pub(crate) doctype: Option<DoctypeHandler<'h>>,
    pub(crate) end: Option<EndHandler<'h>>,
    /// Text and comment handlers see the whole document.
    pub(crate) document_scope: bool,
}

impl<'h> From<ElementContentHandlers<'h>> for Registration<'h> {
    fn from(handlers: ElementContentHandlers<'h>) -> Self {
        Self {
            element: handlers.element,
            text: handlers.text,
            comments: handlers.comments,
            ..Self::default()
        }
    }
}

impl<'h> From<DocumentContentHandlers<'h>> for Registration<'h> {
    fn from(handlers: DocumentContentHandlers<'h>) -> Self {
        Self {
            doctype: handlers.doctype,
            text: handlers.text,
            comments: handlers.comments,
            end: handlers.end,
            document_scope: true,
            ..Self::default()
        }
    }
}

impl Registration<'_> {
    /// Whether an element match has to be tracked for its content.
    pub(crate) fn has_content_handlers(&self) -> bool {
        self.text.is_some() || self.comments.is_some()
    }
}

//! Open elements.

use crate::units::ElementState;

pub(crate) struct OpenElement<'h> {
    /// Lowercase.
    pub(crate) local_name: Box<[u8]>,
    /// Registrations whose content handlers became active at this element.
    pub(crate) activated: Vec<usize>,
    pub(crate) state: ElementState<'h>,
}

/// Elements whose start tag was seen and whose content is being processed,
/// innermost last.
#[derive(Default)]
pub(crate) struct OpenElements<'h> {
    entries: Vec<OpenElement<'h>>,
}

impl<'h> OpenElements<'h> {
    pub(crate) fn push(&mut self, element: OpenElement<'h>) {
        self.entries.push(element);
    }

    pub(crate) fn pop(&mut self) -> Option<OpenElement<'h>> {
        self.entries.pop()
    }

    pub(crate) fn current_name(&self) -> Option<&[u8]> {
        self.entries.last().map(|entry| &*entry.local_name)
    }

    /// Depth of the innermost open element named `local_name`.
    pub(crate) fn position(&self, local_name: &[u8]) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| &*entry.local_name == local_name)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

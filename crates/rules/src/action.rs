//! The actions a rule can take, as written in TOML and as applied.

use rewriter::{Comment, ContentType, Element, HandlerResult, TextChunk};
use serde::Deserialize;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ContentKind {
    #[default]
    Html,
    Text,
}

impl From<ContentKind> for ContentType {
    fn from(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Html => ContentType::Html,
            ContentKind::Text => ContentType::Text,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub(crate) struct Content {
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) content_type: ContentKind,
}

/// One `[[rule]]` entry: the selector is optional in the file and checked
/// against the action when the rule set is compiled.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub(crate) struct RuleSpec {
    #[serde(default)]
    pub(crate) selector: Option<String>,
    #[serde(flatten)]
    pub(crate) action: ActionSpec,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub(crate) enum ActionSpec {
    SetAttribute { name: String, value: String },
    RemoveAttribute { name: String },
    ReplaceInAttribute { attribute: String, from: String, to: String },
    SetTagName { name: String },
    Before(Content),
    After(Content),
    Prepend(Content),
    Append(Content),
    SetInnerContent(Content),
    Replace(Content),
    Remove,
    RemoveAndKeepContent,
    ReplaceText { from: String, to: String },
    RemoveComments,
}

impl ActionSpec {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            ActionSpec::SetAttribute { .. } => "set_attribute",
            ActionSpec::RemoveAttribute { .. } => "remove_attribute",
            ActionSpec::ReplaceInAttribute { .. } => "replace_in_attribute",
            ActionSpec::SetTagName { .. } => "set_tag_name",
            ActionSpec::Before(_) => "before",
            ActionSpec::After(_) => "after",
            ActionSpec::Prepend(_) => "prepend",
            ActionSpec::Append(_) => "append",
            ActionSpec::SetInnerContent(_) => "set_inner_content",
            ActionSpec::Replace(_) => "replace",
            ActionSpec::Remove => "remove",
            ActionSpec::RemoveAndKeepContent => "remove_and_keep_content",
            ActionSpec::ReplaceText { .. } => "replace_text",
            ActionSpec::RemoveComments => "remove_comments",
        }
    }
}

/// An action applied to every matched element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ElementAction {
    SetAttribute { name: String, value: String },
    RemoveAttribute { name: String },
    ReplaceInAttribute { attribute: String, from: String, to: String },
    SetTagName { name: String },
    Before(Content),
    After(Content),
    Prepend(Content),
    Append(Content),
    SetInnerContent(Content),
    Replace(Content),
    Remove,
    RemoveAndKeepContent,
}

impl ElementAction {
    pub(crate) fn apply(&self, el: &mut Element<'_, '_, '_>) -> HandlerResult {
        match self {
            ElementAction::SetAttribute { name, value } => el.set_attribute(name, value)?,
            ElementAction::RemoveAttribute { name } => el.remove_attribute(name),
            ElementAction::ReplaceInAttribute {
                attribute,
                from,
                to,
            } => {
                if let Some(value) = el.get_attribute(attribute)
                    && value.contains(from.as_str())
                {
                    el.set_attribute(attribute, &value.replace(from.as_str(), to))?;
                }
            }
            ElementAction::SetTagName { name } => el.set_tag_name(name)?,
            ElementAction::Before(c) => el.before(&c.content, c.content_type.into()),
            ElementAction::After(c) => el.after(&c.content, c.content_type.into()),
            ElementAction::Prepend(c) => el.prepend(&c.content, c.content_type.into()),
            ElementAction::Append(c) => el.append(&c.content, c.content_type.into()),
            ElementAction::SetInnerContent(c) => {
                el.set_inner_content(&c.content, c.content_type.into())
            }
            ElementAction::Replace(c) => el.replace(&c.content, c.content_type.into()),
            ElementAction::Remove => el.remove(),
            ElementAction::RemoveAndKeepContent => el.remove_and_keep_content(),
        }
        Ok(())
    }
}

/// Pending text is flushed once it grows past this many bytes.
const PENDING_TEXT_LIMIT: usize = 64 * 1024;

/// Replaces `from` with `to` in whole text nodes.
///
/// A text node may arrive in several chunks and a match may straddle two of
/// them, so chunks are held back and the rewritten text is written in place
/// of a later chunk. Once more than `limit` bytes are held, everything that
/// can no longer be part of a match is written out, so at most `limit` bytes
/// plus one chunk are held however long the node is. Text is matched as it
/// appears in the source, character references included.
#[derive(Debug)]
pub(crate) struct TextReplacer<'r> {
    from: &'r str,
    to: &'r str,
    pending: String,
    limit: usize,
}

impl<'r> TextReplacer<'r> {
    pub(crate) fn new(from: &'r str, to: &'r str) -> Self {
        Self::with_limit(from, to, PENDING_TEXT_LIMIT)
    }

    pub(crate) fn with_limit(from: &'r str, to: &'r str, limit: usize) -> Self {
        Self {
            from,
            to,
            pending: String::new(),
            limit,
        }
    }

    pub(crate) fn on_chunk(&mut self, chunk: &mut TextChunk<'_>) -> HandlerResult {
        let held = !self.pending.is_empty();
        self.pending.push_str(chunk.as_str());
        if !chunk.last_in_text_node() {
            if self.pending.len() > self.limit {
                let settled = self.take_settled();
                chunk.replace(&settled, ContentType::Html);
            } else {
                chunk.remove();
            }
            return Ok(());
        }
        let text = std::mem::take(&mut self.pending);
        if text.contains(self.from) {
            chunk.replace(&text.replace(self.from, self.to), ContentType::Html);
        } else if held {
            chunk.replace(&text, ContentType::Html);
        }
        Ok(())
    }

    /// Split off and rewrite the pending prefix that later text can't
    /// extend into a match. The rest stays pending.
    fn take_settled(&mut self) -> String {
        let mut safe = self
            .pending
            .len()
            .saturating_sub(self.from.len().saturating_sub(1));
        while !self.pending.is_char_boundary(safe) {
            safe -= 1;
        }

        let mut settled = String::with_capacity(safe);
        let mut copied = 0;
        for (start, _) in self.pending.match_indices(self.from) {
            if start >= safe {
                break;
            }
            settled.push_str(&self.pending[copied..start]);
            settled.push_str(self.to);
            copied = start + self.from.len();
        }
        let cut = copied.max(safe);
        settled.push_str(&self.pending[copied..cut]);
        self.pending.drain(..cut);
        settled
    }
}

pub(crate) fn remove_comment(comment: &mut Comment<'_>) -> HandlerResult {
    comment.remove();
    Ok(())
}

//! Declarative rewriting rules.
//!
//! A rule set is a TOML document with an optional encoding and limits and a
//! list of rules. Each rule pairs a selector with one action:
//!
//! ```toml
//! encoding = "utf-8"
//!
//! [[rule]]
//! selector = "a[href]"
//! action = "replace_in_attribute"
//! attribute = "href"
//! from = "http:"
//! to = "https:"
//!
//! [[rule]]
//! selector = "body"
//! action = "append"
//! content = "<footer>rewritten</footer>"
//!
//! [[rule]]
//! action = "remove_comments"
//! ```
//!
//! `replace_text` and `remove_comments` apply to the whole document when the
//! selector is omitted; every other action needs one.

mod action;
mod error;

#[cfg(test)]
mod tests;

use log::debug;
use rewriter::{
    AsciiCompatibleEncoding, DocumentContentHandlers, ElementContentHandlers, HtmlRewriter,
    OutputSink, RewriterConfig, RewritingError, Selector, TextChunk,
};
use serde::Deserialize;

use action::{ActionSpec, ElementAction, RuleSpec, TextReplacer, remove_comment};

pub use error::RulesError;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleFile {
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    max_buffered_bytes: Option<usize>,
    #[serde(default)]
    max_nesting_depth: Option<usize>,
    #[serde(rename = "rule", default)]
    rules: Vec<RuleSpec>,
}

/// A compiled rule. Text and comment rules without a selector apply to the
/// whole document.
#[derive(Debug)]
enum Rule {
    Element {
        selector: Selector,
        action: ElementAction,
    },
    Text {
        selector: Option<Selector>,
        from: String,
        to: String,
    },
    Comments {
        selector: Option<Selector>,
    },
}

/// A compiled rule set, ready to be registered on any number of rewriters.
#[derive(Debug)]
pub struct RuleSet {
    config: RewriterConfig,
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn from_toml_str(source: &str) -> Result<Self, RulesError> {
        let file: RuleFile = toml::from_str(source)?;

        let mut config = RewriterConfig::default();
        if let Some(label) = &file.encoding {
            config.encoding = AsciiCompatibleEncoding::from_label(label)?;
        }
        if let Some(limit) = file.max_buffered_bytes {
            config.max_buffered_bytes = Some(limit);
        }
        if let Some(depth) = file.max_nesting_depth {
            config.max_nesting_depth = depth;
        }

        let rules = file
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, spec)| compile_rule(index, spec))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            target: "rules",
            "loaded {} rules, encoding {}",
            rules.len(),
            config.encoding.name()
        );
        Ok(Self { config, rules })
    }

    pub fn encoding(&self) -> AsciiCompatibleEncoding {
        self.config.encoding
    }

    /// Rewriter settings declared by the rule file, defaults otherwise.
    pub fn config(&self) -> RewriterConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Install the handlers of every rule on `rewriter`, in file order.
    pub fn register<'h, O: OutputSink>(
        &'h self,
        rewriter: &mut HtmlRewriter<'h, O>,
    ) -> Result<(), RewritingError> {
        for rule in &self.rules {
            match rule {
                Rule::Element { selector, action } => rewriter.on_selector(
                    selector,
                    ElementContentHandlers::default().element(move |el| action.apply(el)),
                )?,
                Rule::Text { selector, from, to } => {
                    let mut replacer = TextReplacer::new(from, to);
                    let handler = move |chunk: &mut TextChunk<'_>| replacer.on_chunk(chunk);
                    match selector {
                        Some(selector) => rewriter.on_selector(
                            selector,
                            ElementContentHandlers::default().text(handler),
                        )?,
                        None => rewriter
                            .on_document(DocumentContentHandlers::default().text(handler))?,
                    }
                }
                Rule::Comments { selector: Some(selector) } => rewriter.on_selector(
                    selector,
                    ElementContentHandlers::default().comments(remove_comment),
                )?,
                Rule::Comments { selector: None } => rewriter
                    .on_document(DocumentContentHandlers::default().comments(remove_comment))?,
            }
        }
        Ok(())
    }

    /// Rewrite a complete document held in memory. The input is encoded to,
    /// and the output decoded from, the rule set's encoding.
    pub fn rewrite_str(&self, html: &str) -> Result<String, RewritingError> {
        let encoding = self.config.encoding.encoding();
        let (input, _, _) = encoding.encode(html);
        let output = self.rewrite_bytes(&input)?;
        let (text, _) = encoding.decode_without_bom_handling(&output);
        Ok(text.into_owned())
    }

    /// Rewrite a complete document already in the rule set's encoding.
    pub fn rewrite_bytes(&self, input: &[u8]) -> Result<Vec<u8>, RewritingError> {
        let mut output = Vec::with_capacity(input.len());
        let mut rewriter =
            HtmlRewriter::new(self.config, |chunk: &[u8]| output.extend_from_slice(chunk));
        self.register(&mut rewriter)?;
        rewriter.write(input)?;
        rewriter.end()?;
        drop(rewriter);
        Ok(output)
    }
}

fn compile_rule(index: usize, spec: RuleSpec) -> Result<Rule, RulesError> {
    let selector = spec
        .selector
        .map(|source| {
            source
                .parse::<Selector>()
                .map_err(|err| RulesError::Selector {
                    index,
                    selector: source.clone(),
                    source: err,
                })
        })
        .transpose()?;
    let action_name = spec.action.name();
    let element = |action| match &selector {
        Some(selector) => Ok(Rule::Element {
            selector: selector.clone(),
            action,
        }),
        None => Err(RulesError::MissingSelector {
            index,
            action: action_name,
        }),
    };

    match spec.action {
        ActionSpec::SetAttribute { name, value } => {
            element(ElementAction::SetAttribute { name, value })
        }
        ActionSpec::RemoveAttribute { name } => element(ElementAction::RemoveAttribute { name }),
        ActionSpec::ReplaceInAttribute { from, .. } if from.is_empty() => {
            Err(RulesError::EmptyPattern { index })
        }
        ActionSpec::ReplaceInAttribute {
            attribute,
            from,
            to,
        } => element(ElementAction::ReplaceInAttribute {
            attribute,
            from,
            to,
        }),
        ActionSpec::SetTagName { name } => element(ElementAction::SetTagName { name }),
        ActionSpec::Before(content) => element(ElementAction::Before(content)),
        ActionSpec::After(content) => element(ElementAction::After(content)),
        ActionSpec::Prepend(content) => element(ElementAction::Prepend(content)),
        ActionSpec::Append(content) => element(ElementAction::Append(content)),
        ActionSpec::SetInnerContent(content) => element(ElementAction::SetInnerContent(content)),
        ActionSpec::Replace(content) => element(ElementAction::Replace(content)),
        ActionSpec::Remove => element(ElementAction::Remove),
        ActionSpec::RemoveAndKeepContent => element(ElementAction::RemoveAndKeepContent),
        ActionSpec::ReplaceText { from, .. } if from.is_empty() => {
            Err(RulesError::EmptyPattern { index })
        }
        ActionSpec::ReplaceText { from, to } => Ok(Rule::Text { selector, from, to }),
        ActionSpec::RemoveComments => Ok(Rule::Comments { selector }),
    }
}

use rewriter::{EncodingError, SelectorError};
use thiserror::Error;

/// Errors loading a rule set.
#[derive(Debug, Error)]
pub enum RulesError {
    #[error("invalid rule file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("rule {index}: invalid selector `{selector}`: {source}")]
    Selector {
        index: usize,
        selector: String,
        #[source]
        source: SelectorError,
    },
    #[error("rule {index}: `{action}` needs a selector")]
    MissingSelector { index: usize, action: &'static str },
    #[error("rule {index}: the text to replace can't be empty")]
    EmptyPattern { index: usize },
    #[error(transparent)]
    Encoding(#[from] EncodingError),
}

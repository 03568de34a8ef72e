//! CSS selectors matched against the stream of start tags.
//!
//! Only selectors that can be decided when a start tag is seen are
//! supported: type, universal, id, class and attribute selectors, `:not()`
//! over a compound, and the descendant and child combinators.

use std::fmt;
use std::str::FromStr;

use crate::shared::SelectorError;

pub(crate) mod matcher;
mod parser;

#[cfg(test)]
mod tests;

pub(crate) use parser::ComplexSelector;

/// A parsed selector list.
///
/// Parsing does not depend on the document, so a selector can be parsed once
/// and registered on any number of rewriters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    source: String,
    pub(crate) alternatives: Vec<ComplexSelector>,
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            source: source.to_string(),
            alternatives: parser::parse_selector_list(source)?,
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

//! Incremental selector matching.
//!
//! Every complex selector is compiled into a program: its compounds in
//! source order, with literals encoded in the document encoding. Matching
//! runs the program left to right as an NFA over the stack of open elements.
//! A state is a position in one program. When an element matches the
//! compound at a state, the selector either matches (last compound) or the
//! next state becomes active for the element's descendants or for its
//! children only, depending on the combinator in between.
//!
//! Descendant states of all open elements live in one flat vector; each
//! frame remembers its length when it was pushed, so popping is a truncate.

use memchr::memmem;

use super::Selector;
use super::parser::{AttributeOperator, Combinator, SimpleSelector};
use crate::shared::AsciiCompatibleEncoding;
use crate::tokenizer::is_html_whitespace;
use crate::units::Attribute;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Test {
    /// A literal the document encoding can't represent.
    Never,
    LocalName(Vec<u8>),
    Id(Vec<u8>),
    Class(Vec<u8>),
    AttributeExists(Vec<u8>),
    AttributeValue {
        name: Vec<u8>,
        operator: AttributeOperator,
        /// Lowercased up front when `case_insensitive` is set.
        value: Vec<u8>,
        case_insensitive: bool,
    },
    /// Matches unless every inner test matches.
    Not(Vec<Test>),
}

#[derive(Debug)]
struct Program {
    registration: usize,
    compounds: Vec<Vec<Test>>,
    combinators: Vec<Combinator>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct MatchState {
    program: u32,
    compound: u32,
}

/// Result of matching one start tag.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ElementMatch {
    /// Registrations whose selector matched, ascending.
    pub(crate) registrations: Vec<usize>,
    descendant: Vec<MatchState>,
    child: Vec<MatchState>,
}

#[derive(Debug)]
struct Frame {
    descendant_len: usize,
    child: Vec<MatchState>,
}

#[derive(Debug, Default)]
pub(crate) struct SelectorMatcher {
    programs: Vec<Program>,
    descendants: Vec<MatchState>,
    frames: Vec<Frame>,
}

impl SelectorMatcher {
    /// Compile every alternative of `selector` for `registration`.
    pub(crate) fn add(
        &mut self,
        selector: &Selector,
        registration: usize,
        encoding: AsciiCompatibleEncoding,
    ) {
        for complex in &selector.alternatives {
            self.programs.push(Program {
                registration,
                compounds: complex
                    .compounds
                    .iter()
                    .map(|compound| compile_compound(compound, encoding))
                    .collect(),
                combinators: complex.combinators.clone(),
            });
        }
    }

    /// Match a start tag against the current open element stack.
    ///
    /// `local_name` must be lowercase.
    pub(crate) fn match_element(&self, local_name: &[u8], attributes: &[Attribute<'_>]) -> ElementMatch {
        let mut result = ElementMatch::default();
        if self.programs.is_empty() {
            return result;
        }

        let roots = (0..self.programs.len()).map(|program| MatchState {
            program: program as u32,
            compound: 0,
        });
        let parent_child = self.frames.last().map(|frame| frame.child.as_slice()).unwrap_or_default();
        let mut candidates: Vec<MatchState> = roots
            .chain(self.descendants.iter().copied())
            .chain(parent_child.iter().copied())
            .collect();
        candidates.sort_unstable();
        candidates.dedup();

        let element = ElementView {
            local_name,
            attributes,
        };
        for state in candidates {
            let program = &self.programs[state.program as usize];
            let index = state.compound as usize;
            if !program.compounds[index].iter().all(|test| element.passes(test)) {
                continue;
            }
            if index + 1 == program.compounds.len() {
                result.registrations.push(program.registration);
                continue;
            }
            let next = MatchState {
                program: state.program,
                compound: state.compound + 1,
            };
            match program.combinators[index] {
                Combinator::Descendant => result.descendant.push(next),
                Combinator::Child => result.child.push(next),
            }
        }
        result.registrations.sort_unstable();
        result.registrations.dedup();

        #[cfg(any(test, feature = "debug-trace"))]
        log::trace!(
            target: "rewriter.selectors",
            "<{}> matched registrations {:?}",
            String::from_utf8_lossy(local_name),
            result.registrations
        );
        result
    }

    /// Enter the content of the element that produced `matched`.
    pub(crate) fn push(&mut self, matched: ElementMatch) {
        let descendant_len = self.descendants.len();
        for state in matched.descendant {
            if !self.descendants.contains(&state) {
                self.descendants.push(state);
            }
        }
        self.frames.push(Frame {
            descendant_len,
            child: matched.child,
        });
    }

    /// Leave the content of the innermost pushed element.
    pub(crate) fn pop(&mut self) {
        if let Some(frame) = self.frames.pop() {
            self.descendants.truncate(frame.descendant_len);
        }
    }
}

fn compile_compound(compound: &[SimpleSelector], encoding: AsciiCompatibleEncoding) -> Vec<Test> {
    compound
        .iter()
        .filter_map(|simple| compile_simple(simple, encoding))
        .collect()
}

/// `None` for selectors that match every element.
fn compile_simple(simple: &SimpleSelector, encoding: AsciiCompatibleEncoding) -> Option<Test> {
    let encode = |literal: &str| encoding.encode_strict(literal);
    let test = match simple {
        SimpleSelector::Universal => return None,
        SimpleSelector::LocalName(name) => encode(name).map(Test::LocalName),
        SimpleSelector::Id(id) => encode(id).map(Test::Id),
        SimpleSelector::Class(class) => encode(class).map(Test::Class),
        SimpleSelector::Attribute { name, value: None } => encode(name).map(Test::AttributeExists),
        SimpleSelector::Attribute {
            name,
            value: Some(matcher),
        } => encode(name).zip(encode(&matcher.value)).map(|(name, value)| {
            Test::AttributeValue {
                name,
                operator: matcher.operator,
                value: if matcher.case_insensitive {
                    value.to_ascii_lowercase()
                } else {
                    value
                },
                case_insensitive: matcher.case_insensitive,
            }
        }),
        SimpleSelector::Not(inner) => Some(Test::Not(compile_compound(inner, encoding))),
    };
    Some(test.unwrap_or(Test::Never))
}

struct ElementView<'a, 't> {
    local_name: &'a [u8],
    attributes: &'a [Attribute<'t>],
}

impl ElementView<'_, '_> {
    fn attribute(&self, name: &[u8]) -> Option<&[u8]> {
        self.attributes
            .iter()
            .find(|attr| attr.name_bytes().eq_ignore_ascii_case(name))
            .map(Attribute::value_bytes)
    }

    fn passes(&self, test: &Test) -> bool {
        match test {
            Test::Never => false,
            Test::LocalName(name) => self.local_name == name.as_slice(),
            Test::Id(id) => self.attribute(b"id") == Some(id.as_slice()),
            Test::Class(class) => self
                .attribute(b"class")
                .is_some_and(|classes| words(classes).any(|word| word == class.as_slice())),
            Test::AttributeExists(name) => self.attribute(name).is_some(),
            Test::AttributeValue {
                name,
                operator,
                value,
                case_insensitive,
            } => self.attribute(name).is_some_and(|actual| {
                if *case_insensitive {
                    value_matches(*operator, &actual.to_ascii_lowercase(), value)
                } else {
                    value_matches(*operator, actual, value)
                }
            }),
            Test::Not(inner) => !inner.iter().all(|test| self.passes(test)),
        }
    }
}

fn words(value: &[u8]) -> impl Iterator<Item = &[u8]> {
    value
        .split(|&b| is_html_whitespace(b))
        .filter(|word| !word.is_empty())
}

fn value_matches(operator: AttributeOperator, actual: &[u8], expected: &[u8]) -> bool {
    match operator {
        AttributeOperator::Equal => actual == expected,
        AttributeOperator::Includes => {
            !expected.is_empty()
                && !expected.iter().any(|&b| is_html_whitespace(b))
                && words(actual).any(|word| word == expected)
        }
        AttributeOperator::DashMatch => {
            actual == expected
                || (actual.starts_with(expected) && actual.get(expected.len()) == Some(&b'-'))
        }
        AttributeOperator::Prefix => !expected.is_empty() && actual.starts_with(expected),
        AttributeOperator::Suffix => !expected.is_empty() && actual.ends_with(expected),
        AttributeOperator::Substring => {
            !expected.is_empty() && memmem::find(actual, expected).is_some()
        }
    }
}

//! Selector grammar.
//!
//! ```text
//! list      := complex ("," complex)*
//! complex   := compound (combinator compound)*
//! combinator:= whitespace | ">"
//! compound  := (type | "*")? (id | class | attribute | negation)*
//! negation  := ":not(" compound ")"
//! ```

use std::iter::Peekable;
use std::str::Chars;

use crate::shared::SelectorError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AttributeOperator {
    /// `[attr=value]`
    Equal,
    /// `[attr~=value]`
    Includes,
    /// `[attr|=value]`
    DashMatch,
    /// `[attr^=value]`
    Prefix,
    /// `[attr$=value]`
    Suffix,
    /// `[attr*=value]`
    Substring,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ValueMatcher {
    pub(crate) operator: AttributeOperator,
    pub(crate) value: String,
    pub(crate) case_insensitive: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SimpleSelector {
    Universal,
    /// Lowercase local name.
    LocalName(String),
    Id(String),
    Class(String),
    Attribute {
        /// Lowercase attribute name.
        name: String,
        value: Option<ValueMatcher>,
    },
    Not(Vec<SimpleSelector>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ComplexSelector {
    pub(crate) compounds: Vec<Vec<SimpleSelector>>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    pub(crate) combinators: Vec<Combinator>,
}

pub(crate) fn parse_selector_list(source: &str) -> Result<Vec<ComplexSelector>, SelectorError> {
    let mut parser = Parser {
        chars: source.chars().peekable(),
    };
    let mut list = Vec::new();
    loop {
        parser.skip_whitespace();
        if matches!(parser.peek(), None | Some(',')) {
            return Err(SelectorError::EmptySelector);
        }
        list.push(parser.complex()?);
        match parser.chars.next() {
            None => return Ok(list),
            Some(',') => {}
            Some(_) => return Err(SelectorError::UnexpectedToken),
        }
    }
}

struct Parser<'s> {
    chars: Peekable<Chars<'s>>,
}

impl Parser<'_> {
    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.chars.next_if_eq(&expected).is_some()
    }

    /// Returns whether any whitespace was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let mut skipped = false;
        while self.chars.next_if(|c| is_whitespace(*c)).is_some() {
            skipped = true;
        }
        skipped
    }

    fn complex(&mut self) -> Result<ComplexSelector, SelectorError> {
        let mut compounds = vec![self.compound(false)?];
        let mut combinators = Vec::new();
        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.chars.next();
                    self.skip_whitespace();
                    if matches!(self.peek(), None | Some(',')) {
                        return Err(SelectorError::DanglingCombinator);
                    }
                    Combinator::Child
                }
                Some(c @ ('+' | '~')) => return Err(SelectorError::UnsupportedCombinator(c)),
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(_) => return Err(SelectorError::UnexpectedToken),
            };
            combinators.push(combinator);
            compounds.push(self.compound(false)?);
        }
        Ok(ComplexSelector {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self, in_negation: bool) -> Result<Vec<SimpleSelector>, SelectorError> {
        let mut simple = Vec::new();

        match self.peek() {
            Some('*') => {
                self.chars.next();
                simple.push(SimpleSelector::Universal);
            }
            Some('|') => return Err(SelectorError::NamespacedSelector),
            Some(c) if is_ident_start(c) => {
                let name = self.ident()?.ok_or(SelectorError::UnexpectedToken)?;
                simple.push(SimpleSelector::LocalName(name.to_ascii_lowercase()));
            }
            _ => {}
        }
        if self.peek() == Some('|') {
            return Err(SelectorError::NamespacedSelector);
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.chars.next();
                    let id = self.name()?.ok_or(SelectorError::UnexpectedToken)?;
                    simple.push(SimpleSelector::Id(id));
                }
                Some('.') => {
                    self.chars.next();
                    let class = self.ident()?.ok_or(SelectorError::InvalidClassName)?;
                    simple.push(SimpleSelector::Class(class));
                }
                Some('[') => {
                    self.chars.next();
                    simple.push(self.attribute()?);
                }
                Some(':') => {
                    self.chars.next();
                    simple.push(self.pseudo_class(in_negation)?);
                }
                _ => break,
            }
        }

        if simple.is_empty() {
            return Err(match self.peek() {
                None => SelectorError::UnexpectedEnd,
                Some('>' | '+' | '~') => SelectorError::DanglingCombinator,
                Some(_) => SelectorError::UnexpectedToken,
            });
        }
        Ok(simple)
    }

    fn pseudo_class(&mut self, in_negation: bool) -> Result<SimpleSelector, SelectorError> {
        if self.peek() == Some(':') {
            return Err(SelectorError::UnsupportedPseudoClassOrElement);
        }
        let name = self.ident()?.ok_or(match self.peek() {
            None => SelectorError::UnexpectedEnd,
            Some(_) => SelectorError::UnexpectedToken,
        })?;
        if !name.eq_ignore_ascii_case("not") || !self.eat('(') {
            return Err(SelectorError::UnsupportedPseudoClassOrElement);
        }
        if in_negation {
            return Err(SelectorError::NestedNegation);
        }

        self.skip_whitespace();
        if self.eat(')') {
            return Err(SelectorError::EmptyNegation);
        }
        let inner = self.compound(true)?;
        self.skip_whitespace();
        match self.chars.next() {
            Some(')') => Ok(SimpleSelector::Not(inner)),
            None => Err(SelectorError::UnexpectedEnd),
            Some(_) => Err(SelectorError::UnsupportedSyntax),
        }
    }

    fn attribute(&mut self) -> Result<SimpleSelector, SelectorError> {
        self.skip_whitespace();
        if self.peek() == Some('|') {
            return Err(SelectorError::NamespacedSelector);
        }
        let name = match self.ident()? {
            Some(name) => name.to_ascii_lowercase(),
            None if self.peek().is_none() => return Err(SelectorError::UnexpectedEnd),
            None => return Err(SelectorError::MissingAttributeName),
        };
        self.skip_whitespace();

        let operator = match self.chars.next() {
            None => return Err(SelectorError::UnexpectedEnd),
            Some(']') => return Ok(SimpleSelector::Attribute { name, value: None }),
            Some('=') => AttributeOperator::Equal,
            Some(c @ ('~' | '|' | '^' | '$' | '*')) => {
                if !self.eat('=') {
                    return Err(if c == '|' {
                        SelectorError::NamespacedSelector
                    } else {
                        SelectorError::UnexpectedTokenInAttribute
                    });
                }
                match c {
                    '~' => AttributeOperator::Includes,
                    '|' => AttributeOperator::DashMatch,
                    '^' => AttributeOperator::Prefix,
                    '$' => AttributeOperator::Suffix,
                    _ => AttributeOperator::Substring,
                }
            }
            Some(_) => return Err(SelectorError::UnexpectedTokenInAttribute),
        };

        self.skip_whitespace();
        let value = match self.peek() {
            None => return Err(SelectorError::UnexpectedEnd),
            Some(quote @ ('"' | '\'')) => {
                self.chars.next();
                self.quoted(quote)?
            }
            Some(_) => self
                .ident()?
                .ok_or(SelectorError::UnexpectedTokenInAttribute)?,
        };

        self.skip_whitespace();
        let mut case_insensitive = false;
        if let Some(flag) = self.chars.next_if(|c| matches!(*c, 'i' | 'I' | 's' | 'S')) {
            case_insensitive = flag.eq_ignore_ascii_case(&'i');
            self.skip_whitespace();
        }

        match self.chars.next() {
            Some(']') => Ok(SimpleSelector::Attribute {
                name,
                value: Some(ValueMatcher {
                    operator,
                    value,
                    case_insensitive,
                }),
            }),
            None => Err(SelectorError::UnexpectedEnd),
            Some(_) => Err(SelectorError::UnexpectedTokenInAttribute),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String, SelectorError> {
        let mut value = String::new();
        loop {
            match self.chars.next() {
                None => return Err(SelectorError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(value),
                Some('\\') => value.push(self.escape()?),
                Some(c) => value.push(c),
            }
        }
    }

    /// An identifier, or `None` if the next character can't start one.
    fn ident(&mut self) -> Result<Option<String>, SelectorError> {
        let mut lookahead = self.chars.clone();
        let starts = match lookahead.next() {
            Some('-') => lookahead.next().is_some_and(|c| is_ident_start(c) || c == '-'),
            Some(c) => is_ident_start(c),
            None => false,
        };
        if !starts {
            return Ok(None);
        }
        self.name()
    }

    /// A run of name characters, or `None` if it is empty.
    fn name(&mut self) -> Result<Option<String>, SelectorError> {
        let mut name = String::new();
        loop {
            match self.peek() {
                Some('\\') => {
                    self.chars.next();
                    name.push(self.escape()?);
                }
                Some(c) if is_name_char(c) => {
                    self.chars.next();
                    name.push(c);
                }
                _ => break,
            }
        }
        Ok((!name.is_empty()).then_some(name))
    }

    /// The part of a CSS escape after the backslash.
    fn escape(&mut self) -> Result<char, SelectorError> {
        let mut code = 0u32;
        let mut digits = 0;
        while digits < 6 {
            let Some(digit) = self.chars.next_if(char::is_ascii_hexdigit) else {
                break;
            };
            code = code * 16 + digit.to_digit(16).unwrap_or(0);
            digits += 1;
        }
        if digits > 0 {
            self.chars.next_if(|c| is_whitespace(*c));
            return Ok(char::from_u32(code)
                .filter(|&c| c != '\0')
                .unwrap_or(char::REPLACEMENT_CHARACTER));
        }
        self.chars.next().ok_or(SelectorError::UnexpectedEnd)
    }
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '\\' || !c.is_ascii()
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

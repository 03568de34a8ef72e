use super::Selector;
use super::matcher::SelectorMatcher;
use crate::shared::{AsciiCompatibleEncoding, SelectorError};
use crate::units::Attributes;

fn parse_err(source: &str) -> SelectorError {
    source
        .parse::<Selector>()
        .expect_err("selector should be rejected")
}

#[test]
fn parses_supported_grammar() {
    for source in [
        "div",
        "*",
        "#main",
        ".a.b",
        "a[href]",
        "a[href=\"x\"]",
        "a[href='x' i]",
        "[lang|=en]",
        "[class~=x]",
        "[src^=https]",
        "[src$='.png' s]",
        "[title*=foo]",
        "div:not(.hidden)",
        "ul > li",
        "body   div  p",
        "h1, h2,h3",
        "a\\:b",
    ] {
        assert!(source.parse::<Selector>().is_ok(), "{source} should parse");
    }
}

#[test]
fn display_returns_source() {
    let selector: Selector = "ul > li.item".parse().expect("valid selector");
    assert_eq!(selector.to_string(), "ul > li.item");
}

#[test]
fn reports_grammar_errors() {
    assert_eq!(parse_err(""), SelectorError::EmptySelector);
    assert_eq!(parse_err("a,"), SelectorError::EmptySelector);
    assert_eq!(parse_err("div >"), SelectorError::DanglingCombinator);
    assert_eq!(parse_err("> div"), SelectorError::DanglingCombinator);
    assert_eq!(parse_err("a + b"), SelectorError::UnsupportedCombinator('+'));
    assert_eq!(parse_err("a ~ b"), SelectorError::UnsupportedCombinator('~'));
    assert_eq!(parse_err("a:hover"), SelectorError::UnsupportedPseudoClassOrElement);
    assert_eq!(parse_err("p::before"), SelectorError::UnsupportedPseudoClassOrElement);
    assert_eq!(parse_err(":not(:not(a))"), SelectorError::NestedNegation);
    assert_eq!(parse_err(":not()"), SelectorError::EmptyNegation);
    assert_eq!(parse_err("svg|rect"), SelectorError::NamespacedSelector);
    assert_eq!(parse_err("[svg|href]"), SelectorError::NamespacedSelector);
    assert_eq!(parse_err("[=x]"), SelectorError::MissingAttributeName);
    assert_eq!(parse_err("[href=]"), SelectorError::UnexpectedTokenInAttribute);
    assert_eq!(parse_err("[href!=x]"), SelectorError::UnexpectedTokenInAttribute);
    assert_eq!(parse_err("[href"), SelectorError::UnexpectedEnd);
    assert_eq!(parse_err(".1x"), SelectorError::InvalidClassName);
    assert_eq!(parse_err("div#"), SelectorError::UnexpectedToken);
}

struct Harness {
    matcher: SelectorMatcher,
    encoding: AsciiCompatibleEncoding,
}

impl Harness {
    fn new(selectors: &[&str]) -> Self {
        let encoding = AsciiCompatibleEncoding::utf_8();
        let mut matcher = SelectorMatcher::default();
        for (registration, source) in selectors.iter().enumerate() {
            let selector: Selector = source.parse().expect("valid selector");
            matcher.add(&selector, registration, encoding);
        }
        Self { matcher, encoding }
    }

    /// Match an element and enter it.
    fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Vec<usize> {
        let matched = self.check(name, attrs);
        let registrations = matched.registrations.clone();
        self.matcher.push(matched);
        registrations
    }

    fn check(&self, name: &str, attrs: &[(&str, &str)]) -> super::matcher::ElementMatch {
        let mut attributes = Attributes::default();
        for (attr, value) in attrs {
            attributes
                .set(attr, value, self.encoding)
                .expect("valid attribute name");
        }
        self.matcher
            .match_element(name.as_bytes(), attributes.as_slice())
    }

    fn matches(&self, name: &str, attrs: &[(&str, &str)]) -> Vec<usize> {
        self.check(name, attrs).registrations
    }

    fn close(&mut self) {
        self.matcher.pop();
    }
}

#[test]
fn compound_selectors() {
    let h = Harness::new(&["div.a.b", "#main", "*", "p:not(.x)"]);
    assert_eq!(h.matches("div", &[("class", "b  a")]), vec![0, 2]);
    assert_eq!(h.matches("div", &[("class", "a")]), vec![2]);
    assert_eq!(h.matches("span", &[("id", "main")]), vec![1, 2]);
    assert_eq!(h.matches("p", &[("class", "y")]), vec![2, 3]);
    assert_eq!(h.matches("p", &[("class", "x y")]), vec![2]);
}

#[test]
fn attribute_operators() {
    let h = Harness::new(&[
        "[lang|=en]",
        "[rel~=next]",
        "[src^=https]",
        "[src$='.png']",
        "[title*=oo]",
        "[type=TEXT i]",
        "[title^='']",
    ]);
    assert_eq!(h.matches("a", &[("lang", "en-US")]), vec![0]);
    assert_eq!(h.matches("a", &[("lang", "en")]), vec![0]);
    assert_eq!(h.matches("a", &[("lang", "english")]), Vec::<usize>::new());
    assert_eq!(h.matches("a", &[("rel", "prev next")]), vec![1]);
    assert_eq!(h.matches("img", &[("src", "https://x/y.png")]), vec![2, 3]);
    assert_eq!(h.matches("a", &[("title", "foo")]), vec![4]);
    assert_eq!(h.matches("input", &[("type", "Text")]), vec![5]);
}

#[test]
fn descendant_and_child_combinators() {
    let mut h = Harness::new(&["ul li", "ul > li", "div > p span"]);
    assert!(h.open("ul", &[]).is_empty());
    assert_eq!(h.open("li", &[]), vec![0, 1]);
    assert_eq!(h.open("li", &[]), vec![0]);
    h.close();
    h.close();
    assert_eq!(h.matches("li", &[]), vec![0, 1]);
    h.close();
    assert!(h.matches("li", &[]).is_empty());

    h.open("div", &[]);
    h.open("p", &[]);
    h.open("em", &[]);
    assert_eq!(h.matches("span", &[]), vec![2]);
    h.close();
    h.close();
    h.open("section", &[]);
    h.open("p", &[]);
    assert!(h.matches("span", &[]).is_empty());
}

#[test]
fn selector_list_matches_once_per_registration() {
    let h = Harness::new(&["a, [href], a.x"]);
    assert_eq!(h.matches("a", &[("href", "#"), ("class", "x")]), vec![0]);
}

#[test]
fn unencodable_literals_never_match() {
    let encoding = AsciiCompatibleEncoding::from_label("windows-1252").expect("known label");
    let mut matcher = SelectorMatcher::default();
    let never: Selector = ".\u{4e2d}".parse().expect("valid selector");
    let negated: Selector = "p:not(.\u{4e2d})".parse().expect("valid selector");
    matcher.add(&never, 0, encoding);
    matcher.add(&negated, 1, encoding);

    let mut attributes = Attributes::default();
    attributes.set("class", "x", encoding).expect("valid name");
    let matched = matcher.match_element(b"p", attributes.as_slice());
    assert_eq!(matched.registrations, vec![1]);
}

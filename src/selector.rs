//! A small CSS selector subset.
//!
//! The page components find their elements by selector (`.nav-links a`,
//! `main section[id]`, `[data-error-for="contact-name"]`). The browser host
//! hands the selector text straight to `querySelectorAll`; the in-memory
//! [`Document`](crate::dom::Document) matches it itself. Both sides share the
//! parsed form so a typo in `config.toml` is caught at load time rather than
//! silently matching nothing.
//!
//! ## Supported Grammar
//!
//! ```text
//! selector  = compound ( whitespace compound )*      descendant combinator only
//! compound  = ( tag | "*" )? ( "#" ident | "." ident | attribute )*
//! attribute = "[" ident ( "=" ( ident | '"' text '"' | "'" text "'" ) )? "]"
//! ```
//!
//! Child (`>`), sibling (`+`, `~`) combinators, selector lists (`,`) and
//! pseudo-classes are rejected.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectorError {
    #[error("empty selector")]
    Empty,
    #[error("unexpected '{found}' at position {position} in selector `{input}`")]
    Unexpected {
        input: String,
        position: usize,
        found: char,
    },
    #[error("unterminated attribute selector in `{0}`")]
    Unterminated(String),
    #[error("expected a name at position {position} in selector `{input}`")]
    MissingName { input: String, position: usize },
}

/// Read access to an element, as needed for matching a single compound.
pub trait SelectorSubject {
    fn tag(&self) -> &str;
    fn has_class(&self, class: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<&str>;
}

/// One attribute condition: presence, or exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMatch {
    pub name: String,
    pub value: Option<String>,
}

/// A compound selector: every condition must hold for the same element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Compound {
    pub tag: Option<String>,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: Vec<AttributeMatch>,
}

impl Compound {
    pub fn matches(&self, subject: &impl SelectorSubject) -> bool {
        if let Some(tag) = &self.tag
            && !tag.eq_ignore_ascii_case(subject.tag())
        {
            return false;
        }
        if let Some(id) = &self.id
            && subject.attribute("id") != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| subject.has_class(c)) {
            return false;
        }
        self.attributes.iter().all(|attr| {
            match (subject.attribute(&attr.name), &attr.value) {
                (Some(actual), Some(expected)) => actual == expected,
                (Some(_), None) => true,
                (None, _) => false,
            }
        })
    }
}

/// A parsed selector: compounds joined by descendant combinators,
/// outermost ancestor first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: Vec<Compound>,
}

impl Selector {
    /// `[name="value"]`
    pub fn attribute_equals(name: &str, value: &str) -> Self {
        Self {
            compounds: vec![Compound {
                attributes: vec![AttributeMatch {
                    name: name.to_string(),
                    value: Some(value.to_string()),
                }],
                ..Compound::default()
            }],
        }
    }

    /// `[name]`
    pub fn attribute_present(name: &str) -> Self {
        Self {
            compounds: vec![Compound {
                attributes: vec![AttributeMatch {
                    name: name.to_string(),
                    value: None,
                }],
                ..Compound::default()
            }],
        }
    }

    /// Compounds from the outermost ancestor to the subject.
    pub fn compounds(&self) -> &[Compound] {
        &self.compounds
    }

    /// The compound the matched element itself must satisfy.
    pub fn subject(&self) -> &Compound {
        // Parsing guarantees at least one compound.
        &self.compounds[self.compounds.len() - 1]
    }

    /// Match `subject` against the selector, given its ancestors ordered from
    /// the direct parent outward.
    ///
    /// Descendant combinators are matched right to left, taking the nearest
    /// ancestor that satisfies each compound.
    pub fn matches<'a, S, I>(&self, subject: &S, ancestors: I) -> bool
    where
        S: SelectorSubject + 'a,
        I: IntoIterator<Item = &'a S>,
    {
        if !self.subject().matches(subject) {
            return false;
        }
        let mut remaining = self.compounds[..self.compounds.len() - 1].iter().rev();
        let mut wanted = remaining.next();
        for ancestor in ancestors {
            match wanted {
                Some(compound) if compound.matches(ancestor) => wanted = remaining.next(),
                Some(_) => {}
                None => break,
            }
        }
        wanted.is_none()
    }
}

impl FromStr for Selector {
    type Err = SelectorError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Parser::new(input).parse()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, compound) in self.compounds.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{compound}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bare = self.id.is_none() && self.classes.is_empty() && self.attributes.is_empty();
        match &self.tag {
            Some(tag) => f.write_str(tag)?,
            None if bare => f.write_str("*")?,
            None => {}
        }
        if let Some(id) = &self.id {
            write!(f, "#{id}")?;
        }
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        for attr in &self.attributes {
            match &attr.value {
                Some(value) => {
                    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                    write!(f, "[{}=\"{}\"]", attr.name, escaped)?
                }
                None => write!(f, "[{}]", attr.name)?,
            }
        }
        Ok(())
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

struct Parser<'a> {
    input: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn parse(mut self) -> Result<Selector, SelectorError> {
        let mut compounds = Vec::new();
        self.skip_whitespace();
        while self.pos < self.chars.len() {
            compounds.push(self.compound()?);
            self.skip_whitespace();
        }
        if compounds.is_empty() {
            return Err(SelectorError::Empty);
        }
        Ok(Selector { compounds })
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn unexpected(&self, found: char) -> SelectorError {
        SelectorError::Unexpected {
            input: self.input.to_string(),
            position: self.pos,
            found,
        }
    }

    fn name(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(SelectorError::MissingName {
                input: self.input.to_string(),
                position: start,
            });
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let mut compound = Compound::default();
        match self.peek() {
            Some('*') => self.pos += 1,
            Some(c) if is_name_char(c) => compound.tag = Some(self.name()?.to_ascii_lowercase()),
            _ => {}
        }
        while let Some(c) = self.peek() {
            match c {
                '#' => {
                    self.pos += 1;
                    compound.id = Some(self.name()?);
                }
                '.' => {
                    self.pos += 1;
                    compound.classes.push(self.name()?);
                }
                '[' => {
                    self.pos += 1;
                    compound.attributes.push(self.attribute()?);
                }
                c if c.is_whitespace() => break,
                other => return Err(self.unexpected(other)),
            }
        }
        Ok(compound)
    }

    fn attribute(&mut self) -> Result<AttributeMatch, SelectorError> {
        self.skip_whitespace();
        let name = self.name()?;
        self.skip_whitespace();
        let value = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.pos += 1;
                self.skip_whitespace();
                Some(self.attribute_value()?)
            }
            Some(other) => return Err(self.unexpected(other)),
            None => return Err(SelectorError::Unterminated(self.input.to_string())),
        };
        self.skip_whitespace();
        match self.peek() {
            Some(']') => {
                self.pos += 1;
                Ok(AttributeMatch { name, value })
            }
            Some(other) => Err(self.unexpected(other)),
            None => Err(SelectorError::Unterminated(self.input.to_string())),
        }
    }

    fn attribute_value(&mut self) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let mut value = String::new();
                loop {
                    match self.peek() {
                        Some('\\') => {
                            self.pos += 1;
                            if let Some(escaped) = self.peek() {
                                value.push(escaped);
                                self.pos += 1;
                            }
                        }
                        Some(c) if c == quote => {
                            self.pos += 1;
                            return Ok(value);
                        }
                        Some(c) => {
                            value.push(c);
                            self.pos += 1;
                        }
                        None => return Err(SelectorError::Unterminated(self.input.to_string())),
                    }
                }
            }
            _ => self.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct El {
        tag: &'static str,
        classes: Vec<&'static str>,
        attrs: Vec<(&'static str, &'static str)>,
    }

    impl El {
        fn new(tag: &'static str) -> Self {
            Self {
                tag,
                classes: vec![],
                attrs: vec![],
            }
        }
        fn class(mut self, c: &'static str) -> Self {
            self.classes.push(c);
            self
        }
        fn attr(mut self, k: &'static str, v: &'static str) -> Self {
            self.attrs.push((k, v));
            self
        }
    }

    impl SelectorSubject for El {
        fn tag(&self) -> &str {
            self.tag
        }
        fn has_class(&self, class: &str) -> bool {
            self.classes.contains(&class)
        }
        fn attribute(&self, name: &str) -> Option<&str> {
            self.attrs.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
        }
    }

    fn sel(s: &str) -> Selector {
        s.parse().unwrap()
    }

    #[test]
    fn parses_class_selector() {
        let s = sel(".nav-toggle");
        assert_eq!(s.compounds().len(), 1);
        assert_eq!(s.subject().classes, vec!["nav-toggle"]);
        assert_eq!(s.subject().tag, None);
    }

    #[test]
    fn parses_descendant_chain() {
        let s = sel("main section[id]");
        assert_eq!(s.compounds().len(), 2);
        assert_eq!(s.compounds()[0].tag.as_deref(), Some("main"));
        assert_eq!(s.subject().tag.as_deref(), Some("section"));
        assert_eq!(s.subject().attributes[0].name, "id");
        assert_eq!(s.subject().attributes[0].value, None);
    }

    #[test]
    fn parses_quoted_attribute_value() {
        let s = sel(r#"[data-error-for="contact-name"]"#);
        assert_eq!(
            s.subject().attributes[0].value.as_deref(),
            Some("contact-name")
        );
        let s = sel("[data-error-for='contact-name']");
        assert_eq!(
            s.subject().attributes[0].value.as_deref(),
            Some("contact-name")
        );
    }

    #[test]
    fn parses_compound_with_id_and_classes() {
        let s = sel("a#home.nav-link.primary");
        let c = s.subject();
        assert_eq!(c.tag.as_deref(), Some("a"));
        assert_eq!(c.id.as_deref(), Some("home"));
        assert_eq!(c.classes, vec!["nav-link", "primary"]);
    }

    #[test]
    fn tolerates_surrounding_whitespace() {
        assert_eq!(sel("  .nav-links   a  "), sel(".nav-links a"));
    }

    #[test]
    fn rejects_empty() {
        assert_eq!("".parse::<Selector>(), Err(SelectorError::Empty));
        assert_eq!("   ".parse::<Selector>(), Err(SelectorError::Empty));
    }

    #[test]
    fn rejects_child_combinator() {
        let err = "nav > a".parse::<Selector>().unwrap_err();
        assert!(matches!(err, SelectorError::Unexpected { found: '>', .. }));
    }

    #[test]
    fn rejects_selector_list_and_pseudo_class() {
        assert!("a, b".parse::<Selector>().is_err());
        assert!("a:hover".parse::<Selector>().is_err());
    }

    #[test]
    fn rejects_unterminated_attribute() {
        assert!(matches!(
            "[data-x".parse::<Selector>(),
            Err(SelectorError::Unterminated(_))
        ));
        assert!(matches!(
            "[data-x=\"abc".parse::<Selector>(),
            Err(SelectorError::Unterminated(_))
        ));
    }

    #[test]
    fn rejects_dangling_class_dot() {
        assert!(matches!(
            "a.".parse::<Selector>(),
            Err(SelectorError::MissingName { .. })
        ));
    }

    #[test]
    fn display_round_trips_to_css() {
        for text in [
            ".nav-toggle",
            ".nav-links a",
            "main section[id]",
            "[data-error-for=\"contact-email\"]",
            "a#home.primary",
        ] {
            assert_eq!(sel(text).to_string(), text);
        }
    }

    #[test]
    fn display_of_universal_selector() {
        assert_eq!(sel("*").to_string(), "*");
    }

    #[test]
    fn attribute_equals_builds_value_match() {
        let s = Selector::attribute_equals("data-error-for", "contact-email");
        assert_eq!(s.to_string(), "[data-error-for=\"contact-email\"]");
    }

    #[test]
    fn display_escapes_backslash_and_quote() {
        let s = Selector::attribute_equals("data-error-for", r#"a\b"c"#);
        assert_eq!(s.to_string(), r#"[data-error-for="a\\b\"c"]"#);
        let reparsed: Selector = s.to_string().parse().unwrap();
        assert_eq!(reparsed, s);
    }

    #[test]
    fn compound_matches_tag_case_insensitively() {
        assert!(sel("SECTION").subject().matches(&El::new("section")));
    }

    #[test]
    fn attribute_presence_and_value() {
        let with_id = El::new("section").attr("id", "about");
        let without = El::new("section");
        assert!(sel("section[id]").subject().matches(&with_id));
        assert!(!sel("section[id]").subject().matches(&without));
        assert!(sel("[id=about]").subject().matches(&with_id));
        assert!(!sel("[id=projects]").subject().matches(&with_id));
    }

    #[test]
    fn id_selector_matches_id_attribute() {
        let el = El::new("div").attr("id", "contact-status");
        assert!(sel("#contact-status").subject().matches(&el));
        assert!(!sel("#contact-form").subject().matches(&el));
    }

    #[test]
    fn descendant_requires_matching_ancestor() {
        let link = El::new("a").attr("href", "#about");
        let list = El::new("ul").class("nav-links");
        let nav = El::new("nav");
        let header = El::new("header");

        let s = sel(".nav-links a");
        assert!(s.matches(&link, [&list, &nav]));
        assert!(!s.matches(&link, [&nav, &header]));
    }

    #[test]
    fn descendant_skips_non_matching_ancestors() {
        let section = El::new("section").attr("id", "about");
        let wrapper = El::new("div").class("wrapper");
        let main = El::new("main");
        assert!(sel("main section[id]").matches(&section, [&wrapper, &main]));
    }

    #[test]
    fn descendant_chain_must_follow_order() {
        let a = El::new("a");
        let inner = El::new("nav");
        let outer = El::new("header");
        assert!(sel("header nav a").matches(&a, [&inner, &outer]));
        assert!(!sel("nav header a").matches(&a, [&inner, &outer]));
    }
}

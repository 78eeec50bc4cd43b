// SPDX-License-Identifier: PMPL-1.0-or-later

//! Structured LDML paths.
//!
//! An [`XPath`] is an ordered list of [`Element`]s, each with a name and
//! attributes, rendered canonically as
//! `//ldml/numbers/currencies/currency[@type="EUR"]/displayName[@count="one"]`.
//!
//! Paths are immutable: every attribute edit returns a new path. Attributes
//! are kept sorted by name within each element, so the order they were
//! written in never matters. Two paths are equal exactly when their canonical
//! renderings are equal, which is what the alias table's prefix matching and
//! cycle detection depend on.

mod relative;

pub use relative::resolve_relative;

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Errors raised by the path model.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path must start with '//': {path}")]
    MissingRoot { path: String },

    #[error("empty element at position {position} in {path}")]
    EmptyElement { path: String, position: usize },

    #[error("unterminated attribute quote in {path}")]
    UnterminatedQuote { path: String },

    #[error("malformed attribute syntax '{segment}' in {path}")]
    MalformedAttribute { path: String, segment: String },

    #[error("element index {index} out of range for path of length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("attribute value may not contain a double quote: {value}")]
    InvalidValue { value: String },

    #[error("relative path '{relative}' climbs above the root of {base}")]
    RelativeEscapesRoot { base: String, relative: String },
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"^\[@([^=\]"\[]+)="([^"]*)"\]"#).expect("attribute pattern is a valid regex")
    })
}

/// One step of a path: element name plus its attributes.
///
/// Attributes are sorted by name once the element is part of an [`XPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Set (or, with `None`, remove) an attribute.
    fn set_attribute(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                if let Some(slot) = self.attributes.iter_mut().find(|(key, _)| key == name) {
                    slot.1 = value.to_string();
                } else {
                    self.attributes.push((name.to_string(), value.to_string()));
                }
            }
            None => self.attributes.retain(|(key, _)| key != name),
        }
    }

    fn normalize(&mut self) {
        self.attributes.sort_by(|a, b| a.0.cmp(&b.0));
    }

    fn render_into(&self, out: &mut String) {
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push_str("[@");
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(value);
            out.push_str("\"]");
        }
    }
}

/// A parsed, canonical LDML path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct XPath {
    elements: Vec<Element>,
    canonical: String,
}

impl XPath {
    /// Parse a path string such as `//ldml/units/unit[@type="length-meter"]`.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let body = input.strip_prefix("//").ok_or_else(|| PathError::MissingRoot {
            path: input.to_string(),
        })?;

        let elements = split_segments(input, body)?
            .into_iter()
            .enumerate()
            .map(|(position, segment)| parse_element(input, position, segment))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::from_elements(elements))
    }

    /// Build a path from already-structured elements.
    pub fn from_elements(mut elements: Vec<Element>) -> Self {
        elements.iter_mut().for_each(Element::normalize);
        let canonical = render(&elements);
        Self {
            elements,
            canonical,
        }
    }

    /// Canonical string form.
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Index of the first element with the given name.
    pub fn element_index(&self, name: &str) -> Option<usize> {
        self.elements.iter().position(|element| element.name == name)
    }

    /// Index of the first element carrying `attribute`.
    pub fn attribute_element_index(&self, attribute: &str) -> Option<usize> {
        self.elements
            .iter()
            .position(|element| element.has_attribute(attribute))
    }

    /// Number of elements carrying `attribute`.
    pub fn attribute_occurrences(&self, attribute: &str) -> usize {
        self.elements
            .iter()
            .filter(|element| element.has_attribute(attribute))
            .count()
    }

    pub fn attribute(&self, index: usize, attribute: &str) -> Option<&str> {
        self.elements
            .get(index)
            .and_then(|element| element.attribute(attribute))
    }

    /// Return a copy with `attribute` on element `index` set to `value`, or
    /// removed when `value` is `None`.
    pub fn with_attribute(
        &self,
        index: usize,
        attribute: &str,
        value: Option<&str>,
    ) -> Result<Self, PathError> {
        if index >= self.elements.len() {
            return Err(PathError::IndexOutOfRange {
                index,
                len: self.elements.len(),
            });
        }
        if let Some(value) = value {
            if value.contains('"') {
                return Err(PathError::InvalidValue {
                    value: value.to_string(),
                });
            }
        }
        let mut elements = self.elements.clone();
        elements[index].set_attribute(attribute, value);
        Ok(Self::from_elements(elements))
    }

    /// The first `len` elements as a path of their own.
    pub fn truncated(&self, len: usize) -> Self {
        Self::from_elements(self.elements.iter().take(len).cloned().collect())
    }
}

fn render(elements: &[Element]) -> String {
    let mut out = String::from("/");
    for element in elements {
        out.push('/');
        element.render_into(&mut out);
    }
    out
}

/// Split on `/` outside of quoted attribute values.
fn split_segments<'a>(input: &str, body: &'a str) -> Result<Vec<&'a str>, PathError> {
    let mut segments = Vec::new();
    let mut in_quote = false;
    let mut start = 0;
    for (offset, ch) in body.char_indices() {
        match ch {
            '"' => in_quote = !in_quote,
            '/' if !in_quote => {
                segments.push(&body[start..offset]);
                start = offset + 1;
            }
            _ => {}
        }
    }
    if in_quote {
        return Err(PathError::UnterminatedQuote {
            path: input.to_string(),
        });
    }
    segments.push(&body[start..]);
    Ok(segments)
}

fn parse_element(input: &str, position: usize, segment: &str) -> Result<Element, PathError> {
    let name_end = segment.find('[').unwrap_or(segment.len());
    let name = &segment[..name_end];
    if name.is_empty() {
        return Err(PathError::EmptyElement {
            path: input.to_string(),
            position,
        });
    }
    if name.contains([']', '"', '@', '=']) {
        return Err(PathError::MalformedAttribute {
            path: input.to_string(),
            segment: segment.to_string(),
        });
    }

    let mut element = Element::new(name);
    let mut rest = &segment[name_end..];
    while !rest.is_empty() {
        let captures = attribute_pattern()
            .captures(rest)
            .ok_or_else(|| PathError::MalformedAttribute {
                path: input.to_string(),
                segment: segment.to_string(),
            })?;
        let key = &captures[1];
        if element.has_attribute(key) {
            return Err(PathError::MalformedAttribute {
                path: input.to_string(),
                segment: segment.to_string(),
            });
        }
        element.attributes.push((key.to_string(), captures[2].to_string()));
        rest = &rest[captures[0].len()..];
    }
    Ok(element)
}

impl PartialEq for XPath {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for XPath {}

impl Hash for XPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for XPath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for XPath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for XPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for XPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        XPath::parse(s)
    }
}

impl TryFrom<String> for XPath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        XPath::parse(&value)
    }
}

impl From<XPath> for String {
    fn from(path: XPath) -> Self {
        path.canonical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_canonical_form() {
        let raw = r#"//ldml/numbers/currencies/currency[@type="EUR"]/displayName[@count="one"]"#;
        let path = XPath::parse(raw).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(path.as_str(), raw);
        assert_eq!(path.elements()[3].name(), "currency");
        assert_eq!(path.attribute(4, "count"), Some("one"));
    }

    #[test]
    fn test_parse_keeps_slashes_inside_quotes() {
        let raw = r#"//ldml/dates/calendars/calendar[@type="buddhist"]/alias[@source="locale"][@path="../calendar[@type='gregorian']"]"#;
        let path = XPath::parse(raw).unwrap();
        assert_eq!(path.len(), 5);
        assert_eq!(
            path.attribute(4, "path"),
            Some("../calendar[@type='gregorian']")
        );
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        assert!(matches!(
            XPath::parse("ldml/a"),
            Err(PathError::MissingRoot { .. })
        ));
        assert!(matches!(
            XPath::parse("//ldml//a"),
            Err(PathError::EmptyElement { position: 1, .. })
        ));
        assert!(matches!(
            XPath::parse(r#"//ldml/a[@x="1]"#),
            Err(PathError::UnterminatedQuote { .. })
        ));
        assert!(matches!(
            XPath::parse(r#"//ldml/a[@x=1]"#),
            Err(PathError::MalformedAttribute { .. })
        ));
        assert!(matches!(
            XPath::parse(r#"//ldml/a[@x="1"][@x="2"]"#),
            Err(PathError::MalformedAttribute { .. })
        ));
    }

    #[test]
    fn test_with_attribute_produces_new_path() {
        let path = XPath::parse(r#"//ldml/units/unit[@type="meter"]/unitPattern[@count="few"][@case="genitive"]"#).unwrap();
        let other = path.with_attribute(3, "count", Some("other")).unwrap();
        assert_eq!(
            other.as_str(),
            r#"//ldml/units/unit[@type="meter"]/unitPattern[@case="genitive"][@count="other"]"#
        );
        let gendered = path.with_attribute(3, "gender", Some("feminine")).unwrap();
        assert_eq!(
            gendered.as_str(),
            r#"//ldml/units/unit[@type="meter"]/unitPattern[@case="genitive"][@count="few"][@gender="feminine"]"#
        );
        let stripped = path.with_attribute(3, "count", None).unwrap();
        assert_eq!(
            stripped.as_str(),
            r#"//ldml/units/unit[@type="meter"]/unitPattern[@case="genitive"]"#
        );
        // the receiver is untouched
        assert_eq!(path.attribute(3, "count"), Some("few"));
    }

    #[test]
    fn test_attribute_order_is_canonical() {
        let written = XPath::parse(r#"//ldml/units/unitPattern[@count="one"][@case="genitive"]"#).unwrap();
        let reordered = XPath::parse(r#"//ldml/units/unitPattern[@case="genitive"][@count="one"]"#).unwrap();
        assert_eq!(written, reordered);
        assert_eq!(written.as_str(), reordered.as_str());
        assert_eq!(
            written.as_str(),
            r#"//ldml/units/unitPattern[@case="genitive"][@count="one"]"#
        );

        let mut element = Element::new("unitPattern");
        element.attributes.push(("count".to_string(), "one".to_string()));
        element.attributes.push(("case".to_string(), "genitive".to_string()));
        let built = XPath::from_elements(vec![Element::new("ldml"), Element::new("units"), element]);
        assert_eq!(built, written);
    }

    #[test]
    fn test_with_attribute_validates_input() {
        let path = XPath::parse("//ldml/a").unwrap();
        assert!(matches!(
            path.with_attribute(5, "alt", Some("short")),
            Err(PathError::IndexOutOfRange { index: 5, len: 2 })
        ));
        assert!(matches!(
            path.with_attribute(1, "alt", Some("a\"b")),
            Err(PathError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_attribute_queries() {
        let path = XPath::parse(r#"//ldml/a[@count="one"]/b/c[@count="two"]"#).unwrap();
        assert_eq!(path.attribute_element_index("count"), Some(1));
        assert_eq!(path.attribute_occurrences("count"), 2);
        assert_eq!(path.attribute_element_index("alt"), None);
        assert_eq!(path.element_index("b"), Some(2));
        assert_eq!(path.truncated(2).as_str(), r#"//ldml/a[@count="one"]"#);
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let path = XPath::parse(r#"//ldml/a[@alt="short"]"#).unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#""//ldml/a[@alt=\"short\"]""#);
        let back: XPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}

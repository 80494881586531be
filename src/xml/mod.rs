//! # XML Module
//!
//! Parses feed XML into a nested key/value tree. The tree follows the
//! convention the rest of the crate relies on:
//! - attributes live in [`XmlElement::attributes`] (the `$` key)
//! - text lives in [`XmlElement::text`] (the `_` key) when the element also
//!   has attributes or children; a bare text element collapses to
//!   [`XmlValue::Text`]
//! - a repeated sibling becomes [`XmlValue::List`], a single one does not,
//!   so callers expecting 0..N entries go through [`force_array`]

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use std::collections::BTreeMap;

use crate::common::{SheetsError, SheetsResult};


/// A parsed child value
#[derive(Debug, Clone, PartialEq)]
pub enum XmlValue {
    Text(String),
    Element(XmlElement),
    List(Vec<XmlValue>),
}

/// An element that carries attributes and/or child elements
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub text: Option<String>,
    pub children: Vec<(String, XmlValue)>,
}

impl XmlValue {
    /// Text content, whichever shape the value collapsed to
    pub fn text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(s) => Some(s),
            XmlValue::Element(e) => e.text.as_deref(),
            XmlValue::List(items) => items.first().and_then(XmlValue::text),
        }
    }

    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlValue::Element(e) => Some(e),
            _ => None,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.as_element().and_then(|e| e.attr(name))
    }
}

impl XmlElement {
    fn new(name: String) -> Self {
        Self {
            name,
            ..Default::default()
        }
    }

    pub fn get(&self, name: &str) -> Option<&XmlValue> {
        self.children
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(XmlValue::text)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Adds a child, turning a repeated name into a list
    fn push_child(&mut self, name: String, value: XmlValue) {
        if let Some((_, existing)) = self.children.iter_mut().find(|(key, _)| *key == name) {
            match existing {
                XmlValue::List(items) => items.push(value),
                other => {
                    let first = std::mem::replace(other, XmlValue::List(Vec::new()));
                    *other = XmlValue::List(vec![first, value]);
                }
            }
        } else {
            self.children.push((name, value));
        }
    }

    fn into_value(self) -> XmlValue {
        if self.attributes.is_empty() && self.children.is_empty() {
            XmlValue::Text(self.text.unwrap_or_default())
        } else {
            XmlValue::Element(self.finish())
        }
    }

    /// Drops whitespace-only text from elements that have structure
    fn finish(mut self) -> Self {
        let has_structure = !self.attributes.is_empty() || !self.children.is_empty();
        if has_structure && self.text.as_deref().map_or(false, |t| t.trim().is_empty()) {
            self.text = None;
        }
        self
    }
}

/// Wraps a single value in a one-element list; a missing value yields an
/// empty list
pub fn force_array(value: Option<&XmlValue>) -> Vec<&XmlValue> {
    match value {
        Some(XmlValue::List(items)) => items.iter().collect(),
        Some(other) => vec![other],
        None => Vec::new(),
    }
}

fn start_element(e: &BytesStart<'_>) -> SheetsResult<XmlElement> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attr in e.attributes() {
        let attr = attr.map_err(|e| SheetsError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        element.attributes.insert(key, value);
    }
    Ok(element)
}

fn append_text(stack: &mut [XmlElement], text: &str) {
    if let Some(current) = stack.last_mut() {
        current.text.get_or_insert_with(String::new).push_str(text);
    }
}

/// Parses an XML document and returns its root element
pub fn parse(text: &str) -> SheetsResult<XmlElement> {
    let mut reader = Reader::from_str(text);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(start_element(&e)?),
            Event::Empty(e) => {
                let element = start_element(&e)?;
                match stack.last_mut() {
                    Some(parent) => parent.push_child(element.name.clone(), element.into_value()),
                    None => root = Some(element.finish()),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| SheetsError::Parse("unexpected closing tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.push_child(element.name.clone(), element.into_value()),
                    None => root = Some(element.finish()),
                }
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                append_text(&mut stack, &text);
            }
            Event::CData(c) => {
                let text = String::from_utf8_lossy(&c).into_owned();
                append_text(&mut stack, &text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(SheetsError::Parse("unclosed element at end of document".to_string()));
    }

    root.ok_or_else(|| SheetsError::Parse("document has no root element".to_string()))
}

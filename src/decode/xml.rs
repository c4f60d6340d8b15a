//! XML decoding for gene and protein fetches
//!
//! Record elements are converted into JSON values so that records decoded from
//! XML and from JSON expose the same pointer-based field access:
//!
//! - an element without attributes or child elements becomes its trimmed text
//! - any other element becomes an object; attributes are keyed `@name`, child
//!   elements by tag (repeated tags collect into an array), and text under `#text`

use roxmltree::{Document, Node, ParsingOptions};
use serde_json::{Map, Value};

use super::PayloadDecoder;
use crate::errors::DecodeError;
use crate::transport::RawResponse;

/// Decodes an XML record set into one JSON value per record element
///
/// The result keeps document order, so for batch fetches it lines up with the
/// requested identifiers unless the service dropped some of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XmlRecordDecoder {
    set: &'static str,
    record: &'static str,
}

impl XmlRecordDecoder {
    /// Decoder for `record` elements directly under a `set` root element
    pub const fn new(set: &'static str, record: &'static str) -> Self {
        Self { set, record }
    }

    /// `Entrezgene` records in an `Entrezgene-Set`
    pub const fn gene() -> Self {
        Self::new("Entrezgene-Set", "Entrezgene")
    }

    /// GenPept `GBSeq` records in a `GBSet`
    pub const fn protein() -> Self {
        Self::new("GBSet", "GBSeq")
    }

    pub fn set_tag(&self) -> &'static str {
        self.set
    }

    pub fn record_tag(&self) -> &'static str {
        self.record
    }
}

impl PayloadDecoder for XmlRecordDecoder {
    type Output = Vec<Value>;

    fn decode(&self, raw: &RawResponse) -> Result<Self::Output, DecodeError> {
        let document = parse_xml(raw)?;
        let root = document.root_element();
        reject_service_error(root)?;

        let tag = root.tag_name().name();
        if tag != self.set {
            return Err(DecodeError::validation(format!(
                "expected <{}>, got <{tag}>",
                self.set
            )));
        }

        Ok(root
            .children()
            .filter(|node| node.has_tag_name(self.record))
            .map(element_to_value)
            .collect())
    }
}

/// Parses an XML body, classifying failures for the retry coordinator
///
/// Document type declarations are accepted (E-utilities responses carry one) but
/// external DTDs are never fetched.
pub(crate) fn parse_xml(raw: &RawResponse) -> Result<Document<'_>, DecodeError> {
    let body = raw.body().trim();
    if body.is_empty() {
        return Err(DecodeError::incomplete("empty response body"));
    }
    if !body.starts_with('<') {
        let preview: String = body.chars().take(60).collect();
        return Err(DecodeError::not_structured(format!(
            "expected XML, got '{preview}'"
        )));
    }

    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(body, options).map_err(|error| match error {
        roxmltree::Error::UnexpectedEndOfStream | roxmltree::Error::UnclosedRootNode => {
            DecodeError::incomplete(error.to_string())
        }
        other => DecodeError::corrupted(other.to_string()),
    })
}

/// Text of the first child element named `tag`
pub(crate) fn child_text<'a>(node: Node<'a, '_>, tag: &str) -> Option<&'a str> {
    node.children()
        .find(|child| child.has_tag_name(tag))
        .and_then(|child| child.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
}

// The service reports some failures with a 200 status and an <ERROR> element.
pub(crate) fn reject_service_error(root: Node<'_, '_>) -> Result<(), DecodeError> {
    let message = if root.has_tag_name("ERROR") {
        root.text().map(str::trim)
    } else {
        child_text(root, "ERROR")
    };
    match message {
        Some(message) => Err(DecodeError::validation(message)),
        None => Ok(()),
    }
}

fn element_to_value(node: Node<'_, '_>) -> Value {
    let has_children = node.children().any(|child| child.is_element());
    let has_attributes = node.attributes().next().is_some();
    let text: String = node
        .children()
        .filter(|child| child.is_text())
        .filter_map(|child| child.text())
        .collect();
    let text = text.trim();

    if !has_children && !has_attributes {
        return Value::String(text.to_string());
    }

    let mut object = Map::new();
    for attribute in node.attributes() {
        object.insert(
            format!("@{}", attribute.name()),
            Value::String(attribute.value().to_string()),
        );
    }
    for child in node.children().filter(|child| child.is_element()) {
        let key = child.tag_name().name().to_string();
        let value = element_to_value(child);
        match object.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                object.insert(key, value);
            }
        }
    }
    if !text.is_empty() {
        object.insert("#text".to_string(), Value::String(text.to_string()));
    }
    Value::Object(object)
}

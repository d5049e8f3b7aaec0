//! Plist XML document handling
//!
//! Wraps a `roxmltree` DOM and exposes the handful of traversal helpers the
//! builders need: tag classification, element-only children, next-sibling
//! lookup and text payloads.

use std::borrow::Cow;
use std::fmt;

use roxmltree::{Document, Node, ParsingOptions};

use crate::error::{Error, ParseError, Result};
use crate::limits::Limits;

/// Element names of the plist vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `<dict>`
    Dict,
    /// `<array>`
    Array,
    /// `<key>`
    Key,
    /// `<string>`
    String,
    /// `<real>`
    Real,
    /// `<integer>`
    Integer,
    /// `<date>`
    Date,
    /// `<data>`
    Data,
    /// `<true/>`
    True,
    /// `<false/>`
    False,
}

impl Tag {
    /// Classify an element name; `None` for anything outside the plist vocabulary
    pub fn from_name(name: &str) -> Option<Self> {
        let tag = match name {
            "dict" => Tag::Dict,
            "array" => Tag::Array,
            "key" => Tag::Key,
            "string" => Tag::String,
            "real" => Tag::Real,
            "integer" => Tag::Integer,
            "date" => Tag::Date,
            "data" => Tag::Data,
            "true" => Tag::True,
            "false" => Tag::False,
            _ => return None,
        };
        Some(tag)
    }

    /// The element name as written in the document
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Dict => "dict",
            Tag::Array => "array",
            Tag::Key => "key",
            Tag::String => "string",
            Tag::Real => "real",
            Tag::Integer => "integer",
            Tag::Date => "date",
            Tag::Data => "data",
            Tag::True => "true",
            Tag::False => "false",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed plist XML document
pub struct PlistDocument<'input> {
    doc: Document<'input>,
}

impl<'input> PlistDocument<'input> {
    /// Parse a plist document from bytes, which must be UTF-8
    pub fn from_bytes(xml: &'input [u8], limits: &Limits) -> Result<Self> {
        limits.check_input_size(xml.len())?;
        let text = std::str::from_utf8(xml)
            .map_err(|e| Error::Xml(format!("input is not valid UTF-8: {}", e)))?;
        Self::parse(text)
    }

    /// Parse a plist document from text
    pub fn parse(text: &'input str) -> Result<Self> {
        // Plist files carry a DOCTYPE declaration
        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let doc = Document::parse_with_options(text, options)
            .map_err(|e| Error::Xml(format!("failed to parse XML: {}", e)))?;

        let root = doc.root_element();
        if root.tag_name().name() != "plist" {
            log::debug!(
                "document element is <{}>, expected <plist>",
                root.tag_name().name()
            );
        }

        Ok(Self { doc })
    }

    /// The single top-level value: first element child of the document element
    pub fn value(&self) -> Result<Node<'_, 'input>> {
        let root = self.doc.root_element();
        root.first_element_child().ok_or_else(|| {
            ParseError::new("plist has no value")
                .with_location(location(root))
                .into()
        })
    }
}

/// Plist tag of an element node
pub fn tag_of(node: Node<'_, '_>) -> Option<Tag> {
    if node.is_element() {
        Tag::from_name(node.tag_name().name())
    } else {
        None
    }
}

/// Element children in document order, skipping text and comments
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.is_element())
}

/// Next sibling that is an element
pub fn next_element<'a, 'input>(node: Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    node.next_sibling_element()
}

/// Character data of an element, concatenated across comments and CDATA
pub fn text_content<'a>(node: Node<'a, '_>) -> Cow<'a, str> {
    let mut parts = node.children().filter(|n| n.is_text()).filter_map(|n| n.text());
    match parts.next() {
        None => Cow::Borrowed(""),
        Some(first) => match parts.next() {
            None => Cow::Borrowed(first),
            Some(second) => {
                let mut text = String::from(first);
                text.push_str(second);
                parts.for_each(|p| text.push_str(p));
                Cow::Owned(text)
            }
        },
    }
}

/// `line:column` of the start of a node
pub fn location(node: Node<'_, '_>) -> String {
    let pos = node.document().text_pos_at(node.range().start);
    format!("{}:{}", pos.row, pos.col)
}

/// A parse error pointing at `node`, with its markup as source
pub fn malformed(node: Node<'_, '_>, message: impl Into<String>) -> ParseError {
    let name = node.tag_name().name();
    let text = text_content(node);
    let source = if text.is_empty() {
        format!("<{}/>", name)
    } else {
        format!("<{}>{}</{}>", name, text, name)
    };
    ParseError::new(message)
        .with_location(location(node))
        .with_source(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLIST: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>name</key>
    <string>demo</string>
    <!-- a comment -->
    <key>count</key>
    <integer>3</integer>
</dict>
</plist>
"#;

    #[test]
    fn test_parse_with_doctype() {
        let doc = PlistDocument::parse(PLIST).unwrap();
        let value = doc.value().unwrap();
        assert_eq!(tag_of(value), Some(Tag::Dict));
    }

    #[test]
    fn test_element_children_skip_whitespace_and_comments() {
        let doc = PlistDocument::parse(PLIST).unwrap();
        let value = doc.value().unwrap();
        let tags: Vec<_> = element_children(value).filter_map(tag_of).collect();
        assert_eq!(tags, vec![Tag::Key, Tag::String, Tag::Key, Tag::Integer]);
    }

    #[test]
    fn test_next_element_skips_comments() {
        let doc = PlistDocument::parse(PLIST).unwrap();
        let value = doc.value().unwrap();
        let string = element_children(value).nth(1).unwrap();
        let key = next_element(string).unwrap();
        assert_eq!(text_content(key), "count");
    }

    #[test]
    fn test_text_content_unescapes_entities() {
        let doc = PlistDocument::parse("<plist><string>a &amp; b</string></plist>").unwrap();
        assert_eq!(text_content(doc.value().unwrap()), "a & b");
    }

    #[test]
    fn test_text_content_of_empty_element() {
        let doc = PlistDocument::parse("<plist><string/></plist>").unwrap();
        assert_eq!(text_content(doc.value().unwrap()), "");
    }

    #[test]
    fn test_empty_plist_has_no_value() {
        let doc = PlistDocument::parse("<plist version=\"1.0\"></plist>").unwrap();
        let err = doc.value().unwrap_err();
        assert!(err.is_malformed_input());
        assert!(err.to_string().contains("plist has no value"));
    }

    #[test]
    fn test_invalid_xml() {
        let err = PlistDocument::parse("<plist><dict></plist>").err().unwrap();
        assert!(matches!(err, Error::Xml(_)));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = PlistDocument::from_bytes(&[0x3c, 0xff, 0xfe], &Limits::default())
            .err()
            .unwrap();
        assert!(matches!(err, Error::Xml(_)));
    }

    #[test]
    fn test_input_size_limit() {
        let limits = Limits {
            max_input_size: 8,
            ..Limits::default()
        };
        let err = PlistDocument::from_bytes(b"<plist><dict/></plist>", &limits)
            .err()
            .unwrap();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }

    #[test]
    fn test_malformed_reports_location_and_source() {
        let doc = PlistDocument::parse("<plist>\n<integer>NaN</integer></plist>").unwrap();
        let err = malformed(doc.value().unwrap(), "invalid integer");
        assert_eq!(err.location.as_deref(), Some("2:1"));
        assert_eq!(err.source.as_deref(), Some("<integer>NaN</integer>"));
    }

    #[test]
    fn test_tag_names_round_trip() {
        for name in [
            "dict", "array", "key", "string", "real", "integer", "date", "data", "true", "false",
        ] {
            assert_eq!(Tag::from_name(name).unwrap().as_str(), name);
        }
        assert_eq!(Tag::from_name("plist"), None);
    }
}

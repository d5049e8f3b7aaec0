//! Typed plist tree
//!
//! The compact renderer works on this intermediate representation instead of
//! the raw DOM: every element is classified once, numbers are parsed, and
//! dictionary values carry their key as the node name.

use roxmltree::Node;

use crate::converters::{ConvertConfig, Walker};
use crate::documents::{element_children, malformed, tag_of, text_content, Tag};
use crate::error::{ParseError, Result};

/// Kind of a typed node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `<true/>` or `<false/>`
    Bool,
    /// `<dict>`
    Dict,
    /// `<string>`
    String,
    /// `<array>`
    Array,
    /// `<real>`
    Real,
    /// `<integer>`
    Integer,
    /// `<date>`
    Date,
    /// `<data>`
    Data,
}

impl Kind {
    /// Name given to a node of this kind that was not reached through a key
    pub fn default_name(&self) -> &'static str {
        match self {
            Kind::Bool => "Bool",
            Kind::Dict => "",
            Kind::String => "String",
            Kind::Array => "array",
            Kind::Real => "Real",
            Kind::Integer => "Integer",
            Kind::Date => "Date",
            Kind::Data => "Data",
        }
    }
}

/// Payload of a typed node
#[derive(Debug, Clone, PartialEq)]
pub enum PlistValue {
    /// Boolean
    Bool(bool),
    /// Dictionary entries in document order, each named by its key
    Dict(Vec<PlistNode>),
    /// String text, verbatim
    String(String),
    /// Array members in document order
    Array(Vec<PlistNode>),
    /// Floating point number
    Real(f64),
    /// Signed integer
    Integer(i64),
    /// Date text, verbatim
    Date(String),
    /// Base64 payload as written, line breaks included
    Data(String),
}

impl PlistValue {
    /// Kind of this value
    pub fn kind(&self) -> Kind {
        match self {
            PlistValue::Bool(_) => Kind::Bool,
            PlistValue::Dict(_) => Kind::Dict,
            PlistValue::String(_) => Kind::String,
            PlistValue::Array(_) => Kind::Array,
            PlistValue::Real(_) => Kind::Real,
            PlistValue::Integer(_) => Kind::Integer,
            PlistValue::Date(_) => Kind::Date,
            PlistValue::Data(_) => Kind::Data,
        }
    }
}

/// A node of the typed tree
#[derive(Debug, Clone, PartialEq)]
pub struct PlistNode {
    /// Key text for dictionary entries, otherwise the kind's default name
    pub name: String,
    /// Payload
    pub value: PlistValue,
}

impl PlistNode {
    /// Create an unnamed node; its name is the kind's default
    pub fn new(value: PlistValue) -> Self {
        Self {
            name: value.kind().default_name().to_string(),
            value,
        }
    }

    /// Create a node with an explicit name
    pub fn named(name: impl Into<String>, value: PlistValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// Kind of this node
    pub fn kind(&self) -> Kind {
        self.value.kind()
    }

    /// Child nodes of a container, empty for leaves
    pub fn children(&self) -> &[PlistNode] {
        match &self.value {
            PlistValue::Dict(items) | PlistValue::Array(items) => items,
            _ => &[],
        }
    }
}

/// A built node and the element following the consumed markup
type Built<'a, 'input> = (PlistNode, Option<Node<'a, 'input>>);

/// Builds the typed tree from the plist DOM
#[derive(Debug, Clone, Copy)]
pub struct TreeBuilder {
    walker: Walker,
}

impl TreeBuilder {
    /// Create a builder for the given configuration
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            walker: Walker::new(config),
        }
    }

    /// Build the typed tree rooted at the plist's top-level value
    pub fn build(&self, value: Node<'_, '_>) -> Result<PlistNode> {
        match self.build_node(value, 1)? {
            Some((node, _)) => Ok(node),
            None => Err(malformed(value, "top-level value is not a plist element").into()),
        }
    }

    /// Build one node.
    ///
    /// Returns `None` for skipped elements. For a `<key>`, the returned
    /// sibling is the element after the consumed value.
    fn build_node<'a, 'input>(
        &self,
        xml: Node<'a, 'input>,
        depth: usize,
    ) -> Result<Option<Built<'a, 'input>>> {
        let tag = match tag_of(xml) {
            Some(tag) => tag,
            None => {
                self.walker.unrecognized(xml)?;
                return Ok(None);
            }
        };

        let value = match tag {
            Tag::Key => return self.build_entry(xml, depth),
            Tag::Dict => {
                self.walker.enter(depth)?;
                let mut entries = Vec::new();
                for entry in self.walker.entries(xml)? {
                    if let Some((node, _)) = self.build_node(entry, depth + 1)? {
                        entries.push(node);
                    }
                }
                return Ok(Some((PlistNode::new(PlistValue::Dict(entries)), xml.next_sibling_element())));
            }
            Tag::Array => {
                self.walker.enter(depth)?;
                let mut items = Vec::new();
                for child in element_children(xml) {
                    if let Some((node, _)) = self.build_node(child, depth + 1)? {
                        items.push(node);
                    }
                }
                return Ok(Some((PlistNode::new(PlistValue::Array(items)), xml.next_sibling_element())));
            }
            Tag::True => PlistValue::Bool(true),
            Tag::False => PlistValue::Bool(false),
            Tag::String => PlistValue::String(text_content(xml).into_owned()),
            Tag::Date => PlistValue::Date(text_content(xml).into_owned()),
            Tag::Data => PlistValue::Data(text_content(xml).into_owned()),
            Tag::Real => PlistValue::Real(parse_real(xml)?),
            Tag::Integer => PlistValue::Integer(parse_integer(xml)?),
        };

        Ok(Some((PlistNode::new(value), None)))
    }

    /// Build the value following a `<key>` and name it after the key
    fn build_entry<'a, 'input>(
        &self,
        key: Node<'a, 'input>,
        depth: usize,
    ) -> Result<Option<Built<'a, 'input>>> {
        let value = self.walker.key_value(key)?;
        let after = value.next_sibling_element();

        Ok(self.build_node(value, depth)?.map(|(mut node, _)| {
            node.name = text_content(key).into_owned();
            (node, after)
        }))
    }
}

fn parse_real(xml: Node<'_, '_>) -> std::result::Result<f64, ParseError> {
    let text = text_content(xml);
    let value = text
        .trim()
        .parse::<f64>()
        .map_err(|e| malformed(xml, format!("invalid real: {}", e)))?;

    // JSON has no representation for NaN or the infinities
    if !value.is_finite() {
        return Err(malformed(xml, "real is not a finite number"));
    }
    Ok(value)
}

fn parse_integer(xml: Node<'_, '_>) -> std::result::Result<i64, ParseError> {
    text_content(xml)
        .trim()
        .parse::<i64>()
        .map_err(|e| malformed(xml, format!("invalid integer: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::PlistDocument;
    use crate::error::Error;
    use crate::limits::Limits;

    fn build(xml: &str) -> Result<PlistNode> {
        build_with(xml, &ConvertConfig::default())
    }

    fn build_with(xml: &str, config: &ConvertConfig) -> Result<PlistNode> {
        let doc = PlistDocument::parse(xml)?;
        TreeBuilder::new(config).build(doc.value()?)
    }

    #[test]
    fn test_build_dict_names_entries_by_key() {
        let node = build(
            "<plist><dict>\
                <key>name</key><string>demo</string>\
                <key>enabled</key><true/>\
                <key>ratio</key><real>0.5</real>\
             </dict></plist>",
        )
        .unwrap();

        assert_eq!(node.kind(), Kind::Dict);
        assert_eq!(node.name, "");
        assert_eq!(
            node.children(),
            &[
                PlistNode::named("name", PlistValue::String("demo".into())),
                PlistNode::named("enabled", PlistValue::Bool(true)),
                PlistNode::named("ratio", PlistValue::Real(0.5)),
            ]
        );
    }

    #[test]
    fn test_build_array_keeps_order_and_default_names() {
        let node = build(
            "<plist><array><integer>3</integer><false/><date>2021-01-01T00:00:00Z</date></array></plist>",
        )
        .unwrap();

        assert_eq!(node.kind(), Kind::Array);
        assert_eq!(node.name, "array");
        let names: Vec<_> = node.children().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Integer", "Bool", "Date"]);
        assert_eq!(node.children()[0].value, PlistValue::Integer(3));
        assert_eq!(node.children()[1].value, PlistValue::Bool(false));
    }

    #[test]
    fn test_build_nested_containers() {
        let node = build(
            "<plist><dict>\
                <key>list</key><array><dict><key>x</key><integer>-7</integer></dict></array>\
             </dict></plist>",
        )
        .unwrap();

        let list = &node.children()[0];
        assert_eq!(list.name, "list");
        assert_eq!(list.kind(), Kind::Array);

        let inner = &list.children()[0];
        assert_eq!(inner.name, "");
        assert_eq!(inner.children()[0], PlistNode::named("x", PlistValue::Integer(-7)));
    }

    #[test]
    fn test_data_is_kept_raw() {
        let node = build("<plist><array><data>\n  AAAA\n  BBBB\n</data></array></plist>").unwrap();
        assert_eq!(
            node.children()[0].value,
            PlistValue::Data("\n  AAAA\n  BBBB\n".into())
        );
    }

    #[test]
    fn test_invalid_integer_is_malformed() {
        let err = build("<plist><dict><key>a</key><integer>NaN</integer></dict></plist>").unwrap_err();
        assert!(err.is_malformed_input());
        assert!(err.to_string().contains("invalid integer"));
    }

    #[test]
    fn test_invalid_real_is_malformed() {
        let err = build("<plist><array><real>1.2.3</real></array></plist>").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_non_finite_real_is_malformed() {
        for text in ["nan", "inf", "-infinity", "1e400"] {
            let xml = format!("<plist><array><real>{}</real></array></plist>", text);
            assert!(build(&xml).unwrap_err().is_malformed_input(), "{}", text);
        }
    }

    #[test]
    fn test_numbers_tolerate_surrounding_whitespace() {
        let node = build("<plist><array><integer> 42 </integer><real>\n1.5\n</real></array></plist>")
            .unwrap();
        assert_eq!(node.children()[0].value, PlistValue::Integer(42));
        assert_eq!(node.children()[1].value, PlistValue::Real(1.5));
    }

    #[test]
    fn test_unrecognized_elements_are_skipped() {
        let node = build(
            "<plist><dict>\
                <key>a</key><blob/>\
                <key>b</key><string>kept</string>\
             </dict></plist>",
        )
        .unwrap();
        assert_eq!(
            node.children(),
            &[PlistNode::named("b", PlistValue::String("kept".into()))]
        );
    }

    #[test]
    fn test_unrecognized_elements_rejected_when_strict() {
        let config = ConvertConfig::default().with_strict(true);
        let err = build_with("<plist><array><blob/></array></plist>", &config).unwrap_err();
        assert!(err.is_malformed_input());
    }

    #[test]
    fn test_value_in_key_position_is_built_by_default() {
        let node = build("<plist><dict><string>a</string><string>b</string></dict></plist>").unwrap();
        assert_eq!(
            node.children(),
            &[PlistNode::named("String", PlistValue::String("a".into()))]
        );
    }

    #[test]
    fn test_depth_limit() {
        let config = ConvertConfig::default().with_limits(Limits {
            max_depth: 2,
            ..Limits::default()
        });
        assert!(build_with("<plist><array><array/></array></plist>", &config).is_ok());

        let err = build_with("<plist><array><array><array/></array></array></plist>", &config)
            .unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }

    #[test]
    fn test_key_returns_sibling_after_value() {
        let doc = PlistDocument::parse(
            "<plist><dict><key>a</key><integer>1</integer><key>b</key><integer>2</integer></dict></plist>",
        )
        .unwrap();
        let builder = TreeBuilder::new(&ConvertConfig::default());
        let key = element_children(doc.value().unwrap()).next().unwrap();

        let (node, next) = builder.build_node(key, 1).unwrap().unwrap();
        assert_eq!(node, PlistNode::named("a", PlistValue::Integer(1)));
        assert_eq!(text_content(next.unwrap()), "b");
    }
}

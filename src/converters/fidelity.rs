//! High-Fidelity Renderer
//!
//! Renders straight from the DOM, describing every node with its original
//! tag so the output can be mapped back onto the plist:
//!
//! ```text
//! <integer>5</integer>          {"type":"integer","value":"5"}
//! <key>a</key><true/>           {"k":"a","v":{"type":"bool","value":"true"}}
//! <array>...</array>            {"type":"array","value":[...]}
//! ```
//!
//! Leaf values are always strings; no numeric parsing happens in this mode.

use std::borrow::Cow;

use roxmltree::Node;
use serde::Serialize;

use super::base::{to_json, trim_data, ConvertConfig, Walker};
use super::PlistRenderer;
use crate::documents::{element_children, malformed, tag_of, text_content, Tag};
use crate::error::Result;

/// One rendered node
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Fragment<'a> {
    /// A dictionary entry
    Entry {
        k: Cow<'a, str>,
        v: Box<Fragment<'a>>,
    },
    /// Any value, tagged with its plist type
    Typed {
        #[serde(rename = "type")]
        kind: &'static str,
        value: Payload<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Payload<'a> {
    Text(Cow<'a, str>),
    Items(Vec<Fragment<'a>>),
}

/// Tag-preserving renderer over the DOM
#[derive(Debug, Clone, Copy, Default)]
pub struct FidelityRenderer;

impl FidelityRenderer {
    /// Create a new high-fidelity renderer
    pub fn new() -> Self {
        Self
    }

    fn fragment<'a>(
        &self,
        walker: &Walker,
        xml: Node<'a, '_>,
        depth: usize,
    ) -> Result<Option<Fragment<'a>>> {
        let tag = match tag_of(xml) {
            Some(tag) => tag,
            None => {
                walker.unrecognized(xml)?;
                return Ok(None);
            }
        };

        let fragment = match tag {
            Tag::Key => {
                let value = walker.key_value(xml)?;
                match self.fragment(walker, value, depth)? {
                    Some(v) => Fragment::Entry {
                        k: text_content(xml),
                        v: Box::new(v),
                    },
                    None => return Ok(None),
                }
            }
            Tag::Dict => {
                walker.enter(depth)?;
                let mut entries = Vec::new();
                for entry in walker.entries(xml)? {
                    entries.extend(self.fragment(walker, entry, depth + 1)?);
                }
                typed("dict", Payload::Items(entries))
            }
            Tag::Array => {
                walker.enter(depth)?;
                let mut items = Vec::new();
                for child in element_children(xml) {
                    items.extend(self.fragment(walker, child, depth + 1)?);
                }
                typed("array", Payload::Items(items))
            }
            Tag::True | Tag::False => typed("bool", Payload::Text(Cow::Borrowed(tag.as_str()))),
            Tag::String | Tag::Real | Tag::Integer | Tag::Date => {
                typed(tag.as_str(), Payload::Text(text_content(xml)))
            }
            Tag::Data => typed("data", Payload::Text(Cow::Owned(trim_data(&text_content(xml))))),
        };

        Ok(Some(fragment))
    }
}

fn typed<'a>(kind: &'static str, value: Payload<'a>) -> Fragment<'a> {
    Fragment::Typed { kind, value }
}

impl PlistRenderer for FidelityRenderer {
    fn render(&self, value: Node<'_, '_>, config: &ConvertConfig) -> Result<String> {
        let walker = Walker::new(config);
        match self.fragment(&walker, value, 1)? {
            Some(fragment) => to_json(&fragment, config),
            None => Err(malformed(value, "top-level value is not a plist element").into()),
        }
    }

    fn preserves_tags(&self) -> bool {
        true
    }
}

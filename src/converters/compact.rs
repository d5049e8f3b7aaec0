//! Compact Renderer
//!
//! Renders the typed tree as natural JSON:
//! - dictionaries become objects keyed by the plist keys
//! - arrays become arrays
//! - booleans and numbers become bare literals
//! - strings, dates and data become strings
//!
//! The `integer`/`real` distinction and the `date`/`data` tags do not
//! survive; use the high-fidelity renderer when they matter.

use roxmltree::Node;
use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::value::RawValue;

use super::base::{to_json, trim_data, ConvertConfig};
use super::PlistRenderer;
use crate::error::Result;
use crate::nodes::{PlistNode, PlistValue, TreeBuilder};

/// Serialization view of a typed node.
///
/// Only dictionary members contribute their name, as the object key. The
/// root and array members are written bare. Map entries are streamed, so
/// repeated keys reach the output as they appear in the plist.
struct Compact<'a>(&'a PlistNode);

impl Serialize for Compact<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let node = self.0;
        match &node.value {
            PlistValue::Bool(value) => serializer.serialize_bool(*value),
            PlistValue::Integer(value) => serializer.serialize_i64(*value),
            // `Display` keeps whole reals bare (`3`, not `3.0`)
            PlistValue::Real(value) => RawValue::from_string(value.to_string())
                .map_err(S::Error::custom)?
                .serialize(serializer),
            PlistValue::String(text) | PlistValue::Date(text) => serializer.serialize_str(text),
            PlistValue::Data(raw) => serializer.serialize_str(&trim_data(raw)),
            PlistValue::Array(_) => {
                let mut seq = serializer.serialize_seq(Some(node.children().len()))?;
                for item in node.children() {
                    seq.serialize_element(&Compact(item))?;
                }
                seq.end()
            }
            PlistValue::Dict(_) => {
                let mut map = serializer.serialize_map(Some(node.children().len()))?;
                for entry in node.children() {
                    map.serialize_entry(&entry.name, &Compact(entry))?;
                }
                map.end()
            }
        }
    }
}

/// Type-inferring renderer over the typed tree
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactRenderer;

impl CompactRenderer {
    /// Create a new compact renderer
    pub fn new() -> Self {
        Self
    }

    /// Render a typed tree as JSON, indented when `config` asks for pretty JSON
    pub fn render_tree(&self, tree: &PlistNode, config: &ConvertConfig) -> Result<String> {
        to_json(&Compact(tree), config)
    }
}

impl PlistRenderer for CompactRenderer {
    fn render(&self, value: Node<'_, '_>, config: &ConvertConfig) -> Result<String> {
        let tree = TreeBuilder::new(config).build(value)?;
        self.render_tree(&tree, config)
    }

    fn preserves_tags(&self) -> bool {
        false
    }
}

//! Plist converters
//!
//! This module turns a parsed plist document into JSON text, and from there
//! into the requested target format.
//!
//! Supported strategies:
//! - Compact: natural JSON with types inferred from the plist tags (lossy)
//! - High fidelity: every node keeps its tag as `{"type":..,"value":..}`

mod base;
mod compact;
mod fidelity;

pub use base::{to_json, trim_data, ConvertConfig, Fidelity, Target, Walker};
pub use compact::CompactRenderer;
pub use fidelity::FidelityRenderer;

use roxmltree::Node;

use crate::documents::PlistDocument;
use crate::error::Result;
use crate::exports;

/// Trait for strategies that render a plist value as JSON text
pub trait PlistRenderer {
    /// Render the plist's top-level value element as minified JSON
    fn render(&self, value: Node<'_, '_>, config: &ConvertConfig) -> Result<String>;

    /// Returns true if the original tag of every node survives rendering
    fn preserves_tags(&self) -> bool;
}

/// Create a renderer for the given strategy
pub fn create_renderer(fidelity: Fidelity) -> Box<dyn PlistRenderer> {
    match fidelity {
        Fidelity::Compact => Box::new(CompactRenderer::new()),
        Fidelity::High => Box::new(FidelityRenderer::new()),
    }
}

/// Convert plist XML bytes into the configured target format
pub fn convert(xml: &[u8], config: &ConvertConfig) -> Result<Vec<u8>> {
    let doc = PlistDocument::from_bytes(xml, config.limits())?;
    convert_document(&doc, config).map(String::into_bytes)
}

/// Convert plist XML text into the configured target format
pub fn convert_str(xml: &str, config: &ConvertConfig) -> Result<String> {
    config.limits().check_input_size(xml.len())?;
    let doc = PlistDocument::parse(xml)?;
    convert_document(&doc, config)
}

/// Convert an already parsed document
pub fn convert_document(doc: &PlistDocument<'_>, config: &ConvertConfig) -> Result<String> {
    let value = doc.value()?;
    log::debug!(
        "converting <{}> to {} ({})",
        value.tag_name().name(),
        config.target(),
        config.fidelity()
    );

    let renderer = create_renderer(config.fidelity());
    let json = renderer.render(value, config)?;
    log::debug!(
        "rendered {} bytes of JSON (plist tags {})",
        json.len(),
        if renderer.preserves_tags() { "kept" } else { "dropped" }
    );
    exports::finish(json, config)
}

//! Output post-processing
//!
//! The renderers produce JSON, already indented when pretty JSON was asked
//! for. This module applies the target-specific pass on top: none for JSON,
//! transcoding for YAML.

use serde::Deserialize;
use serde_json::Value as JsonValue;

use crate::converters::{ConvertConfig, Target};
use crate::error::Result;

/// Apply the target's post-pass to rendered JSON
pub fn finish(json: String, config: &ConvertConfig) -> Result<String> {
    match config.target() {
        Target::Json => Ok(json),
        Target::Yaml => {
            if config.pretty() {
                log::debug!("pretty printing does not apply to YAML output");
            }
            json_to_yaml(&json)
        }
    }
}

/// Transcode JSON text into YAML.
///
/// Nesting is bounded by the converter's depth limit before JSON is ever
/// produced, so the parser's own recursion limit is lifted here.
pub fn json_to_yaml(json: &str) -> Result<String> {
    let mut deserializer = serde_json::Deserializer::from_str(json);
    deserializer.disable_recursion_limit();
    let value = JsonValue::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(serde_yaml::to_string(&value)?)
}

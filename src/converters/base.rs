//! Base converter types
//!
//! Conversion configuration, plus the traversal rules and text helpers that
//! both rendering strategies share.

use std::fmt;
use std::str::FromStr;

use roxmltree::Node;
use serde::Serialize;

use crate::documents::{element_children, malformed, next_element, tag_of, Tag};
use crate::error::{Error, Result};
use crate::limits::Limits;

/// Output format of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// JSON text, minified unless pretty printing is requested
    #[default]
    Json,
    /// YAML text, transcoded from the JSON rendering
    Yaml,
}

impl FromStr for Target {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Target::Json),
            "yaml" | "yml" => Ok(Target::Yaml),
            other => Err(Error::UnsupportedTarget(other.to_string())),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Json => f.write_str("json"),
            Target::Yaml => f.write_str("yaml"),
        }
    }
}

/// Rendering strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fidelity {
    /// Native JSON types inferred from the plist tags
    #[default]
    Compact,
    /// Every node rendered as `{"type":..,"value":..}`, keeping its tag
    High,
}

impl fmt::Display for Fidelity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fidelity::Compact => f.write_str("compact"),
            Fidelity::High => f.write_str("high-fidelity"),
        }
    }
}

/// Configuration for a conversion
#[derive(Debug, Clone, Default)]
pub struct ConvertConfig {
    /// Output format
    target: Target,
    /// Rendering strategy
    fidelity: Fidelity,
    /// Whether to indent JSON output (ignored for YAML)
    pretty: bool,
    /// Whether to reject structure the renderers would otherwise tolerate
    strict: bool,
    /// Resource limits
    limits: Limits,
}

impl ConvertConfig {
    /// Create a configuration for the given target with default settings
    pub fn new(target: Target) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }

    /// Set the output target
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Set the rendering strategy
    pub fn with_fidelity(mut self, fidelity: Fidelity) -> Self {
        self.fidelity = fidelity;
        self
    }

    /// Select high-fidelity (`true`) or compact (`false`) rendering
    pub fn with_high_fidelity(self, high: bool) -> Self {
        self.with_fidelity(if high { Fidelity::High } else { Fidelity::Compact })
    }

    /// Set whether JSON output is indented
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// Set strict structure checking
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Set the resource limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Get the output target
    pub fn target(&self) -> Target {
        self.target
    }

    /// Get the rendering strategy
    pub fn fidelity(&self) -> Fidelity {
        self.fidelity
    }

    /// Check if high-fidelity rendering is selected
    pub fn is_high_fidelity(&self) -> bool {
        self.fidelity == Fidelity::High
    }

    /// Check if JSON output should be indented
    pub fn pretty(&self) -> bool {
        self.pretty
    }

    /// Check if strict structure checking is enabled
    pub fn strict(&self) -> bool {
        self.strict
    }

    /// Get the resource limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }
}

/// Traversal rules over the plist DOM shared by both renderers
#[derive(Debug, Clone, Copy)]
pub struct Walker {
    strict: bool,
    limits: Limits,
}

impl Walker {
    /// Create a walker honouring the config's strictness and limits
    pub fn new(config: &ConvertConfig) -> Self {
        Self {
            strict: config.strict(),
            limits: *config.limits(),
        }
    }

    /// Check that a container at `depth` may be entered
    pub fn enter(&self, depth: usize) -> Result<()> {
        self.limits.check_depth(depth)
    }

    /// Dictionary entry elements: the children at even positions.
    ///
    /// Each of these is normally a `<key>` whose value is its next sibling.
    pub fn entries<'a, 'input>(&self, dict: Node<'a, 'input>) -> Result<Vec<Node<'a, 'input>>> {
        let children: Vec<_> = element_children(dict).collect();

        if self.strict {
            if children.len() % 2 != 0 {
                return Err(malformed(dict, "dict has an odd number of elements").into());
            }
            if let Some(bad) = children.iter().step_by(2).find(|c| tag_of(**c) != Some(Tag::Key)) {
                return Err(malformed(
                    *bad,
                    format!("expected <key>, found <{}>", bad.tag_name().name()),
                )
                .into());
            }
        }

        Ok(children.into_iter().step_by(2).collect())
    }

    /// The value element belonging to a `<key>`.
    ///
    /// A key directly followed by another key has no value, in either mode.
    pub fn key_value<'a, 'input>(&self, key: Node<'a, 'input>) -> Result<Node<'a, 'input>> {
        let value = next_element(key).ok_or_else(|| malformed(key, "key has no value"))?;
        if tag_of(value) == Some(Tag::Key) {
            return Err(malformed(value, "key is followed by another key").into());
        }
        Ok(value)
    }

    /// Handle an element outside the plist vocabulary: an error when strict,
    /// otherwise skipped
    pub fn unrecognized(&self, node: Node<'_, '_>) -> Result<()> {
        let name = node.tag_name().name();
        if self.strict {
            return Err(malformed(node, format!("unrecognized element <{}>", name)).into());
        }
        log::warn!(
            "skipping unrecognized element <{}> at {}",
            name,
            crate::documents::location(node)
        );
        Ok(())
    }
}

/// Collapse a line-wrapped `data` payload into one line.
///
/// Each line is stripped of surrounding whitespace and the lines are joined
/// in order. Already trimmed payloads come back unchanged.
pub fn trim_data(raw: &str) -> String {
    raw.lines().map(str::trim).collect()
}

/// Serialize a rendered tree as JSON text.
///
/// Indented with two spaces when the config asks for pretty JSON, minified
/// otherwise. YAML targets always get minified JSON to transcode.
pub fn to_json<T: Serialize + ?Sized>(value: &T, config: &ConvertConfig) -> Result<String> {
    let json = if config.target() == Target::Json && config.pretty() {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

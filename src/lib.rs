//! # plistconv
//!
//! Convert Apple XML property lists into JSON or YAML.
//!
//! Two rendering strategies are available:
//!
//! - **Compact** (default): natural JSON. Dictionaries become objects,
//!   numbers and booleans become bare literals, everything else a string.
//! - **High fidelity**: every node is written as
//!   `{"type":<tag>,"value":...}` so the original plist types survive.
//!
//! YAML output is produced by transcoding the JSON rendering.
//!
//! ## Example
//!
//! ```rust
//! use plistconv::{convert_str, ConvertConfig, Target};
//!
//! let xml = "<plist><dict><key>a</key><true/></dict></plist>";
//!
//! let json = convert_str(xml, &ConvertConfig::new(Target::Json))?;
//! assert_eq!(json, r#"{"a":true}"#);
//!
//! let yaml = convert_str(xml, &ConvertConfig::new(Target::Yaml))?;
//! assert_eq!(yaml, "a: true\n");
//! # Ok::<(), plistconv::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;

pub mod documents;
pub mod loaders;
pub mod nodes;

pub mod converters;
pub mod exports;

// Re-exports for convenience
pub use converters::{convert, convert_str, ConvertConfig, Fidelity, Target};
pub use error::{Error, Result};
pub use limits::Limits;

/// Version of the plistconv library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

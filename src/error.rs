//! Error types for plistconv
//!
//! This module defines all error types used throughout the library.

use std::fmt;
use thiserror::Error;

/// Result type alias using plistconv Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for plist conversion
#[derive(Error, Debug)]
pub enum Error {
    /// The input is not well-formed XML (or not UTF-8)
    #[error("XML error: {0}")]
    Xml(String),

    /// Well-formed XML that does not describe a usable plist value
    #[error("malformed input: {0}")]
    Parse(#[from] ParseError),

    /// Requested output target is not implemented
    #[error("unsupported target: {0}")]
    UnsupportedTarget(String),

    /// JSON serialization or re-parsing failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON to YAML transcoding failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Input could not be obtained
    #[error("resource error: {0}")]
    Resource(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for errors caused by the content of the input document
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Error::Xml(_) | Error::Parse(_))
    }
}

/// Malformed plist content with context
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Position in the document, as `line:column`
    pub location: Option<String>,
    /// Markup that caused the error
    pub source: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            source: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, " at {}", loc)?;
        }

        if let Some(ref src) = self.source {
            write!(f, " in `{}`", src)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

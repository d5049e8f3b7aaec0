//! Input loading utilities
//!
//! Reads plist input from a file, or from standard input when it is piped.

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::limits::Limits;

/// Input loader bounded by resource limits
#[derive(Debug, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Load from `path`, or from standard input when no path is given
    pub fn load(&self, path: Option<&Path>) -> Result<Vec<u8>> {
        match path {
            Some(path) => self.load_file(path),
            None => {
                let stdin = io::stdin();
                if stdin.is_terminal() {
                    return Err(no_input());
                }
                self.load_reader(stdin.lock())
            }
        }
    }

    /// Load a file
    pub fn load_file(&self, path: &Path) -> Result<Vec<u8>> {
        let metadata = fs::metadata(path).map_err(|e| {
            Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
        })?;
        self.limits.check_input_size(metadata.len() as usize)?;

        fs::read(path).map_err(|e| {
            Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
        })
    }

    /// Load everything a reader yields; empty input counts as no input
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Vec<u8>> {
        let mut content = Vec::new();
        let max = self.limits.max_input_size as u64;
        reader.take(max.saturating_add(1)).read_to_end(&mut content)?;

        self.limits.check_input_size(content.len())?;
        if content.is_empty() {
            return Err(no_input());
        }

        Ok(content)
    }
}

fn no_input() -> Error {
    Error::Resource("no input: pass --input <FILE> or pipe a plist on standard input".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "<plist><array/></plist>").unwrap();

        let loader = Loader::new();
        let content = loader.load(Some(file.path())).unwrap();

        assert_eq!(content, b"<plist><array/></plist>\n");
    }

    #[test]
    fn test_load_missing_file() {
        let loader = Loader::new();
        let err = loader.load_file(Path::new("/nonexistent/input.plist")).unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
        assert!(err.to_string().contains("/nonexistent/input.plist"));
    }

    #[test]
    fn test_load_from_reader() {
        let loader = Loader::new();
        let content = loader.load_reader(&b"<plist><dict/></plist>"[..]).unwrap();
        assert_eq!(content, b"<plist><dict/></plist>");
    }

    #[test]
    fn test_empty_reader_is_no_input() {
        let err = Loader::new().load_reader(io::empty()).unwrap_err();
        assert!(err.to_string().contains("no input"));
    }

    #[test]
    fn test_size_limit() {
        let mut file = NamedTempFile::new().unwrap();
        let large_content = "x".repeat(11 * 1024 * 1024); // 11 MB
        write!(file, "{}", large_content).unwrap();

        let loader = Loader::new().with_limits(Limits::strict());

        // Strict limits (10 MB max) should reject 11MB input
        assert!(loader.load(Some(file.path())).is_err());
        assert!(loader.load_reader(large_content.as_bytes()).is_err());
    }
}

//! Document locations and formats
//!
//! A descriptor is read either from a file or from inline text. The
//! document format is taken from the file extension when there is one and
//! sniffed from the content otherwise.

use std::fmt;
use std::path::{Path, PathBuf};

/// Where a document comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// Inline document text
    String(String),
}

impl Location {
    /// Create a file location
    pub fn path(path: impl AsRef<Path>) -> Self {
        Location::Path(path.as_ref().to_path_buf())
    }

    /// Create an inline location
    pub fn text(text: impl Into<String>) -> Self {
        Location::String(text.into())
    }

    /// Check if this is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Location::Path(_))
    }

    /// Format implied by the file extension, if any
    pub fn format_hint(&self) -> Option<DocumentFormat> {
        match self {
            Location::Path(p) => p
                .extension()
                .and_then(|e| e.to_str())
                .and_then(DocumentFormat::from_extension),
            Location::String(_) => None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(p) => write!(f, "{}", p.display()),
            Location::String(_) => write!(f, "<inline>"),
        }
    }
}

/// Serialization format of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// YAML (also accepts JSON, which is a YAML subset)
    #[default]
    Yaml,
    /// JSON
    Json,
}

impl DocumentFormat {
    /// Format for a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(DocumentFormat::Yaml),
            "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }

    /// Guess the format from the first non-blank character
    pub fn sniff(content: &str) -> Self {
        match content.trim_start().chars().next() {
            Some('{') | Some('[') => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::Yaml => write!(f, "yaml"),
            DocumentFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hint_from_extension() {
        assert_eq!(Location::path("vnfd.yaml").format_hint(), Some(DocumentFormat::Yaml));
        assert_eq!(Location::path("vnfd.YML").format_hint(), Some(DocumentFormat::Yaml));
        assert_eq!(Location::path("vnfd.json").format_hint(), Some(DocumentFormat::Json));
        assert_eq!(Location::path("vnfd.txt").format_hint(), None);
        assert_eq!(Location::text("a: 1").format_hint(), None);
    }

    #[test]
    fn test_sniff() {
        assert_eq!(DocumentFormat::sniff("  {\"a\": 1}"), DocumentFormat::Json);
        assert_eq!(DocumentFormat::sniff("a: 1"), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::sniff(""), DocumentFormat::Yaml);
    }

    #[test]
    fn test_display() {
        assert_eq!(Location::path("/tmp/x.yaml").to_string(), "/tmp/x.yaml");
        assert_eq!(Location::text("a: 1").to_string(), "<inline>");
        assert!(Location::path("x").is_file());
    }
}

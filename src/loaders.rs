//! Document loading
//!
//! This module reads descriptor documents from files or inline text into
//! [`Tree`]s, enforcing the configured [`Limits`].

use crate::documents::{from_json_str, from_yaml_str, Tree};
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::{DocumentFormat, Location};
use std::fs;
use tracing::debug;

/// Document loader
#[derive(Debug, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
    /// Format forced by the caller, overriding detection
    format: Option<DocumentFormat>,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Force a document format
    pub fn with_format(mut self, format: DocumentFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Get the limits
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Load a document as text
    pub fn load_text(&self, location: &Location) -> Result<String> {
        let content = match location {
            Location::Path(path) => fs::read_to_string(path).map_err(|e| {
                Error::Resource(format!("failed to read file '{}': {}", path.display(), e))
            })?,
            Location::String(s) => s.clone(),
        };

        self.limits.check_document_size(content.len())?;
        Ok(content)
    }

    /// Load and parse a document
    pub fn load(&self, location: &Location) -> Result<Tree> {
        let content = self.load_text(location)?;
        let format = self
            .format
            .or_else(|| location.format_hint())
            .unwrap_or_else(|| DocumentFormat::sniff(&content));
        debug!(%location, %format, bytes = content.len(), "loading document");

        let tree = match format {
            DocumentFormat::Yaml => from_yaml_str(&content)?,
            DocumentFormat::Json => from_json_str(&content)?,
        };

        self.check_tree(&tree)?;
        Ok(tree)
    }

    fn check_tree(&self, tree: &Tree) -> Result<()> {
        self.limits.check_depth(tree.depth())?;
        check_entries(tree, &self.limits)
    }
}

fn check_entries(tree: &Tree, limits: &Limits) -> Result<()> {
    match tree {
        Tree::Map(map) => {
            limits.check_entries(map.len())?;
            map.values().try_for_each(|v| check_entries(v, limits))
        }
        Tree::Seq(items) => {
            limits.check_entries(items.len())?;
            items.iter().try_for_each(|v| check_entries(v, limits))
        }
        Tree::Scalar(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "vnfd:\n  id: test").unwrap();

        let tree = Loader::new().load(&Location::path(file.path())).unwrap();
        assert_eq!(
            tree.get("vnfd").and_then(|v| v.get("id")).and_then(Tree::as_str),
            Some("test")
        );
    }

    #[test]
    fn test_load_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{\"vnfd\": {{\"id\": \"j\"}}}}").unwrap();

        let tree = Loader::new().load(&Location::path(file.path())).unwrap();
        assert_eq!(tree.get("vnfd").and_then(|v| v.get("id")).and_then(Tree::as_str), Some("j"));
    }

    #[test]
    fn test_load_inline_json_is_sniffed() {
        let tree = Loader::new().load(&Location::text("[1, 2]")).unwrap();
        assert_eq!(tree.as_seq().map(|s| s.len()), Some(2));
    }

    #[test]
    fn test_missing_file() {
        let err = Loader::new()
            .load(&Location::path("/nonexistent/vnfd.yaml"))
            .unwrap_err();
        assert!(matches!(err, Error::Resource(_)));
    }

    #[test]
    fn test_size_limit() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "a: '{}'", "x".repeat(2 * 1024 * 1024)).unwrap();

        let result = Loader::new()
            .with_limits(Limits::strict())
            .load(&Location::path(file.path()));
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }

    #[test]
    fn test_depth_limit() {
        let deep = "[".repeat(100) + &"]".repeat(100);
        let result = Loader::new()
            .with_limits(Limits::strict())
            .with_format(DocumentFormat::Json)
            .load(&Location::text(deep));
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }
}

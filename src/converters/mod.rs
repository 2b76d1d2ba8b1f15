//! Descriptor converters
//!
//! This module provides the converters between the two descriptor
//! dialects:
//! - [`Sol6Converter`]: TOSCA (SOL001) to SOL006, a fixed pipeline of
//!   extraction passes
//! - [`Sol1Converter`]: SOL006 back to a TOSCA skeleton, driven entirely
//!   by a [`FieldMapper`](crate::mapping::FieldMapper) table
//!
//! Both are built per document and consumed by [`Converter::convert`].

mod sol1;
mod sol6;

pub use sol1::Sol1Converter;
pub use sol6::Sol6Converter;

use crate::documents::Tree;
use crate::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

/// Descriptor dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// TOSCA topology template (SOL001)
    Tosca,
    /// Network function descriptor (SOL006)
    Sol6,
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Tosca => write!(f, "tosca"),
            Dialect::Sol6 => write!(f, "sol6"),
        }
    }
}

/// Trait for one-shot document converters
pub trait Converter {
    /// Dialect of the input document
    fn source_dialect(&self) -> Dialect;

    /// Dialect of the produced document
    fn target_dialect(&self) -> Dialect;

    /// Run the conversion, returning the finished document
    fn convert(self) -> Result<Tree>
    where
        Self: Sized;
}

/// Configuration for converters
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    /// Whether output containers must already exist in the skeleton
    strict_structure: bool,
    /// Whether unit suffixes are stripped from sizes (`"8 GB"` -> `"8"`)
    strip_units: bool,
    /// Whether a `requirements` mapping is rewritten as a list of entries
    requirements_as_list: bool,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            strict_structure: true,
            strip_units: true,
            requirements_as_list: true,
        }
    }
}

impl ConverterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if output containers must pre-exist
    pub fn strict_structure(&self) -> bool {
        self.strict_structure
    }

    /// Check if unit suffixes are stripped
    pub fn strip_units(&self) -> bool {
        self.strip_units
    }

    /// Check if requirements are written as a list
    pub fn requirements_as_list(&self) -> bool {
        self.requirements_as_list
    }

    /// Set strict structure
    pub fn with_strict_structure(mut self, strict: bool) -> Self {
        self.strict_structure = strict;
        self
    }

    /// Set unit stripping
    pub fn with_strip_units(mut self, strip: bool) -> Self {
        self.strip_units = strip;
        self
    }

    /// Set requirements list layout
    pub fn with_requirements_as_list(mut self, as_list: bool) -> Self {
        self.requirements_as_list = as_list;
        self
    }
}

static UNIT_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?[0-9]+(?:\.[0-9]+)?)\s*[A-Za-z]+\s*$").expect("valid unit pattern")
});

/// Drop the unit suffix of a size (`"8 GB"` -> `"8"`)
///
/// Text that is not a number followed by a unit keeps its first word.
/// Numbers are returned unchanged.
pub fn strip_unit(value: &Tree) -> Tree {
    let Some(text) = value.as_str() else {
        return value.clone();
    };

    if let Some(caps) = UNIT_SUFFIX.captures(text) {
        return Tree::from(&caps[1]);
    }
    Tree::from(text.split_whitespace().next().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_unit() {
        assert_eq!(strip_unit(&Tree::from("8 GB")), Tree::from("8"));
        assert_eq!(strip_unit(&Tree::from("4GB")), Tree::from("4"));
        assert_eq!(strip_unit(&Tree::from("0.5 GiB")), Tree::from("0.5"));
        assert_eq!(strip_unit(&Tree::from("16")), Tree::from("16"));
        assert_eq!(strip_unit(&Tree::from(8)), Tree::from(8));
        assert_eq!(strip_unit(&Tree::from("")), Tree::from(""));
    }

    #[test]
    fn test_converter_config_defaults() {
        let config = ConverterConfig::default();
        assert!(config.strict_structure());
        assert!(config.strip_units());
        assert!(config.requirements_as_list());
    }

    #[test]
    fn test_converter_config_builder() {
        let config = ConverterConfig::new()
            .with_strict_structure(false)
            .with_strip_units(false);
        assert!(!config.strict_structure());
        assert!(!config.strip_units());
    }

    #[test]
    fn test_dialect_display() {
        assert_eq!(Dialect::Sol6.to_string(), "sol6");
        assert_eq!(Dialect::Tosca.to_string(), "tosca");
    }
}

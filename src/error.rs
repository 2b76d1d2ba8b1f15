//! Error types for vnfd-convert
//!
//! This module defines all error types used throughout the library.
//! Path engine errors are precise (they carry the full path and the
//! offending segment); driver errors describe the missing structure.

use thiserror::Error;

/// Result type alias using the crate Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for conversion operations
#[derive(Error, Debug)]
pub enum Error {
    /// A path could not be resolved against a tree
    #[error("path '{path}': key '{segment}' not found")]
    PathNotFound {
        /// The full dotted path being resolved
        path: String,
        /// The segment that was missing
        segment: String,
    },

    /// A path could not be written into a tree
    #[error("cannot write path '{path}' at key '{segment}': {reason}")]
    PathWrite {
        /// The full dotted path being written
        path: String,
        /// The segment where writing stopped
        segment: String,
        /// Why the write failed
        reason: String,
    },

    /// A conversion pass is missing structure it requires
    #[error("structural precondition failed: {0}")]
    StructuralPrecondition(String),

    /// A value is neither a template-variable reference nor a literal
    #[error("unrecognized value shape: {0}")]
    UnrecognizedValueShape(String),

    /// A path template could not be formatted
    #[error("template error: {0}")]
    Template(String),

    /// Invalid configuration or key table
    #[error("configuration error: {0}")]
    Config(String),

    /// A document could not be read
    #[error("resource error: {0}")]
    Resource(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing or emitting error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or emitting error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a path-not-found error
    pub fn not_found(path: impl Into<String>, segment: impl Into<String>) -> Self {
        Error::PathNotFound {
            path: path.into(),
            segment: segment.into(),
        }
    }

    /// Create a path-write error
    pub fn write(
        path: impl Into<String>,
        segment: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Error::PathWrite {
            path: path.into(),
            segment: segment.into(),
            reason: reason.into(),
        }
    }

    /// Check whether this error is a soft-able resolution miss
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::PathNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_not_found_display() {
        let err = Error::not_found("vnfd.df.id", "df");
        let msg = format!("{}", err);
        assert!(msg.contains("vnfd.df.id"));
        assert!(msg.contains("'df'"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_path_write_display() {
        let err = Error::write("a.b", "b", "parent is not a mapping");
        let msg = format!("{}", err);
        assert!(msg.contains("cannot write path 'a.b'"));
        assert!(msg.contains("parent is not a mapping"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}

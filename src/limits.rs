//! Limits and constraints for descriptor loading
//!
//! This module defines limits that keep oversized or pathologically
//! nested input documents from exhausting memory or the stack (recursive
//! discovery walks the whole tree).

use crate::error::{Error, Result};

/// Global limits configuration
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum document size in bytes
    pub max_document_size: usize,

    /// Maximum nesting depth of a loaded tree
    pub max_depth: usize,

    /// Maximum number of entries in a single mapping or sequence
    pub max_entries: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_document_size: 16 * 1024 * 1024, // 16 MB
            max_depth: 256,
            max_entries: 100_000,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_document_size: 1024 * 1024, // 1 MB
            max_depth: 64,
            max_entries: 10_000,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_document_size: 512 * 1024 * 1024, // 512 MB
            max_depth: 4096,
            max_entries: 10_000_000,
        }
    }

    /// Check if a document size is within limits
    pub fn check_document_size(&self, size: usize) -> Result<()> {
        if size > self.max_document_size {
            Err(Error::LimitExceeded(format!(
                "document size {} bytes exceeds maximum {} bytes",
                size, self.max_document_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if a tree depth is within limits
    pub fn check_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_depth {
            Err(Error::LimitExceeded(format!(
                "document depth {} exceeds maximum {}",
                depth, self.max_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if a container size is within limits
    pub fn check_entries(&self, count: usize) -> Result<()> {
        if count > self.max_entries {
            Err(Error::LimitExceeded(format!(
                "container with {} entries exceeds maximum {}",
                count, self.max_entries
            )))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert_eq!(limits.max_depth, 256);
        assert!(limits.check_depth(100).is_ok());
        assert!(limits.check_depth(300).is_err());
    }

    #[test]
    fn test_strict_limits() {
        let limits = Limits::strict();
        assert!(limits.max_depth < Limits::default().max_depth);
        assert!(limits.check_document_size(2 * 1024 * 1024).is_err());
    }

    #[test]
    fn test_permissive_limits() {
        let limits = Limits::permissive();
        assert!(limits.max_depth > Limits::default().max_depth);
        assert!(limits.check_depth(1000).is_ok());
    }

    #[test]
    fn test_check_entries() {
        let limits = Limits::strict();
        assert!(limits.check_entries(10).is_ok());
        assert!(matches!(
            limits.check_entries(20_000),
            Err(Error::LimitExceeded(_))
        ));
    }
}

//! Path resolution
//!
//! Reads the value stored at a dotted path. Sequences are transparent
//! containers: before a segment is looked up, a sequence is replaced by
//! its selected element (the first one unless told otherwise).

use super::{split_path, ListSelect};
use crate::documents::Tree;
use crate::error::{Error, Result};

/// Default key marking a template-variable reference (`{get_input: NAME}`)
pub const DEFAULT_INPUT_MARKER: &str = "get_input";

/// Resolve `path` in `tree`, taking the first element of every sequence
pub fn resolve<'a>(path: &str, tree: &'a Tree) -> Result<&'a Tree> {
    resolve_with(path, tree, ListSelect::default())
}

/// Resolve `path` in `tree` with explicit element selection at sequences
pub fn resolve_with<'a>(path: &str, tree: &'a Tree, select: ListSelect<'_>) -> Result<&'a Tree> {
    let mut current = tree;
    let mut seq_depth = 0;

    for segment in split_path(path) {
        if let Tree::Seq(items) = current {
            let index = select.pick(seq_depth);
            seq_depth += 1;
            current = items
                .get(index)
                .ok_or_else(|| Error::not_found(path, segment))?;
        }

        current = match current {
            Tree::Map(map) => map
                .get(segment)
                .ok_or_else(|| Error::not_found(path, segment))?,
            Tree::Seq(_) | Tree::Scalar(_) => return Err(Error::not_found(path, segment)),
        };
    }

    Ok(current)
}

/// Resolve `path` for in-place modification
pub fn resolve_mut<'a>(
    path: &str,
    tree: &'a mut Tree,
    select: ListSelect<'_>,
) -> Result<&'a mut Tree> {
    let mut current = tree;
    let mut seq_depth = 0;

    for segment in split_path(path) {
        current = match { current } {
            Tree::Seq(items) => {
                let index = select.pick(seq_depth);
                seq_depth += 1;
                items
                    .get_mut(index)
                    .ok_or_else(|| Error::not_found(path, segment))?
            }
            other => other,
        };

        current = match { current } {
            Tree::Map(map) => map
                .get_mut(segment)
                .ok_or_else(|| Error::not_found(path, segment))?,
            Tree::Seq(_) | Tree::Scalar(_) => return Err(Error::not_found(path, segment)),
        };
    }

    Ok(current)
}

/// Resolve a path whose last segment names one entry of a list
///
/// TOSCA writes requirements as a sequence of one-key mappings
/// (`requirements: [{virtual_binding: c1}, {virtual_link: vl0}]`), where
/// plain resolution only sees the first element. Here the parent path is
/// resolved normally and the last segment is looked up among all of its
/// entries, so both the sequence and the mapping layout work.
pub fn resolve_entry<'a>(path: &str, tree: &'a Tree) -> Option<&'a Tree> {
    let segments = split_path(path);
    let (last, parent) = segments.split_last()?;
    let parent = if parent.is_empty() {
        tree
    } else {
        resolve(&super::join_path(parent), tree).ok()?
    };

    parent
        .entries()
        .into_iter()
        .find(|entry| entry.name == *last)
        .map(|entry| entry.body)
}

/// Return the variable name if `value` is a `{marker: NAME}` reference
pub fn is_input_ref<'a>(value: &'a Tree, marker: &str) -> Option<&'a str> {
    let entry = value.single_entry()?;
    if entry.name == marker {
        entry.body.as_str()
    } else {
        None
    }
}

/// Path resolver with optional template-variable substitution
#[derive(Debug, Clone)]
pub struct Resolver {
    input_marker: String,
    map_inputs: bool,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            input_marker: DEFAULT_INPUT_MARKER.to_string(),
            map_inputs: false,
        }
    }
}

impl Resolver {
    /// Create a resolver with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the key marking template-variable references
    pub fn with_input_marker(mut self, marker: impl Into<String>) -> Self {
        self.input_marker = marker.into();
        self
    }

    /// Substitute a terminal `{marker: NAME}` value with `NAME`
    pub fn with_map_inputs(mut self, map_inputs: bool) -> Self {
        self.map_inputs = map_inputs;
        self
    }

    /// Get the input marker
    pub fn input_marker(&self) -> &str {
        &self.input_marker
    }

    /// Check if input substitution is enabled
    pub fn map_inputs(&self) -> bool {
        self.map_inputs
    }

    /// Resolve `path`, taking the first element of every sequence
    pub fn resolve<'a>(&self, path: &str, tree: &'a Tree) -> Result<&'a Tree> {
        self.resolve_with(path, tree, ListSelect::default())
    }

    /// Resolve `path` with explicit element selection
    pub fn resolve_with<'a>(
        &self,
        path: &str,
        tree: &'a Tree,
        select: ListSelect<'_>,
    ) -> Result<&'a Tree> {
        let value = resolve_with(path, tree, select)?;

        // Only terminal references are substituted
        if self.map_inputs {
            if let Some(entry) = value.single_entry() {
                if entry.name == self.input_marker && entry.body.as_str().is_some() {
                    return Ok(entry.body);
                }
            }
        }

        Ok(value)
    }
}

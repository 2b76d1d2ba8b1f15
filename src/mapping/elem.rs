//! Discovered repetition units
//!
//! A [`MapElem`] stands for one discovered instance (a VDU, one of its
//! connection points, ...): its value, its position among its siblings,
//! and optionally the element it belongs to. Path templates are filled
//! from the whole chain, outermost element first.

use crate::error::Result;
use crate::paths::format_template;
use std::fmt;

/// One discovered instance used to parametrize templated paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapElem {
    /// Instance value, usually its name or id
    pub value: String,
    /// Position of the instance among its siblings
    pub index: usize,
    /// The element this one is nested in
    pub parent: Option<Box<MapElem>>,
}

impl MapElem {
    /// Create an element without a parent
    pub fn new(value: impl Into<String>, index: usize) -> Self {
        Self {
            value: value.into(),
            index,
            parent: None,
        }
    }

    /// Attach the element this one is nested in
    pub fn with_parent(mut self, parent: MapElem) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// Check if this element has a parent
    pub fn has_parent(&self) -> bool {
        self.parent.is_some()
    }

    /// The chain from the outermost parent down to this element
    pub fn chain(&self) -> Vec<&MapElem> {
        let mut chain = Vec::new();
        let mut cur = Some(self);
        while let Some(elem) = cur {
            chain.push(elem);
            cur = elem.parent.as_deref();
        }
        chain.reverse();
        chain
    }

    /// Values of the chain, outermost first
    pub fn values(&self) -> Vec<String> {
        self.chain().iter().map(|e| e.value.clone()).collect()
    }

    /// Indices of the chain, outermost first
    pub fn indices(&self) -> Vec<usize> {
        self.chain().iter().map(|e| e.index).collect()
    }

    /// Fill `template` with the chain's values (or indices)
    pub fn format_path(&self, template: &str, use_value: bool) -> Result<String> {
        if use_value {
            format_template(template, &self.values())
        } else {
            let indices: Vec<String> = self.indices().iter().map(|i| i.to_string()).collect();
            format_template(template, &indices)
        }
    }
}

impl fmt::Display for MapElem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(parent) = &self.parent {
            write!(f, "{}/", parent)?;
        }
        write!(f, "{}[{}]", self.value, self.index)
    }
}

/// One element per value, indexed by position
pub fn elems_from_list<S: AsRef<str>>(values: &[S]) -> Vec<MapElem> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| MapElem::new(v.as_ref(), i))
        .collect()
}

/// One element per value, each nested in `parent`
pub fn elems_with_parent<S: AsRef<str>>(values: &[S], parent: &MapElem) -> Vec<MapElem> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| MapElem::new(v.as_ref(), i).with_parent(parent.clone()))
        .collect()
}

//! Path writing
//!
//! Writes a value at a dotted path, mutating the tree in place. With
//! `create_missing` the writer fabricates the structure a path needs, but
//! only in gaps: absent keys, falsy placeholders and missing sequence
//! slots. Without it the existing structure is a strict contract and any
//! absent segment is an error.

use super::{split_path, ListSelect};
use crate::documents::Tree;
use crate::error::{Error, Result};

/// Write `value` at `path`, selecting `list_index` at every sequence
pub fn write(
    path: &str,
    tree: &mut Tree,
    value: Tree,
    create_missing: bool,
    list_index: usize,
) -> Result<()> {
    write_with(path, tree, value, create_missing, ListSelect::Each(list_index))
}

/// Write `value` at `path` with explicit element selection at sequences
pub fn write_with(
    path: &str,
    tree: &mut Tree,
    value: Tree,
    create_missing: bool,
    select: ListSelect<'_>,
) -> Result<()> {
    let segments = split_path(path);
    let Some(last) = segments.len().checked_sub(1) else {
        return Err(Error::write(path, "", "empty path"));
    };

    let mut current = tree;
    let mut seq_depth = 0;
    let mut i = 0;

    while i < segments.len() {
        let segment = segments[i];

        current = match { current } {
            Tree::Seq(items) => {
                let index = select.pick(seq_depth);
                seq_depth += 1;
                if create_missing && items.len() <= index {
                    items.resize_with(index + 1, Tree::empty_map);
                }
                items.get_mut(index).ok_or_else(|| {
                    Error::write(path, segment, format!("sequence has no element {}", index))
                })?
            }
            other => other,
        };

        let map = match { current } {
            Tree::Map(map) => map,
            Tree::Seq(_) => return Err(Error::write(path, segment, "nested sequence")),
            Tree::Scalar(s) => {
                return Err(Error::write(
                    path,
                    segment,
                    format!("parent is the scalar '{}', not a mapping", s),
                ))
            }
        };

        if !map.contains_key(segment) {
            if !create_missing {
                return Err(Error::write(path, segment, "key not found"));
            }
            // Placeholder for the missing key; the same segment is examined
            // again below before the walk moves on.
            map.insert(segment.to_string(), Tree::blank());
        }

        let Some(child) = map.get_mut(segment) else {
            return Err(Error::write(path, segment, "key not found"));
        };

        if i == last {
            *child = value;
            return Ok(());
        }

        // Any falsy value (null, "", false, 0, [], {}) gives way to a mapping
        if create_missing && child.is_falsy() {
            *child = Tree::empty_map();
        }

        current = child;
        i += 1;
    }

    Ok(())
}

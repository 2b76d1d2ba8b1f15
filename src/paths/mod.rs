//! Path-addressed tree access
//!
//! Paths are dot-joined key segments (`topology_template.inputs`).
//! There is no indexing syntax: a sequence met while walking a path is
//! auto-descended into one of its elements, chosen by a [`ListSelect`].
//!
//! ## Overview
//!
//! - [`resolver`]: read the value at a path
//! - [`writer`]: write a value at a path, optionally fabricating structure
//! - [`filter`]: find every subtree holding a given key (and value)
//!
//! Path templates carry `{}` / `{N}` placeholders that are filled with the
//! names or indices of discovered instances before use.

pub mod filter;
pub mod resolver;
pub mod writer;

pub use filter::{find_all, find_by, Subtree};
pub use resolver::{is_input_ref, resolve, resolve_entry, resolve_mut, resolve_with, Resolver};
pub use writer::{write, write_with};

use crate::error::{Error, Result};

/// Separator between path segments
pub const SEPARATOR: char = '.';

/// Element selection at sequences met along a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListSelect<'a> {
    /// Every sequence selects the same index
    Each(usize),
    /// The k-th sequence met selects the k-th index (0 once exhausted)
    Chain(&'a [usize]),
}

impl Default for ListSelect<'_> {
    fn default() -> Self {
        ListSelect::Each(0)
    }
}

impl ListSelect<'_> {
    /// Index to use at the `depth`-th sequence met along a path
    pub fn pick(&self, depth: usize) -> usize {
        match self {
            ListSelect::Each(index) => *index,
            ListSelect::Chain(indices) => indices.get(depth).copied().unwrap_or(0),
        }
    }
}

/// Split a dotted path into its segments
///
/// Empty segments (leading, trailing or doubled dots) are dropped.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Join segments back into a dotted path
pub fn join_path<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(".")
}

/// Make `path` relative to `prefix`
///
/// Used to turn an absolute target path (`vnfd.df.vdu-profile.id`) into a
/// path inside one list entry (`id`) while entries are assembled.
pub fn relative_to(path: &str, prefix: &str) -> Result<String> {
    let segments = split_path(path);
    let prefix_segments = split_path(prefix);

    if prefix_segments.len() > segments.len()
        || segments[..prefix_segments.len()] != prefix_segments[..]
    {
        return Err(Error::Config(format!(
            "path '{}' is not below '{}'",
            path, prefix
        )));
    }

    Ok(join_path(&segments[prefix_segments.len()..]))
}

/// Fill the placeholders of a path template
///
/// `{}` takes the next argument in order, `{N}` takes argument `N`;
/// `{{` and `}}` are literal braces. Unused arguments are ignored.
pub fn format_template<S: AsRef<str>>(template: &str, args: &[S]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut next = 0;
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => digits.push(ch),
                        None => {
                            return Err(Error::Template(format!(
                                "unclosed placeholder in '{}'",
                                template
                            )))
                        }
                    }
                }

                let index = if digits.is_empty() {
                    let i = next;
                    next += 1;
                    i
                } else {
                    digits.trim().parse::<usize>().map_err(|_| {
                        Error::Template(format!(
                            "invalid placeholder '{{{}}}' in '{}'",
                            digits, template
                        ))
                    })?
                };

                let arg = args.get(index).ok_or_else(|| {
                    Error::Template(format!(
                        "placeholder {} in '{}' has no argument ({} given)",
                        index,
                        template,
                        args.len()
                    ))
                })?;
                out.push_str(arg.as_ref());
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

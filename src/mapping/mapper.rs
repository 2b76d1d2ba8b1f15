//! Declarative field mapping
//!
//! A [`FieldMapper`] is an ordered table of rules, each pairing a
//! destination path with a source. Running the table copies every source
//! value that is present into the target tree, fabricating the structure
//! the destination needs.

use super::elem::MapElem;
use super::flags::{Flag, FlagSet};
use crate::documents::Tree;
use crate::error::Result;
use crate::paths::{format_template, write_with, ListSelect, Resolver};
use tracing::{debug, warn};

/// Where a rule's value comes from
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    /// A single source path (or literal text with [`Flag::ForceLiteral`])
    Path(String),
    /// A templated path applied once per element
    Expand {
        /// Source path template filled from each element's chain
        template: String,
        /// Elements the rule fans out over
        elems: Vec<MapElem>,
    },
}

/// One rule of the mapping table
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    /// Destination path (template for expanded sources); `None` skips the rule
    pub destination: Option<String>,
    /// Flags active while this rule runs
    pub flags: Vec<Flag>,
    /// Value source
    pub source: Source,
}

/// Outcome counters of a mapping run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapReport {
    /// Values written to the target
    pub written: usize,
    /// Rules or elements that produced no write
    pub skipped: usize,
}

/// Ordered (destination, flags) -> source mapping table
#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    resolver: Resolver,
    entries: Vec<MapEntry>,
    flags: FlagSet,
}

impl FieldMapper {
    /// Create an empty table using the default resolver
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `resolver` to read source paths
    pub fn with_resolver(mut self, resolver: Resolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Number of rules in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no rules
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rules in insertion order
    pub fn entries(&self) -> &[MapEntry] {
        &self.entries
    }

    /// Append a rule
    pub fn add_rule(&mut self, destination: Option<&str>, flags: &[Flag], source: Source) {
        self.entries.push(MapEntry {
            destination: destination.map(str::to_string),
            flags: flags.to_vec(),
            source,
        });
    }

    /// Append a single-path rule
    pub fn add_path(&mut self, destination: &str, flags: &[Flag], source_path: &str) {
        self.add_rule(Some(destination), flags, Source::Path(source_path.to_string()));
    }

    /// Append a rule writing literal text
    pub fn add_literal(&mut self, destination: &str, value: &str) {
        self.add_rule(
            Some(destination),
            &[Flag::ForceLiteral],
            Source::Path(value.to_string()),
        );
    }

    /// Append a rule fanning out over `elems`
    pub fn add_expand(
        &mut self,
        destination: &str,
        flags: &[Flag],
        template: &str,
        elems: Vec<MapElem>,
    ) {
        self.add_rule(
            Some(destination),
            flags,
            Source::Expand {
                template: template.to_string(),
                elems,
            },
        );
    }

    /// Apply every rule in order, reading `source` and writing `target`
    pub fn run(mut self, source: &Tree, target: &mut Tree) -> Result<MapReport> {
        let mut report = MapReport::default();
        let entries = std::mem::take(&mut self.entries);

        for entry in entries {
            self.flags.reset();
            self.flags.apply(&entry.flags);

            let Some(destination) = entry.destination.as_deref() else {
                debug!(source = ?entry.source, "mapping rule has no destination, skipping");
                report.skipped += 1;
                continue;
            };

            match &entry.source {
                Source::Path(path) => {
                    let value = self.read(path, source, ListSelect::default())?;
                    self.put(destination, value, target, ListSelect::default(), &mut report)?;
                }
                Source::Expand { template, elems } => {
                    for elem in elems {
                        self.expand_one(destination, template, elem, source, target, &mut report)?;
                    }
                }
            }
        }

        Ok(report)
    }

    fn expand_one(
        &self,
        destination: &str,
        template: &str,
        elem: &MapElem,
        source: &Tree,
        target: &mut Tree,
        report: &mut MapReport,
    ) -> Result<()> {
        if self.flags.require_parent && !elem.has_parent() {
            if !self.flags.fail_silent {
                warn!(element = %elem, destination, "element has no parent, skipping");
            }
            report.skipped += 1;
            return Ok(());
        }

        let indices = elem.indices();
        let dest = elem.format_path(destination, !self.flags.dest_use_index)?;
        let src = format_template(template, &elem.values())?;
        debug!(element = %elem, from = %src, to = %dest, "expanded mapping rule");

        let value = self.read(&src, source, ListSelect::Chain(&indices))?;
        self.put(&dest, value, target, ListSelect::Chain(&indices), report)
    }

    fn read(&self, path: &str, source: &Tree, select: ListSelect<'_>) -> Result<Option<Tree>> {
        if self.flags.force_literal {
            return Ok(Some(Tree::from(path)));
        }

        match self.resolver.resolve_with(path, source, select) {
            Ok(value) => Ok(Some(value.clone())),
            Err(e) if e.is_not_found() && self.flags.blank_if_missing => {
                debug!(path, "source path missing, treated as blank");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn put(
        &self,
        destination: &str,
        value: Option<Tree>,
        target: &mut Tree,
        select: ListSelect<'_>,
        report: &mut MapReport,
    ) -> Result<()> {
        match value {
            // Zero is a real value even though it is falsy
            Some(value) if value.is_truthy() || value.is_zero() => {
                write_with(destination, target, value, true, select)?;
                report.written += 1;
            }
            _ => {
                debug!(destination, "blank value, nothing written");
                report.skipped += 1;
            }
        }
        Ok(())
    }
}

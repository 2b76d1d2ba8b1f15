//! TOSCA to SOL006 conversion
//!
//! [`Sol6Converter`] runs a fixed pipeline of passes over one TOSCA
//! document. Each pass discovers the nodes it needs with the subtree
//! filter, reads fields with the path resolver and writes whole lists into
//! the output skeleton. Later passes refine entries written by earlier
//! ones (capabilities on compute descriptors, scaling info on levels,
//! internal connection points on VDUs).

mod compute;
mod links;
mod policies;

use super::{strip_unit, Converter, ConverterConfig, Dialect};
use crate::documents::{Entry, Tree};
use crate::error::{Error, Result};
use crate::keys::SchemaKeys;
use crate::mapping::{FieldMapper, Flag};
use crate::paths::{
    find_all, find_by, format_template, is_input_ref, relative_to, resolve, resolve_mut, write,
    ListSelect,
};
use indexmap::IndexMap;
use tracing::{debug, info};

/// TOSCA (SOL001) to SOL006 converter
#[derive(Debug)]
pub struct Sol6Converter<'a> {
    source: &'a Tree,
    target: Tree,
    keys: &'a SchemaKeys,
    config: ConverterConfig,
    /// Caller-supplied input values, winning over declared defaults
    overrides: IndexMap<String, Tree>,
    /// Resolved template inputs
    inputs: IndexMap<String, Tree>,
    /// Discovered VDU node templates
    vdus: Vec<Entry<'a>>,
    /// Flavor key per VDU name
    vdu_flavors: IndexMap<String, String>,
    /// Resolved flavor name per flavor key, in discovery order
    flavors: IndexMap<String, String>,
}

impl<'a> Sol6Converter<'a> {
    /// Create a converter writing into `skeleton`
    pub fn new(
        source: &'a Tree,
        skeleton: Tree,
        keys: &'a SchemaKeys,
        config: ConverterConfig,
    ) -> Self {
        Self {
            source,
            target: skeleton,
            keys,
            config,
            overrides: IndexMap::new(),
            inputs: IndexMap::new(),
            vdus: Vec::new(),
            vdu_flavors: IndexMap::new(),
            flavors: IndexMap::new(),
        }
    }

    /// Override template input values
    pub fn with_inputs(mut self, inputs: IndexMap<String, Tree>) -> Self {
        self.overrides.extend(inputs);
        self
    }

    /// Override one template input value
    pub fn with_input(mut self, name: impl Into<String>, value: impl Into<Tree>) -> Self {
        self.overrides.insert(name.into(), value.into());
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    fn run(mut self) -> Result<Tree> {
        self.load_inputs()?;
        self.copy_one_to_one()?;
        self.compute_flavors()?;
        self.process_vdus()?;
        self.affinity_groups()?;
        self.instantiation_levels()?;
        self.scaling_aspects()?;
        self.virtual_storage()?;
        self.virtual_links()?;
        self.remap_vdus()?;
        self.connection_points()?;

        info!(
            vdus = self.vdus.len(),
            flavors = self.flavors.len(),
            "converted TOSCA descriptor to SOL006"
        );
        Ok(self.target)
    }

    // =========================================================================
    // Passes
    // =========================================================================

    /// Resolve declared inputs to their defaults, then apply overrides
    fn load_inputs(&mut self) -> Result<()> {
        let keys = self.keys;
        let tosca = &keys.tosca;
        if let Some(declared) = self.lookup(&tosca.inputs)? {
            for entry in declared.entries() {
                let value = match entry.body.get(&tosca.input_default) {
                    Some(default) => default.clone(),
                    None if entry.body.is_map() => {
                        debug!(input = entry.name, "input has no default");
                        continue;
                    }
                    None => entry.body.clone(),
                };
                self.inputs.insert(entry.name.to_string(), value);
            }
        }

        for (name, value) in &self.overrides {
            self.inputs.insert(name.clone(), value.clone());
        }
        debug!(inputs = self.inputs.len(), "resolved template inputs");
        Ok(())
    }

    /// Copy the verbatim fields, then write the literals
    fn copy_one_to_one(&mut self) -> Result<()> {
        let mut mapper = FieldMapper::new();
        for field in &self.keys.one_to_one {
            mapper.add_path(&field.sol6, &[Flag::BlankIfMissing], &field.tosca);
        }
        for literal in &self.keys.literals {
            mapper.add_literal(&literal.path, &literal.value);
        }

        let report = mapper.run(self.source, &mut self.target)?;
        debug!(written = report.written, skipped = report.skipped, "one-to-one fields copied");
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Every named node template, policy or group of the given type
    fn discover(&self, type_name: &str) -> Vec<Entry<'a>> {
        named(find_by(self.source, &self.keys.tosca.type_key, type_name))
    }

    /// Every named node of one of the given types, in document order
    fn discover_any(&self, type_names: &[&str]) -> Vec<Entry<'a>> {
        let found = find_all(self.source, &self.keys.tosca.type_key, None).unwrap_or_default();
        let matching = found.into_iter().filter(|s| {
            s.node
                .get(&self.keys.tosca.type_key)
                .and_then(Tree::as_str)
                .map_or(false, |t| type_names.contains(&t))
        });
        named(matching)
    }

    /// Resolve an absolute source path, mapping a missing key to `None`
    fn lookup(&self, path: &str) -> Result<Option<&'a Tree>> {
        optional(resolve(path, self.source))
    }

    /// Resolve a per-node template filled with `name`
    fn node_value(&self, template: &str, name: &str) -> Result<Option<&'a Tree>> {
        let path = format_template(template, &[name])?;
        self.lookup(&path)
    }

    /// Resolve an input reference or pass a literal through
    ///
    /// A reference to an input with no value is an error: the reference
    /// itself must never reach the output.
    fn input_value(&self, value: &Tree) -> Result<Tree> {
        match is_input_ref(value, &self.keys.tosca.input_marker) {
            Some(name) => self.inputs.get(name).cloned().ok_or_else(|| {
                Error::UnrecognizedValueShape(format!(
                    "reference to input '{}', which is undeclared or has no value",
                    name
                ))
            }),
            None => Ok(value.clone()),
        }
    }

    fn size_value(&self, value: &Tree) -> Result<Tree> {
        let value = self.input_value(value)?;
        if self.config.strip_units() {
            Ok(strip_unit(&value))
        } else {
            Ok(value)
        }
    }

    /// Replace the list at `container` in the output
    fn put_list(&mut self, container: &str, entries: Vec<Tree>) -> Result<()> {
        debug!(container, entries = entries.len(), "writing list");
        write(
            container,
            &mut self.target,
            Tree::Seq(entries),
            !self.config.strict_structure(),
            0,
        )
    }

    /// Entries of an output list written by an earlier pass
    fn list_mut(&mut self, container: &str) -> Result<&mut Vec<Tree>> {
        resolve_mut(container, &mut self.target, ListSelect::default())?
            .as_seq_mut()
            .ok_or_else(|| {
                Error::StructuralPrecondition(format!("'{}' is not a list", container))
            })
    }
}

impl Converter for Sol6Converter<'_> {
    fn source_dialect(&self) -> Dialect {
        Dialect::Tosca
    }

    fn target_dialect(&self) -> Dialect {
        Dialect::Sol6
    }

    fn convert(self) -> Result<Tree> {
        self.run()
    }
}

/// Builder for one entry of an output list
///
/// Fields are given by their absolute paths and stored relative to the
/// list, so the key tables stay the single source of every path.
struct EntryBuilder<'k> {
    container: &'k str,
    tree: Tree,
}

impl<'k> EntryBuilder<'k> {
    fn new(container: &'k str) -> Self {
        Self {
            container,
            tree: Tree::empty_map(),
        }
    }

    /// Store `value` at the absolute path `field`
    fn set(mut self, field: &str, value: impl Into<Tree>) -> Result<Self> {
        set_field(&mut self.tree, field, self.container, value.into())?;
        Ok(self)
    }

    /// Store `value` when it is present and not blank (zero counts)
    fn set_opt(self, field: &str, value: Option<Tree>) -> Result<Self> {
        match value {
            Some(v) if v.is_truthy() || v.is_zero() => self.set(field, v),
            _ => Ok(self),
        }
    }

    fn build(self) -> Tree {
        self.tree
    }
}

/// Write `value` at the absolute `field` path inside an entry of `container`
fn set_field(entry: &mut Tree, field: &str, container: &str, value: Tree) -> Result<()> {
    let rel = relative_to(field, container)?;
    write(&rel, entry, value, true, 0)
}

/// Read the absolute `field` path inside an entry of `container`
fn get_field<'t>(entry: &'t Tree, field: &str, container: &str) -> Result<Option<&'t Tree>> {
    let rel = relative_to(field, container)?;
    optional(resolve(&rel, entry))
}

fn optional<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

fn named<'a>(found: impl IntoIterator<Item = crate::paths::Subtree<'a>>) -> Vec<Entry<'a>> {
    found
        .into_iter()
        .filter_map(|s| {
            let entry = s.entry();
            if entry.is_none() {
                debug!(node = %s.node.describe(), "match without a name, skipping");
            }
            entry
        })
        .collect()
}

/// String items of a sequence (a lone string counts as one item)
fn string_list(value: Option<&Tree>) -> Vec<String> {
    match value {
        Some(Tree::Seq(items)) => items.iter().filter_map(Tree::to_text).collect(),
        Some(v @ Tree::Scalar(_)) if v.is_truthy() => v.to_text().into_iter().collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::from_yaml_str;

    #[test]
    fn test_entry_builder_uses_relative_paths() {
        let entry = EntryBuilder::new("vnfd.virtual-compute-descriptor")
            .set("vnfd.virtual-compute-descriptor.id", "small")
            .unwrap()
            .set("vnfd.virtual-compute-descriptor.virtual-memory.size", "8")
            .unwrap()
            .set_opt("vnfd.virtual-compute-descriptor.flavor-name", None)
            .unwrap()
            .set_opt("vnfd.virtual-compute-descriptor.count", Some(Tree::from(0)))
            .unwrap()
            .build();
        assert_eq!(
            entry,
            from_yaml_str("id: small\nvirtual-memory: {size: '8'}\ncount: 0\n").unwrap()
        );
    }

    #[test]
    fn test_entry_builder_rejects_foreign_field() {
        assert!(EntryBuilder::new("vnfd.vdu").set("vnfd.ext-cpd.id", "x").is_err());
    }

    #[test]
    fn test_string_list() {
        let tree = from_yaml_str("a: [x, y]\nb: z\nc: ''\n").unwrap();
        assert_eq!(string_list(tree.get("a")), vec!["x", "y"]);
        assert_eq!(string_list(tree.get("b")), vec!["z"]);
        assert!(string_list(tree.get("c")).is_empty());
        assert!(string_list(None).is_empty());
    }

    #[test]
    fn test_inputs_and_overrides() {
        let source = from_yaml_str(
            r#"
topology_template:
  inputs:
    A: {type: string, default: one}
    B: {type: string}
    C: {type: integer, default: 0}
"#,
        )
        .unwrap();
        let keys = SchemaKeys::default();
        let mut converter = Sol6Converter::new(&source, Tree::empty_map(), &keys, ConverterConfig::new())
            .with_input("B", "two");
        converter.load_inputs().unwrap();

        assert_eq!(converter.inputs.get("A"), Some(&Tree::from("one")));
        assert_eq!(converter.inputs.get("B"), Some(&Tree::from("two")));
        assert_eq!(converter.inputs.get("C"), Some(&Tree::from(0)));

        let reference = from_yaml_str("{get_input: A}").unwrap();
        assert_eq!(converter.input_value(&reference).unwrap(), Tree::from("one"));
        assert_eq!(converter.input_value(&Tree::from("lit")).unwrap(), Tree::from("lit"));
    }

    #[test]
    fn test_unbound_input_reference_is_rejected() {
        let source = from_yaml_str(
            r#"
topology_template:
  inputs:
    B: {type: string}
"#,
        )
        .unwrap();
        let keys = SchemaKeys::default();
        let mut converter = Sol6Converter::new(&source, Tree::empty_map(), &keys, ConverterConfig::new());
        converter.load_inputs().unwrap();

        for name in ["B", "MISSING"] {
            let reference = from_yaml_str(&format!("{{get_input: {}}}", name)).unwrap();
            let err = converter.input_value(&reference).unwrap_err();
            assert!(matches!(err, Error::UnrecognizedValueShape(_)), "got {:?}", err);
        }
    }
}

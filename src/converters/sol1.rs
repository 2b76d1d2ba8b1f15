//! SOL006 to TOSCA conversion
//!
//! The reverse direction is a best-effort projection: every field it
//! recovers is one rule of a [`FieldMapper`] table, fanned out over the
//! VDUs, profiles, virtual links and internal connection points found in
//! the SOL006 document.

use super::{Converter, ConverterConfig, Dialect};
use crate::documents::Tree;
use crate::error::Result;
use crate::keys::SchemaKeys;
use crate::mapping::{FieldMapper, Flag, MapElem};
use crate::paths::{
    format_template, join_path, relative_to, resolve, resolve_mut, resolve_with, split_path,
    ListSelect,
};
use tracing::{debug, info, warn};

/// SOL006 to TOSCA (SOL001) converter
#[derive(Debug)]
pub struct Sol1Converter<'a> {
    source: Tree,
    keys: &'a SchemaKeys,
    config: ConverterConfig,
}

impl<'a> Sol1Converter<'a> {
    /// Create a converter for a SOL006 document
    ///
    /// The `etsi-nfv-descriptors:nfv` wrapper is removed when present, and
    /// a `vnfd` or `df` given as a list is reduced to its first entry.
    pub fn new(document: Tree, keys: &'a SchemaKeys) -> Self {
        let mut source = resolve(&keys.sol6.nfv_wrapper, &document)
            .ok()
            .cloned()
            .unwrap_or(document);

        collapse_list(&mut source, &keys.sol6.vnfd);
        collapse_list(&mut source, &parent_path(&keys.sol6.vdu_profile));

        Self {
            source,
            keys,
            config: ConverterConfig::default(),
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: ConverterConfig) -> Self {
        self.config = config;
        self
    }

    /// The normalized SOL006 document
    pub fn source(&self) -> &Tree {
        &self.source
    }

    /// Build the mapping table for this document
    pub fn mapper(&self) -> Result<FieldMapper> {
        let (tosca, sol6) = (&self.keys.tosca, &self.keys.sol6);
        let mut mapper = FieldMapper::new();

        mapper.add_literal("tosca_definitions_version", &tosca.definitions_version);
        let vnf = format_template(&tosca.node, &["vnf"])?;
        mapper.add_literal(&format!("{}.{}", vnf, tosca.type_key), &tosca.vnf_type);
        for field in &self.keys.one_to_one {
            mapper.add_path(&field.tosca, &[Flag::BlankIfMissing], &field.sol6);
        }

        let node_type = format!("{}.{}", tosca.node, tosca.type_key);

        let vdus = self.elems(&sol6.vdu, &sol6.vdu_id, ListSelect::default())?;
        mapper.add_expand(&node_type, &[Flag::ForceLiteral], &tosca.vdu_type, vdus.clone());
        mapper.add_expand(&tosca.vdu_name, &[Flag::BlankIfMissing], &sol6.vdu_name, vdus.clone());
        mapper.add_expand(&tosca.vdu_desc, &[Flag::BlankIfMissing], &sol6.vdu_desc, vdus.clone());

        let profiles = self.elems(&sol6.vdu_profile, &sol6.vdu_profile_id, ListSelect::default())?;
        mapper.add_expand(
            &tosca.vdu_profile_min,
            &[Flag::BlankIfMissing],
            &sol6.vdu_profile_min,
            profiles.clone(),
        );
        mapper.add_expand(
            &tosca.vdu_profile_max,
            &[Flag::BlankIfMissing],
            &sol6.vdu_profile_max,
            profiles,
        );

        let links = self.elems(&sol6.virtual_link, &sol6.link_id, ListSelect::default())?;
        mapper.add_expand(&node_type, &[Flag::ForceLiteral], &tosca.virtual_link_type, links.clone());
        mapper.add_expand(&tosca.link_desc, &[Flag::BlankIfMissing], &sol6.link_desc, links.clone());
        mapper.add_expand(
            &tosca.link_protocols,
            &[Flag::BlankIfMissing],
            &sol6.link_protocol,
            links,
        );

        // Connection points are named by the second element of the chain
        let cp_node = tosca.node.replacen("{}", "{1}", 1);
        let cp_path = |rest: &str| format!("{}.{}", cp_node, rest);
        let mut cps = Vec::new();
        for vdu in &vdus {
            let ids = self.elems(&sol6.int_cpd, &sol6.int_cpd_id, ListSelect::Each(vdu.index))?;
            cps.extend(ids.into_iter().map(|cp| cp.with_parent(vdu.clone())));
        }
        mapper.add_expand(
            &cp_path(&tosca.type_key),
            &[Flag::RequireParent, Flag::ForceLiteral],
            &tosca.cp_type,
            cps.clone(),
        );
        mapper.add_expand(
            &cp_path(&tosca.cp_binding),
            &[Flag::RequireParent, Flag::ForceLiteral],
            "{0}",
            cps.clone(),
        );
        mapper.add_expand(
            &cp_path(&tosca.cp_link),
            &[Flag::RequireParent, Flag::BlankIfMissing],
            &sol6.int_cpd_link,
            cps.clone(),
        );
        mapper.add_expand(
            &cp_path(&tosca.cp_protocols),
            &[Flag::RequireParent, Flag::BlankIfMissing],
            &sol6.int_cpd_protocol,
            cps,
        );

        debug!(rules = mapper.len(), vdus = vdus.len(), "built reverse mapping table");
        Ok(mapper)
    }

    fn run(self) -> Result<Tree> {
        let mapper = self.mapper()?;
        let mut target = Tree::empty_map();
        let report = mapper.run(&self.source, &mut target)?;

        self.protocols_as_lists(&mut target)?;
        if self.config.requirements_as_list() {
            self.requirements_as_lists(&mut target);
        }

        info!(
            written = report.written,
            skipped = report.skipped,
            "converted SOL006 descriptor to TOSCA"
        );
        Ok(target)
    }

    /// One element per entry of the list at `container`, valued by `field`
    ///
    /// Indices are positions in the list, so entries without the field
    /// keep their slot.
    fn elems(&self, container: &str, field: &str, select: ListSelect<'_>) -> Result<Vec<MapElem>> {
        let items = match resolve_with(container, &self.source, select) {
            Ok(Tree::Seq(items)) => items,
            Ok(other) => {
                warn!(container, found = %other.describe(), "expected a list");
                return Ok(Vec::new());
            }
            Err(e) if e.is_not_found() => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };

        let rel = relative_to(field, container)?;
        Ok(items
            .iter()
            .enumerate()
            .filter_map(|(i, item)| {
                let id = resolve(&rel, item).ok().and_then(Tree::to_text);
                if id.is_none() {
                    debug!(container, index = i, "entry without an id, skipping");
                }
                id.map(|id| MapElem::new(id, i))
            })
            .collect())
    }

    /// TOSCA layer protocols are lists, SOL006 holds a single protocol
    fn protocols_as_lists(&self, target: &mut Tree) -> Result<()> {
        let tosca = &self.keys.tosca;
        let Ok(Tree::Map(nodes)) = resolve_mut(&parent_path(&tosca.node), target, ListSelect::default())
        else {
            return Ok(());
        };

        for node in nodes.values_mut() {
            wrap_scalar(node, &tosca.cp_protocols);
        }
        // Link protocols are addressed through the absolute node template
        let names: Vec<String> = nodes.keys().cloned().collect();
        for name in names {
            let path = format_template(&tosca.link_protocols, &[name.as_str()])?;
            wrap_scalar(target, &path);
        }
        Ok(())
    }

    /// Rewrite each node's `requirements` mapping as a list of one-key entries
    fn requirements_as_lists(&self, target: &mut Tree) {
        let tosca = &self.keys.tosca;
        let requirements = parent_path(&tosca.cp_binding);
        let Ok(Tree::Map(nodes)) = resolve_mut(&parent_path(&tosca.node), target, ListSelect::default())
        else {
            return;
        };

        for node in nodes.values_mut() {
            let Ok(value) = resolve_mut(&requirements, node, ListSelect::default()) else {
                continue;
            };
            if let Some(map) = value.as_map_mut() {
                let entries = std::mem::take(map);
                *value = Tree::Seq(
                    entries
                        .into_iter()
                        .map(|(k, v)| Tree::Map(std::iter::once((k, v)).collect()))
                        .collect(),
                );
            }
        }
    }
}

impl Converter for Sol1Converter<'_> {
    fn source_dialect(&self) -> Dialect {
        Dialect::Sol6
    }

    fn target_dialect(&self) -> Dialect {
        Dialect::Tosca
    }

    fn convert(self) -> Result<Tree> {
        self.run()
    }
}

fn parent_path(path: &str) -> String {
    let segments = split_path(path);
    join_path(&segments[..segments.len().saturating_sub(1)])
}

/// Replace a list at `path` by its first entry
fn collapse_list(tree: &mut Tree, path: &str) {
    let Ok(node) = resolve_mut(path, tree, ListSelect::default()) else {
        return;
    };
    let first = match node {
        Tree::Seq(items) => {
            if items.len() > 1 {
                warn!(path, entries = items.len(), "only the first entry is converted");
            }
            std::mem::take(items).into_iter().next()
        }
        _ => return,
    };
    *node = first.unwrap_or_else(Tree::empty_map);
}

fn wrap_scalar(tree: &mut Tree, path: &str) {
    if let Ok(value) = resolve_mut(path, tree, ListSelect::default()) {
        if matches!(value, Tree::Scalar(_)) {
            let item = std::mem::replace(value, Tree::Seq(Vec::new()));
            *value = Tree::Seq(vec![item]);
        }
    }
}

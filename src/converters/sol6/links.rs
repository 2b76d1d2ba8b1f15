//! Virtual links and connection points

use super::{get_field, optional, EntryBuilder, Sol6Converter};
use crate::documents::Tree;
use crate::error::{Error, Result};
use crate::paths::{relative_to, resolve, resolve_entry, resolve_mut, write, ListSelect};
use tracing::debug;

impl<'a> Sol6Converter<'a> {
    /// One internal virtual link per link node template
    pub(super) fn virtual_links(&mut self) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);

        let mut entries = Vec::new();
        for link in self.discover(&tosca.virtual_link_type) {
            let description = self
                .node_value(&tosca.link_desc, link.name)?
                .map(|v| self.input_value(v))
                .transpose()?;
            let protocol = self
                .node_value(&tosca.link_protocols, link.name)?
                .and_then(first_item);

            entries.push(
                EntryBuilder::new(&sol6.virtual_link)
                    .set(&sol6.link_id, link.name)?
                    .set_opt(&sol6.link_desc, description)?
                    .set_opt(&sol6.link_protocol, protocol)?
                    .build(),
            );
        }
        self.put_list(&sol6.virtual_link, entries)
    }

    /// Internal connection points on the VDUs and the two external ones
    ///
    /// Connection points exposed through the substitution mappings are
    /// split by their management flag. Management ones attach to the first
    /// virtual link and the rest to the second, so at least two links must
    /// exist.
    pub(super) fn connection_points(&mut self) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);

        let mut mgmt = Vec::new();
        let mut orch = Vec::new();
        if let Some(requirements) = self.lookup(&tosca.sub_requirements)? {
            for req in requirements.entries() {
                if !keys.is_sub_link_type(req.name) {
                    debug!(requirement = req.name, "not a link requirement, skipping");
                    continue;
                }
                let cp = exposed_cp(req.name, req.body)?;
                let node = self.node_value(&tosca.node, cp)?.ok_or_else(|| {
                    Error::StructuralPrecondition(format!(
                        "connection point '{}' is not a node template",
                        cp
                    ))
                })?;

                if is_management(resolve(&tosca.cp_management, node).ok()) {
                    mgmt.push((cp, node));
                } else {
                    orch.push((cp, node));
                }
            }
        }

        let links: Vec<String> = match resolve(&sol6.virtual_link, &self.target) {
            Ok(Tree::Seq(items)) => items
                .iter()
                .filter_map(|l| get_field(l, &sol6.link_id, &sol6.virtual_link).ok().flatten())
                .filter_map(Tree::to_text)
                .collect(),
            _ => Vec::new(),
        };
        let [mgmt_link, orch_link, ..] = links.as_slice() else {
            return Err(Error::StructuralPrecondition(format!(
                "connection points need a management and an orchestration link, found {} virtual link(s)",
                links.len()
            )));
        };

        for (cp, node) in mgmt {
            self.attach_cp(cp, node, mgmt_link)?;
        }
        for (cp, node) in orch {
            self.attach_cp(cp, node, orch_link)?;
        }

        let mut external = Vec::with_capacity(2);
        for (id, link) in [(&sol6.ext_mgmt_id, mgmt_link), (&sol6.ext_orch_id, orch_link)] {
            external.push(
                EntryBuilder::new(&sol6.ext_cpd)
                    .set(&sol6.ext_cpd_id, id.as_str())?
                    .set(&sol6.ext_cpd_link, link.as_str())?
                    .set(&sol6.ext_cpd_protocol, sol6.ext_protocol_value.as_str())?
                    .build(),
            );
        }
        self.put_list(&sol6.ext_cpd, external)
    }

    /// Append an internal connection point to the VDU the node binds to
    fn attach_cp(&mut self, cp: &str, node: &Tree, link: &str) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);

        let vdu = resolve_entry(&tosca.cp_binding, node)
            .and_then(Tree::to_text)
            .ok_or_else(|| {
                Error::StructuralPrecondition(format!(
                    "connection point '{}' has no virtual binding",
                    cp
                ))
            })?;
        let id = format!("{}_{}", vdu, link);
        let protocol = optional(resolve(&tosca.cp_protocols, node))?.and_then(first_item);
        let cpd = EntryBuilder::new(&sol6.int_cpd)
            .set(&sol6.int_cpd_id, id.as_str())?
            .set(&sol6.int_cpd_link, link)?
            .set_opt(&sol6.int_cpd_protocol, protocol)?
            .build();

        let wanted = Tree::from(vdu.as_str());
        let entry = self
            .list_mut(&sol6.vdu)?
            .iter_mut()
            .find(|e| get_field(e, &sol6.vdu_id, &sol6.vdu).ok().flatten() == Some(&wanted))
            .ok_or_else(|| {
                Error::StructuralPrecondition(format!(
                    "connection point '{}' is bound to unknown VDU '{}'",
                    cp, vdu
                ))
            })?;

        let rel = relative_to(&sol6.int_cpd, &sol6.vdu)?;
        if !matches!(resolve(&rel, entry), Ok(Tree::Seq(_))) {
            write(&rel, entry, Tree::Seq(Vec::new()), true, 0)?;
        }
        let cpds = resolve_mut(&rel, entry, ListSelect::default())?
            .as_seq_mut()
            .ok_or_else(|| Error::StructuralPrecondition(format!("'{}' is not a list", rel)))?;

        let existing = Tree::from(id.as_str());
        if cpds
            .iter()
            .any(|c| get_field(c, &sol6.int_cpd_id, &sol6.int_cpd).ok().flatten() == Some(&existing))
        {
            debug!(cp, id = %id, "internal connection point already attached");
        } else {
            debug!(cp, id = %id, "attaching internal connection point");
            cpds.push(cpd);
        }
        Ok(())
    }
}

/// Name of the connection point a substitution requirement exposes
///
/// Requirements are written `[cp_name, requirement]`; a bare name is also
/// accepted.
fn exposed_cp<'t>(requirement: &str, value: &'t Tree) -> Result<&'t str> {
    let name = match value {
        Tree::Seq(items) => items.first().and_then(Tree::as_str),
        other => other.as_str(),
    };
    name.ok_or_else(|| {
        Error::UnrecognizedValueShape(format!(
            "substitution requirement '{}' does not name a connection point: {}",
            requirement,
            value.describe()
        ))
    })
}

fn is_management(flag: Option<&Tree>) -> bool {
    match flag {
        Some(Tree::Scalar(_)) => flag
            .and_then(Tree::as_bool)
            .or_else(|| flag.and_then(Tree::as_str).map(|s| s.eq_ignore_ascii_case("true")))
            .unwrap_or(false),
        _ => false,
    }
}

/// First item of a list, or a lone scalar
fn first_item(value: &Tree) -> Option<Tree> {
    match value {
        Tree::Seq(items) => items.first().cloned(),
        Tree::Scalar(_) => Some(value.clone()),
        Tree::Map(_) => None,
    }
}

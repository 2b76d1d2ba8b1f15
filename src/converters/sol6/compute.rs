//! Compute flavors, VDU profiles, storage and the VDU list

use super::{get_field, set_field, string_list, EntryBuilder, Sol6Converter};
use crate::documents::{Entry, Tree};
use crate::error::{Error, Result};
use crate::paths::{format_template, is_input_ref, resolve, resolve_entry};
use indexmap::IndexMap;
use tracing::{debug, warn};

impl<'a> Sol6Converter<'a> {
    /// Discover the VDUs and emit one compute descriptor per distinct flavor
    ///
    /// A flavor is either an input reference, keyed by the input name and
    /// named after the input's value, or a literal keyed and named by
    /// itself. VDUs sharing a key share a descriptor.
    pub(super) fn compute_flavors(&mut self) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);
        let vdus = self.discover(&tosca.vdu_type);

        for vdu in &vdus {
            let path = format_template(&tosca.vdu_flavor, &[vdu.name])?;
            let flavor = resolve(&path, self.source)?;
            let (key, name) = self.flavor_key(vdu.name, flavor)?;

            self.vdu_flavors.insert(vdu.name.to_string(), key.clone());
            if self.flavors.contains_key(&key) {
                debug!(vdu = vdu.name, flavor = %key, "flavor already discovered");
            } else {
                self.flavors.insert(key, name);
            }
        }
        self.vdus = vdus;

        // Descriptor ids are lower-cased keys, which must stay distinct
        let mut ids: IndexMap<String, &str> = IndexMap::with_capacity(self.flavors.len());
        let mut descriptors = Vec::with_capacity(self.flavors.len());
        for (key, name) in &self.flavors {
            let id = key.to_lowercase();
            if let Some(other) = ids.insert(id.clone(), key.as_str()) {
                return Err(Error::StructuralPrecondition(format!(
                    "flavors '{}' and '{}' both map to compute descriptor '{}'",
                    other, key, id
                )));
            }
            descriptors.push(
                EntryBuilder::new(&sol6.compute_desc)
                    .set(&sol6.compute_id, id)?
                    .set(&sol6.compute_flavor, name.as_str())?
                    .build(),
            );
        }
        self.put_list(&sol6.compute_desc, descriptors)
    }

    fn flavor_key(&self, vdu: &str, flavor: &Tree) -> Result<(String, String)> {
        if let Some(input) = is_input_ref(flavor, &self.keys.tosca.input_marker) {
            let name = match self.inputs.get(input).and_then(Tree::to_text) {
                Some(name) => name,
                None => {
                    warn!(vdu, input, "flavor input has no value, using the input name");
                    input.to_string()
                }
            };
            return Ok((input.to_string(), name));
        }

        match flavor {
            Tree::Scalar(_) if flavor.is_truthy() => {
                let text = flavor.to_text().unwrap_or_default();
                Ok((text.clone(), text))
            }
            other => Err(Error::UnrecognizedValueShape(format!(
                "flavor of VDU '{}' is neither an input reference nor a literal: {}",
                vdu,
                other.describe()
            ))),
        }
    }

    /// Capabilities on the compute descriptors and one vdu-profile per VDU
    pub(super) fn process_vdus(&mut self) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);
        let groups = self.discover(&tosca.placement_group_type);
        let rules = self.discover_any(&[tosca.affinity_type.as_str(), tosca.anti_affinity_type.as_str()]);

        let mut profiles = Vec::with_capacity(self.vdus.len());
        for vdu in self.vdus.clone() {
            self.set_capabilities(vdu)?;
            profiles.push(self.vdu_profile(vdu, &groups, &rules)?);
        }
        self.put_list(&sol6.vdu_profile, profiles)
    }

    fn set_capabilities(&mut self, vdu: Entry<'a>) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);

        let cpu = self
            .node_value(&tosca.vdu_num_cpu, vdu.name)?
            .map(|v| self.input_value(v))
            .transpose()?;
        let memory = self
            .node_value(&tosca.vdu_mem_size, vdu.name)?
            .map(|v| self.size_value(v))
            .transpose()?;

        let id = self
            .vdu_flavors
            .get(vdu.name)
            .map(|key| Tree::from(key.to_lowercase()))
            .ok_or_else(|| {
                Error::StructuralPrecondition(format!("VDU '{}' has no flavor", vdu.name))
            })?;

        let descriptors = self.list_mut(&sol6.compute_desc)?;
        let descriptor = descriptors
            .iter_mut()
            .find(|d| get_field(d, &sol6.compute_id, &sol6.compute_desc).ok().flatten() == Some(&id))
            .ok_or_else(|| {
                Error::StructuralPrecondition(format!(
                    "no compute descriptor matches the flavor of VDU '{}'",
                    vdu.name
                ))
            })?;

        for (field, value) in [(&sol6.compute_cpu, cpu), (&sol6.compute_memory, memory)] {
            match value {
                Some(v) if v.is_truthy() || v.is_zero() => {
                    set_field(descriptor, field, &sol6.compute_desc, v)?
                }
                _ => debug!(vdu = vdu.name, field = %field, "capability not declared"),
            }
        }
        Ok(())
    }

    fn vdu_profile(&self, vdu: Entry<'a>, groups: &[Entry<'a>], rules: &[Entry<'a>]) -> Result<Tree> {
        let tosca = &self.keys.tosca;
        let sol6 = &self.keys.sol6;

        let min = self
            .node_value(&tosca.vdu_profile_min, vdu.name)?
            .map(|v| self.input_value(v))
            .transpose()?;
        let max = self
            .node_value(&tosca.vdu_profile_max, vdu.name)?
            .map(|v| self.input_value(v))
            .transpose()?;

        // Placement groups holding this VDU, then the rules targeting them
        let member_of: Vec<&str> = groups
            .iter()
            .filter(|g| {
                string_list(resolve(&tosca.group_members, g.body).ok())
                    .iter()
                    .any(|m| m == vdu.name)
            })
            .map(|g| g.name)
            .collect();

        let mut group_ids: Vec<String> = Vec::new();
        for rule in rules {
            for target in string_list(resolve(&tosca.policy_targets, rule.body).ok()) {
                if member_of.contains(&target.as_str()) && !group_ids.contains(&target) {
                    group_ids.push(target);
                }
            }
        }

        let mut profile = EntryBuilder::new(&sol6.vdu_profile)
            .set(&sol6.vdu_profile_id, vdu.name)?
            .set_opt(&sol6.vdu_profile_min, min)?
            .set_opt(&sol6.vdu_profile_max, max)?;

        if !group_ids.is_empty() {
            let refs = group_ids
                .iter()
                .map(|id| {
                    EntryBuilder::new(&sol6.vdu_profile_group)
                        .set(&sol6.vdu_profile_group_id, id.as_str())
                        .map(EntryBuilder::build)
                })
                .collect::<Result<Vec<_>>>()?;
            profile = profile.set(&sol6.vdu_profile_group, Tree::Seq(refs))?;
        }

        Ok(profile.build())
    }

    /// One storage descriptor per block storage node
    pub(super) fn virtual_storage(&mut self) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);

        let mut descriptors = Vec::new();
        for storage in self.discover(&tosca.storage_type) {
            let size = self
                .node_value(&tosca.storage_size, storage.name)?
                .map(|v| self.size_value(v))
                .transpose()?;
            descriptors.push(
                EntryBuilder::new(&sol6.storage_desc)
                    .set(&sol6.storage_id, storage.name)?
                    .set(&sol6.storage_type, sol6.storage_type_value.as_str())?
                    .set_opt(&sol6.storage_size, size)?
                    .build(),
            );
        }
        self.put_list(&sol6.storage_desc, descriptors)
    }

    /// Every TOSCA VDU as a SOL006 vdu entry
    pub(super) fn remap_vdus(&mut self) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);

        let mut entries = Vec::with_capacity(self.vdus.len());
        for vdu in &self.vdus {
            let name = self
                .node_value(&tosca.vdu_name, vdu.name)?
                .map(|v| self.input_value(v))
                .transpose()?
                .filter(Tree::is_truthy)
                .unwrap_or_else(|| Tree::from(vdu.name));
            let description = self
                .node_value(&tosca.vdu_desc, vdu.name)?
                .map(|v| self.input_value(v))
                .transpose()?;
            let compute = self
                .vdu_flavors
                .get(vdu.name)
                .map(|key| Tree::from(key.to_lowercase()));
            let storage = resolve_entry(&tosca.vdu_storage, vdu.body).cloned();

            entries.push(
                EntryBuilder::new(&sol6.vdu)
                    .set(&sol6.vdu_id, vdu.name)?
                    .set(&sol6.vdu_name, name)?
                    .set_opt(&sol6.vdu_desc, description)?
                    .set_opt(&sol6.vdu_compute, compute)?
                    .set_opt(&sol6.vdu_storage, storage)?
                    .build(),
            );
        }
        self.put_list(&sol6.vdu, entries)
    }
}

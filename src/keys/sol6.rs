//! SOL006 path constants

use crate::documents::Tree;
use crate::error::{Error, Result};
use crate::paths::{relative_to, write};
use serde::{Deserialize, Serialize};

/// Paths and fixed values of a SOL006 VNFD
///
/// All paths are absolute. List entries are assembled from the paths of
/// their fields relative to the list itself, so every field path must lie
/// below its container path (see [`Sol6Keys::validate`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sol6Keys {
    /// Root of the descriptor
    pub vnfd: String,
    /// Wrapper holding the descriptor in NETCONF-style exports
    pub nfv_wrapper: String,

    /// Virtual compute descriptor list
    pub compute_desc: String,
    /// Id of a compute descriptor
    pub compute_id: String,
    /// VIM flavor name of a compute descriptor
    pub compute_flavor: String,
    /// Number of virtual CPUs
    pub compute_cpu: String,
    /// Virtual memory size
    pub compute_memory: String,

    /// Virtual storage descriptor list
    pub storage_desc: String,
    /// Id of a storage descriptor
    pub storage_id: String,
    /// Type of a storage descriptor
    pub storage_type: String,
    /// Size of a storage descriptor
    pub storage_size: String,
    /// Storage type written for block storage
    pub storage_type_value: String,

    /// Deployment flavor vdu-profile list
    pub vdu_profile: String,
    /// VDU id of a profile
    pub vdu_profile_id: String,
    /// Minimum number of instances
    pub vdu_profile_min: String,
    /// Maximum number of instances
    pub vdu_profile_max: String,
    /// Affinity groups a VDU belongs to
    pub vdu_profile_group: String,
    /// Id inside a profile's affinity group reference
    pub vdu_profile_group_id: String,

    /// Instantiation level list
    pub level: String,
    /// Id of a level
    pub level_id: String,
    /// Description of a level
    pub level_desc: String,
    /// Per-VDU entries of a level
    pub level_vdu: String,
    /// VDU id inside a per-VDU entry
    pub level_vdu_id: String,
    /// Instance count inside a per-VDU entry
    pub level_instances: String,
    /// Scaling info of a level
    pub level_scaling: String,
    /// Aspect id inside a scaling info entry
    pub level_scaling_aspect: String,
    /// Scale level inside a scaling info entry
    pub level_scaling_level: String,

    /// Scaling aspect list
    pub scaling_aspect: String,
    /// Id of an aspect
    pub aspect_id: String,
    /// Name of an aspect
    pub aspect_name: String,
    /// Description of an aspect
    pub aspect_desc: String,
    /// Maximum scale level of an aspect
    pub aspect_max_level: String,

    /// Affinity or anti-affinity group list
    pub affinity_group: String,
    /// Id of a group
    pub group_id: String,
    /// Type of a group
    pub group_type: String,
    /// Scope of a group
    pub group_scope: String,
    /// Type value of affinity groups
    pub affinity_value: String,
    /// Type value of anti-affinity groups
    pub anti_affinity_value: String,

    /// Internal virtual link descriptor list
    pub virtual_link: String,
    /// Id of a link
    pub link_id: String,
    /// Description of a link
    pub link_desc: String,
    /// Layer protocol of a link
    pub link_protocol: String,

    /// VDU list
    pub vdu: String,
    /// Id of a VDU
    pub vdu_id: String,
    /// Name of a VDU
    pub vdu_name: String,
    /// Description of a VDU
    pub vdu_desc: String,
    /// Compute descriptor of a VDU
    pub vdu_compute: String,
    /// Storage descriptor of a VDU
    pub vdu_storage: String,

    /// Internal connection points of a VDU
    pub int_cpd: String,
    /// Id of an internal connection point
    pub int_cpd_id: String,
    /// Link of an internal connection point
    pub int_cpd_link: String,
    /// Layer protocol of an internal connection point
    pub int_cpd_protocol: String,

    /// External connection point list
    pub ext_cpd: String,
    /// Id of an external connection point
    pub ext_cpd_id: String,
    /// Link of an external connection point
    pub ext_cpd_link: String,
    /// Layer protocol of an external connection point
    pub ext_cpd_protocol: String,
    /// Id of the management external connection point
    pub ext_mgmt_id: String,
    /// Id of the orchestration external connection point
    pub ext_orch_id: String,
    /// Layer protocol written on external connection points
    pub ext_protocol_value: String,
}

impl Default for Sol6Keys {
    fn default() -> Self {
        let s = |p: &str| p.to_string();
        Self {
            vnfd: s("vnfd"),
            nfv_wrapper: s("data.etsi-nfv-descriptors:nfv"),

            compute_desc: s("vnfd.virtual-compute-descriptor"),
            compute_id: s("vnfd.virtual-compute-descriptor.id"),
            compute_flavor: s("vnfd.virtual-compute-descriptor.flavor-name"),
            compute_cpu: s("vnfd.virtual-compute-descriptor.virtual-cpu.num-virtual-cpu"),
            compute_memory: s("vnfd.virtual-compute-descriptor.virtual-memory.size"),

            storage_desc: s("vnfd.virtual-storage-descriptor"),
            storage_id: s("vnfd.virtual-storage-descriptor.id"),
            storage_type: s("vnfd.virtual-storage-descriptor.type-of-storage"),
            storage_size: s("vnfd.virtual-storage-descriptor.size-of-storage"),
            storage_type_value: s("root-storage"),

            vdu_profile: s("vnfd.df.vdu-profile"),
            vdu_profile_id: s("vnfd.df.vdu-profile.id"),
            vdu_profile_min: s("vnfd.df.vdu-profile.min-number-of-instances"),
            vdu_profile_max: s("vnfd.df.vdu-profile.max-number-of-instances"),
            vdu_profile_group: s("vnfd.df.vdu-profile.affinity-or-anti-affinity-group"),
            vdu_profile_group_id: s("vnfd.df.vdu-profile.affinity-or-anti-affinity-group.id"),

            level: s("vnfd.df.instantiation-level"),
            level_id: s("vnfd.df.instantiation-level.id"),
            level_desc: s("vnfd.df.instantiation-level.description"),
            level_vdu: s("vnfd.df.instantiation-level.vdu-level"),
            level_vdu_id: s("vnfd.df.instantiation-level.vdu-level.vdu-id"),
            level_instances: s("vnfd.df.instantiation-level.vdu-level.number-of-instances"),
            level_scaling: s("vnfd.df.instantiation-level.scaling-info"),
            level_scaling_aspect: s("vnfd.df.instantiation-level.scaling-info.scaling-aspect-id"),
            level_scaling_level: s("vnfd.df.instantiation-level.scaling-info.scale-level"),

            scaling_aspect: s("vnfd.df.scaling-aspect"),
            aspect_id: s("vnfd.df.scaling-aspect.id"),
            aspect_name: s("vnfd.df.scaling-aspect.name"),
            aspect_desc: s("vnfd.df.scaling-aspect.description"),
            aspect_max_level: s("vnfd.df.scaling-aspect.max-scale-level"),

            affinity_group: s("vnfd.df.affinity-or-anti-affinity-group"),
            group_id: s("vnfd.df.affinity-or-anti-affinity-group.id"),
            group_type: s("vnfd.df.affinity-or-anti-affinity-group.type"),
            group_scope: s("vnfd.df.affinity-or-anti-affinity-group.scope"),
            affinity_value: s("affinity"),
            anti_affinity_value: s("anti-affinity"),

            virtual_link: s("vnfd.int-virtual-link-desc"),
            link_id: s("vnfd.int-virtual-link-desc.id"),
            link_desc: s("vnfd.int-virtual-link-desc.description"),
            link_protocol: s("vnfd.int-virtual-link-desc.connectivity-type.layer-protocol"),

            vdu: s("vnfd.vdu"),
            vdu_id: s("vnfd.vdu.id"),
            vdu_name: s("vnfd.vdu.name"),
            vdu_desc: s("vnfd.vdu.description"),
            vdu_compute: s("vnfd.vdu.virtual-compute-desc"),
            vdu_storage: s("vnfd.vdu.virtual-storage-desc"),

            int_cpd: s("vnfd.vdu.int-cpd"),
            int_cpd_id: s("vnfd.vdu.int-cpd.id"),
            int_cpd_link: s("vnfd.vdu.int-cpd.int-virtual-link-desc"),
            int_cpd_protocol: s("vnfd.vdu.int-cpd.layer-protocol"),

            ext_cpd: s("vnfd.ext-cpd"),
            ext_cpd_id: s("vnfd.ext-cpd.id"),
            ext_cpd_link: s("vnfd.ext-cpd.int-virtual-link-desc"),
            ext_cpd_protocol: s("vnfd.ext-cpd.layer-protocol"),
            ext_mgmt_id: s("mgmt"),
            ext_orch_id: s("orchestration"),
            ext_protocol_value: s("ethernet"),
        }
    }
}

impl Sol6Keys {
    /// List containers the conversion fills
    pub fn containers(&self) -> [&str; 9] {
        [
            self.compute_desc.as_str(),
            self.storage_desc.as_str(),
            self.vdu_profile.as_str(),
            self.level.as_str(),
            self.scaling_aspect.as_str(),
            self.affinity_group.as_str(),
            self.virtual_link.as_str(),
            self.vdu.as_str(),
            self.ext_cpd.as_str(),
        ]
    }

    /// Each list field paired with the container it is relative to
    fn field_pairs(&self) -> Vec<(&str, &str)> {
        vec![
            (self.compute_id.as_str(), self.compute_desc.as_str()),
            (self.compute_flavor.as_str(), self.compute_desc.as_str()),
            (self.compute_cpu.as_str(), self.compute_desc.as_str()),
            (self.compute_memory.as_str(), self.compute_desc.as_str()),
            (self.storage_id.as_str(), self.storage_desc.as_str()),
            (self.storage_type.as_str(), self.storage_desc.as_str()),
            (self.storage_size.as_str(), self.storage_desc.as_str()),
            (self.vdu_profile_id.as_str(), self.vdu_profile.as_str()),
            (self.vdu_profile_min.as_str(), self.vdu_profile.as_str()),
            (self.vdu_profile_max.as_str(), self.vdu_profile.as_str()),
            (self.vdu_profile_group.as_str(), self.vdu_profile.as_str()),
            (self.vdu_profile_group_id.as_str(), self.vdu_profile_group.as_str()),
            (self.level_id.as_str(), self.level.as_str()),
            (self.level_desc.as_str(), self.level.as_str()),
            (self.level_vdu.as_str(), self.level.as_str()),
            (self.level_vdu_id.as_str(), self.level_vdu.as_str()),
            (self.level_instances.as_str(), self.level_vdu.as_str()),
            (self.level_scaling.as_str(), self.level.as_str()),
            (self.level_scaling_aspect.as_str(), self.level_scaling.as_str()),
            (self.level_scaling_level.as_str(), self.level_scaling.as_str()),
            (self.aspect_id.as_str(), self.scaling_aspect.as_str()),
            (self.aspect_name.as_str(), self.scaling_aspect.as_str()),
            (self.aspect_desc.as_str(), self.scaling_aspect.as_str()),
            (self.aspect_max_level.as_str(), self.scaling_aspect.as_str()),
            (self.group_id.as_str(), self.affinity_group.as_str()),
            (self.group_type.as_str(), self.affinity_group.as_str()),
            (self.group_scope.as_str(), self.affinity_group.as_str()),
            (self.link_id.as_str(), self.virtual_link.as_str()),
            (self.link_desc.as_str(), self.virtual_link.as_str()),
            (self.link_protocol.as_str(), self.virtual_link.as_str()),
            (self.vdu_id.as_str(), self.vdu.as_str()),
            (self.vdu_name.as_str(), self.vdu.as_str()),
            (self.vdu_desc.as_str(), self.vdu.as_str()),
            (self.vdu_compute.as_str(), self.vdu.as_str()),
            (self.vdu_storage.as_str(), self.vdu.as_str()),
            (self.int_cpd.as_str(), self.vdu.as_str()),
            (self.int_cpd_id.as_str(), self.int_cpd.as_str()),
            (self.int_cpd_link.as_str(), self.int_cpd.as_str()),
            (self.int_cpd_protocol.as_str(), self.int_cpd.as_str()),
            (self.ext_cpd_id.as_str(), self.ext_cpd.as_str()),
            (self.ext_cpd_link.as_str(), self.ext_cpd.as_str()),
            (self.ext_cpd_protocol.as_str(), self.ext_cpd.as_str()),
        ]
    }

    /// Check that every list field lies below its container
    pub fn validate(&self) -> Result<()> {
        for container in self.containers() {
            if relative_to(container, &self.vnfd)?.is_empty() {
                return Err(Error::Config(format!(
                    "container '{}' must lie below '{}'",
                    container, self.vnfd
                )));
            }
        }
        for (field, container) in self.field_pairs() {
            if relative_to(field, container)?.is_empty() {
                return Err(Error::Config(format!(
                    "field '{}' names its own container",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Default output skeleton: the root with every container declared
    ///
    /// With this skeleton a conversion works with strict structure, since
    /// every list the conversion writes already exists.
    pub fn skeleton(&self) -> Result<Tree> {
        let mut tree = Tree::empty_map();
        for container in self.containers() {
            write(container, &mut tree, Tree::Seq(Vec::new()), true, 0)?;
        }
        Ok(tree)
    }
}

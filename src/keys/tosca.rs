//! TOSCA (SOL001) path constants

use serde::{Deserialize, Serialize};

/// Node, policy and group type names plus the paths read from a TOSCA
/// descriptor
///
/// Paths starting with `topology_template` are absolute. The remaining
/// ones are relative to a discovered node template, policy or group. `{}`
/// placeholders take the instance name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToscaKeys {
    /// Declared template inputs
    pub inputs: String,
    /// Key marking a template-input reference (`{get_input: NAME}`)
    pub input_marker: String,
    /// Key holding an input's default value
    pub input_default: String,
    /// Key holding the type of a node template, policy or group
    pub type_key: String,

    /// TOSCA definitions version written by the reverse conversion
    pub definitions_version: String,
    /// Node type of the VNF itself
    pub vnf_type: String,
    /// Node type of a VDU
    pub vdu_type: String,
    /// Node type of a virtual block storage
    pub storage_type: String,
    /// Node type of an internal virtual link
    pub virtual_link_type: String,
    /// Node type of a connection point
    pub cp_type: String,
    /// Group type of a placement group
    pub placement_group_type: String,
    /// Policy type of an affinity rule
    pub affinity_type: String,
    /// Policy type of an anti-affinity rule
    pub anti_affinity_type: String,
    /// Policy type of per-VDU instantiation levels
    pub vdu_levels_type: String,
    /// Policy type of the instantiation level descriptions
    pub levels_type: String,
    /// Policy type of scaling aspects
    pub scaling_aspects_type: String,

    /// A node template by name
    pub node: String,
    /// Name of a VDU
    pub vdu_name: String,
    /// Description of a VDU
    pub vdu_desc: String,
    /// Flavor of a VDU (input reference or literal)
    pub vdu_flavor: String,
    /// Number of virtual CPUs of a VDU
    pub vdu_num_cpu: String,
    /// Memory size of a VDU (`"8 GB"`)
    pub vdu_mem_size: String,
    /// Minimum number of instances of a VDU
    pub vdu_profile_min: String,
    /// Maximum number of instances of a VDU
    pub vdu_profile_max: String,
    /// Storage requirement of a VDU, relative to the node
    pub vdu_storage: String,

    /// Size of a virtual block storage (`"10 GB"`)
    pub storage_size: String,

    /// Description of a virtual link
    pub link_desc: String,
    /// Layer protocols of a virtual link
    pub link_protocols: String,

    /// Substitution-mapping requirements
    pub sub_requirements: String,
    /// Management flag of a connection point, relative to the node
    pub cp_management: String,
    /// VDU a connection point is bound to, relative to the node
    pub cp_binding: String,
    /// Virtual link a connection point attaches to, relative to the node
    pub cp_link: String,
    /// Layer protocols of a connection point, relative to the node
    pub cp_protocols: String,

    /// Targets of a policy
    pub policy_targets: String,
    /// Placement scope of an affinity rule
    pub policy_scope: String,
    /// Members of a group
    pub group_members: String,
    /// Levels of an instantiation level policy
    pub policy_levels: String,
    /// Instance count inside one level
    pub level_instances: String,
    /// Description inside one level
    pub level_desc: String,
    /// Aspects of a scaling policy
    pub policy_aspects: String,
    /// Name inside one aspect
    pub aspect_name: String,
    /// Description inside one aspect
    pub aspect_desc: String,
    /// Maximum scale level inside one aspect
    pub aspect_max_level: String,
}

const NODE: &str = "topology_template.node_templates.{}";
const VNF: &str = "topology_template.node_templates.vnf";

fn node(rest: &str) -> String {
    format!("{}.{}", NODE, rest)
}

impl Default for ToscaKeys {
    fn default() -> Self {
        let compute = "capabilities.virtual_compute.properties";
        Self {
            inputs: "topology_template.inputs".to_string(),
            input_marker: "get_input".to_string(),
            input_default: "default".to_string(),
            type_key: "type".to_string(),

            definitions_version: "tosca_simple_yaml_1_2".to_string(),
            vnf_type: "tosca.nodes.nfv.VNF".to_string(),
            vdu_type: "tosca.nodes.nfv.Vdu.Compute".to_string(),
            storage_type: "tosca.nodes.nfv.Vdu.VirtualBlockStorage".to_string(),
            virtual_link_type: "tosca.nodes.nfv.VnfVirtualLink".to_string(),
            cp_type: "tosca.nodes.nfv.VduCp".to_string(),
            placement_group_type: "tosca.groups.nfv.PlacementGroup".to_string(),
            affinity_type: "tosca.policies.nfv.AffinityRule".to_string(),
            anti_affinity_type: "tosca.policies.nfv.AntiAffinityRule".to_string(),
            vdu_levels_type: "tosca.policies.nfv.VduInstantiationLevels".to_string(),
            levels_type: "tosca.policies.nfv.InstantiationLevels".to_string(),
            scaling_aspects_type: "tosca.policies.nfv.ScalingAspects".to_string(),

            node: NODE.to_string(),
            vdu_name: node("properties.name"),
            vdu_desc: node("properties.description"),
            vdu_flavor: node(&format!(
                "{}.requested_additional_capabilities.properties.requested_additional_capability_name",
                compute
            )),
            vdu_num_cpu: node(&format!("{}.virtual_cpu.num_virtual_cpu", compute)),
            vdu_mem_size: node(&format!("{}.virtual_memory.virtual_mem_size", compute)),
            vdu_profile_min: node("properties.vdu_profile.min_number_of_instances"),
            vdu_profile_max: node("properties.vdu_profile.max_number_of_instances"),
            vdu_storage: "requirements.virtual_storage".to_string(),

            storage_size: node("properties.virtual_block_storage_data.size_of_storage"),

            link_desc: node("properties.description"),
            link_protocols: node("properties.connectivity_type.layer_protocols"),

            sub_requirements: "topology_template.substitution_mappings.requirements".to_string(),
            cp_management: "properties.management".to_string(),
            cp_binding: "requirements.virtual_binding".to_string(),
            cp_link: "requirements.virtual_link".to_string(),
            cp_protocols: "properties.layer_protocols".to_string(),

            policy_targets: "targets".to_string(),
            policy_scope: "properties.scope".to_string(),
            group_members: "members".to_string(),
            policy_levels: "properties.levels".to_string(),
            level_instances: "number_of_instances".to_string(),
            level_desc: "description".to_string(),
            policy_aspects: "properties.aspects".to_string(),
            aspect_name: "name".to_string(),
            aspect_desc: "description".to_string(),
            aspect_max_level: "max_scale_level".to_string(),
        }
    }
}

impl ToscaKeys {
    /// Path of a property of the VNF node
    pub fn vnf_property(name: &str) -> String {
        format!("{}.properties.{}", VNF, name)
    }

    /// Accepted substitution-mapping requirement names
    pub fn default_sub_link_types() -> Vec<String> {
        ["virtual_link", "virtual_link_mgmt", "virtual_link_orch"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::format_template;

    #[test]
    fn test_node_templates_take_the_instance_name() {
        let keys = ToscaKeys::default();
        assert_eq!(
            format_template(&keys.vdu_num_cpu, &["c1"]).unwrap(),
            "topology_template.node_templates.c1.capabilities.virtual_compute.properties.virtual_cpu.num_virtual_cpu"
        );
        assert_eq!(
            format_template(&keys.storage_size, &["disk"]).unwrap(),
            "topology_template.node_templates.disk.properties.virtual_block_storage_data.size_of_storage"
        );
    }

    #[test]
    fn test_vnf_property() {
        assert_eq!(
            ToscaKeys::vnf_property("provider"),
            "topology_template.node_templates.vnf.properties.provider"
        );
    }

    #[test]
    fn test_partial_override() {
        let keys: ToscaKeys = serde_yaml::from_str("vdu_type: custom.Vdu\n").unwrap();
        assert_eq!(keys.vdu_type, "custom.Vdu");
        assert_eq!(keys.input_marker, "get_input");
    }
}

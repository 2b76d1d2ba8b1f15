//! Placement, instantiation level and scaling policies

use super::{optional, set_field, string_list, EntryBuilder, Sol6Converter};
use crate::documents::Tree;
use crate::error::Result;
use crate::paths::resolve;
use indexmap::IndexMap;
use tracing::{debug, warn};

impl<'a> Sol6Converter<'a> {
    /// One affinity or anti-affinity group per claimed placement group
    ///
    /// Rules are visited in document order. Each placement group is claimed
    /// by the first rule that targets it; later targets are skipped.
    pub(super) fn affinity_groups(&mut self) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);

        let groups = self.discover(&tosca.placement_group_type);
        let mut pool: Vec<&str> = groups.iter().map(|g| g.name).collect();
        let rules = self.discover_any(&[tosca.affinity_type.as_str(), tosca.anti_affinity_type.as_str()]);

        let mut entries = Vec::new();
        for rule in &rules {
            let anti = rule.body.get(&tosca.type_key).and_then(Tree::as_str)
                == Some(tosca.anti_affinity_type.as_str());
            let kind = if anti {
                &sol6.anti_affinity_value
            } else {
                &sol6.affinity_value
            };
            let scope = optional(resolve(&tosca.policy_scope, rule.body))?.cloned();

            for target in string_list(resolve(&tosca.policy_targets, rule.body).ok()) {
                let Some(pos) = pool.iter().position(|g| *g == target) else {
                    debug!(policy = rule.name, group = %target, "group already claimed or unknown, skipping");
                    continue;
                };
                pool.remove(pos);
                entries.push(
                    EntryBuilder::new(&sol6.affinity_group)
                        .set(&sol6.group_id, target.as_str())?
                        .set(&sol6.group_type, kind.as_str())?
                        .set_opt(&sol6.group_scope, scope.clone())?
                        .build(),
                );
            }
        }

        if !pool.is_empty() {
            debug!(groups = ?pool, "placement groups without a rule");
        }
        self.put_list(&sol6.affinity_group, entries)
    }

    /// One instantiation level per level id, listing the VDU instance counts
    pub(super) fn instantiation_levels(&mut self) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);

        // First description declared for a level wins
        let mut descriptions: IndexMap<&str, &Tree> = IndexMap::new();
        for policy in self.discover(&tosca.levels_type) {
            let Some(levels) = optional(resolve(&tosca.policy_levels, policy.body))? else {
                continue;
            };
            for level in levels.entries() {
                if let Some(desc) = level.body.get(&tosca.level_desc) {
                    descriptions.entry(level.name).or_insert(desc);
                }
            }
        }

        let mut grouped: IndexMap<&str, Vec<Tree>> = IndexMap::new();
        for policy in self.discover(&tosca.vdu_levels_type) {
            let targets = string_list(resolve(&tosca.policy_targets, policy.body).ok());
            let Some(levels) = optional(resolve(&tosca.policy_levels, policy.body))? else {
                warn!(policy = policy.name, "instantiation level policy declares no levels");
                continue;
            };
            for level in levels.entries() {
                let count = level.body.get(&tosca.level_instances).cloned();
                for target in &targets {
                    let vdu_level = EntryBuilder::new(&sol6.level_vdu)
                        .set(&sol6.level_vdu_id, target.as_str())?
                        .set_opt(&sol6.level_instances, count.clone())?
                        .build();
                    grouped.entry(level.name).or_default().push(vdu_level);
                }
            }
        }

        let mut entries = Vec::with_capacity(grouped.len());
        for (level, vdu_levels) in grouped {
            let mut entry = EntryBuilder::new(&sol6.level).set(&sol6.level_id, level)?;
            match descriptions.get(level) {
                Some(desc) => entry = entry.set(&sol6.level_desc, (*desc).clone())?,
                None => warn!(level, "no description declared for instantiation level"),
            }
            entries.push(entry.set(&sol6.level_vdu, Tree::Seq(vdu_levels))?.build());
        }
        self.put_list(&sol6.level, entries)
    }

    /// Scaling aspects, with every level starting at scale level zero
    pub(super) fn scaling_aspects(&mut self) -> Result<()> {
        let keys = self.keys;
        let (tosca, sol6) = (&keys.tosca, &keys.sol6);

        let mut aspects = Vec::new();
        let mut scaling_info = Vec::new();
        for policy in self.discover(&tosca.scaling_aspects_type) {
            let Some(declared) = optional(resolve(&tosca.policy_aspects, policy.body))? else {
                warn!(policy = policy.name, "scaling policy declares no aspects");
                continue;
            };
            for aspect in declared.entries() {
                let name = aspect
                    .body
                    .get(&tosca.aspect_name)
                    .cloned()
                    .filter(Tree::is_truthy)
                    .unwrap_or_else(|| Tree::from(aspect.name));

                aspects.push(
                    EntryBuilder::new(&sol6.scaling_aspect)
                        .set(&sol6.aspect_id, aspect.name)?
                        .set(&sol6.aspect_name, name)?
                        .set_opt(&sol6.aspect_desc, aspect.body.get(&tosca.aspect_desc).cloned())?
                        .set_opt(
                            &sol6.aspect_max_level,
                            aspect.body.get(&tosca.aspect_max_level).cloned(),
                        )?
                        .build(),
                );
                scaling_info.push(
                    EntryBuilder::new(&sol6.level_scaling)
                        .set(&sol6.level_scaling_aspect, aspect.name)?
                        .set(&sol6.level_scaling_level, 0)?
                        .build(),
                );
            }
        }

        if !scaling_info.is_empty() {
            for level in self.list_mut(&sol6.level)?.iter_mut() {
                set_field(level, &sol6.level_scaling, &sol6.level, Tree::Seq(scaling_info.clone()))?;
            }
        }
        self.put_list(&sol6.scaling_aspect, aspects)
    }
}

#[cfg(test)]
mod tests {
    use crate::converters::{ConverterConfig, Sol6Converter};
    use crate::documents::{from_yaml_str, Tree};
    use crate::keys::SchemaKeys;
    use crate::paths::resolve;
    use pretty_assertions::assert_eq;

    const POLICIES: &str = r#"
topology_template:
  groups:
    grpA: {type: tosca.groups.nfv.PlacementGroup, members: [c1, c2]}
    grpB: {type: tosca.groups.nfv.PlacementGroup, members: [c3]}
  policies:
    - anti1:
        type: tosca.policies.nfv.AntiAffinityRule
        targets: [grpA]
        properties: {scope: nfvi_node}
    - aff1:
        type: tosca.policies.nfv.AffinityRule
        targets: [grpA, grpB]
        properties: {scope: zone}
    - levels:
        type: tosca.policies.nfv.InstantiationLevels
        properties:
          levels:
            default: {description: Default level}
            large: {description: Large level}
    - c1_levels:
        type: tosca.policies.nfv.VduInstantiationLevels
        targets: [c1]
        properties:
          levels:
            default: {number_of_instances: 1}
            large: {number_of_instances: 3}
    - c2_levels:
        type: tosca.policies.nfv.VduInstantiationLevels
        targets: [c2]
        properties:
          levels:
            default: {number_of_instances: 0}
    - scaling:
        type: tosca.policies.nfv.ScalingAspects
        properties:
          aspects:
            worker: {name: worker_aspect, description: Worker scaling, max_scale_level: 5}
"#;

    fn run(doc: &str) -> Tree {
        let source = from_yaml_str(doc).unwrap();
        let keys = SchemaKeys::default();
        let config = ConverterConfig::new().with_strict_structure(false);
        let mut out = Sol6Converter::new(&source, Tree::empty_map(), &keys, config);
        out.affinity_groups().unwrap();
        out.instantiation_levels().unwrap();
        out.scaling_aspects().unwrap();
        out.target
    }

    #[test]
    fn test_each_group_is_claimed_once() {
        let out = run(POLICIES);
        let expected = from_yaml_str(
            r#"
- {id: grpA, type: anti-affinity, scope: nfvi_node}
- {id: grpB, type: affinity, scope: zone}
"#,
        )
        .unwrap();
        assert_eq!(resolve("vnfd.df.affinity-or-anti-affinity-group", &out).unwrap(), &expected);
    }

    #[test]
    fn test_levels_group_vdus_and_carry_scaling_info() {
        let out = run(POLICIES);
        let expected = from_yaml_str(
            r#"
- id: default
  description: Default level
  vdu-level:
    - {vdu-id: c1, number-of-instances: 1}
    - {vdu-id: c2, number-of-instances: 0}
  scaling-info: [{scaling-aspect-id: worker, scale-level: 0}]
- id: large
  description: Large level
  vdu-level:
    - {vdu-id: c1, number-of-instances: 3}
  scaling-info: [{scaling-aspect-id: worker, scale-level: 0}]
"#,
        )
        .unwrap();
        assert_eq!(resolve("vnfd.df.instantiation-level", &out).unwrap(), &expected);
    }

    #[test]
    fn test_scaling_aspects() {
        let out = run(POLICIES);
        let expected = from_yaml_str(
            "[{id: worker, name: worker_aspect, description: Worker scaling, max-scale-level: 5}]",
        )
        .unwrap();
        assert_eq!(resolve("vnfd.df.scaling-aspect", &out).unwrap(), &expected);
    }

    #[test]
    fn test_level_without_description() {
        let doc = r#"
topology_template:
  policies:
    - c1_levels:
        type: tosca.policies.nfv.VduInstantiationLevels
        targets: [c1]
        properties:
          levels: [{base: {number_of_instances: 2}}]
"#;
        let out = run(doc);
        assert_eq!(
            resolve("vnfd.df.instantiation-level", &out).unwrap(),
            &from_yaml_str("[{id: base, vdu-level: [{vdu-id: c1, number-of-instances: 2}]}]")
                .unwrap()
        );
    }

    #[test]
    fn test_no_policies_write_empty_lists() {
        let out = run("topology_template: {node_templates: {}}\n");
        assert_eq!(
            resolve("vnfd.df.affinity-or-anti-affinity-group", &out).unwrap(),
            &Tree::Seq(vec![])
        );
        assert_eq!(resolve("vnfd.df.scaling-aspect", &out).unwrap(), &Tree::Seq(vec![]));
    }
}

//! Predicate-based subtree discovery
//!
//! Finds every mapping node that holds a given key (optionally with a given
//! value) anywhere in a document. This is how repeated structure is found
//! regardless of nesting depth: every node template of a given `type`,
//! every policy of a given kind, and so on.

use crate::documents::{Entry, Tree};

/// A discovered subtree
///
/// `parent_key` is the key the matching node is stored under, which for
/// node templates and policies is the instance name. Matches found at the
/// top level or directly inside a sequence have no parent key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Subtree<'a> {
    /// Key of the owning mapping entry, if any
    pub parent_key: Option<&'a str>,
    /// The matching mapping node
    pub node: &'a Tree,
}

impl<'a> Subtree<'a> {
    /// Instance name (the parent key)
    pub fn name(&self) -> Option<&'a str> {
        self.parent_key
    }

    /// The match as a named entry, when it has a parent key
    pub fn entry(&self) -> Option<Entry<'a>> {
        self.parent_key.map(|name| Entry {
            name,
            body: self.node,
        })
    }
}

/// Find every subtree whose mapping holds `key` (equal to `value`, if given)
///
/// Returns `None` when `tree` is not a mapping, and `Some` (possibly empty)
/// otherwise. Matches are listed in discovery order: each mapping's entries
/// are visited in order, a node is recorded when its matching key is
/// reached, and every entry's value is then searched as well, so matches
/// nested inside a matching node are still found.
pub fn find_all<'a>(tree: &'a Tree, key: &str, value: Option<&Tree>) -> Option<Vec<Subtree<'a>>> {
    if !tree.is_map() {
        return None;
    }

    let mut found = Vec::new();
    collect(tree, None, key, value, &mut found);
    Some(found)
}

/// Find every subtree whose `key` equals the string `value`
pub fn find_by<'a>(tree: &'a Tree, key: &str, value: &str) -> Vec<Subtree<'a>> {
    let value = Tree::from(value);
    find_all(tree, key, Some(&value)).unwrap_or_default()
}

fn collect<'a>(
    node: &'a Tree,
    parent_key: Option<&'a str>,
    key: &str,
    value: Option<&Tree>,
    found: &mut Vec<Subtree<'a>>,
) {
    let Tree::Map(map) = node else {
        return;
    };

    for (k, v) in map {
        if k == key && value.map_or(true, |expected| v == expected) {
            found.push(Subtree { parent_key, node });
        }

        match v {
            Tree::Seq(items) => {
                for item in items {
                    collect(item, None, key, value, found);
                }
            }
            Tree::Map(_) => collect(v, Some(k.as_str()), key, value, found),
            Tree::Scalar(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::from_yaml_str;

    const VDU: &str = "tosca.nodes.nfv.Vdu.Compute";

    fn names(found: &[Subtree<'_>]) -> Vec<Option<String>> {
        found.iter().map(|s| s.name().map(str::to_string)).collect()
    }

    #[test]
    fn test_non_mapping_is_not_a_candidate() {
        assert!(find_all(&Tree::from("x"), "type", None).is_none());
        assert!(find_all(&Tree::Seq(vec![]), "type", None).is_none());
    }

    #[test]
    fn test_mapping_without_match_is_empty() {
        let tree = from_yaml_str("a: {b: 1}\n").unwrap();
        assert_eq!(find_all(&tree, "type", None), Some(vec![]));
    }

    #[test]
    fn test_finds_named_nodes_in_order() {
        let tree = from_yaml_str(&format!(
            r#"
topology_template:
  node_templates:
    c1: {{type: {VDU}}}
    vl: {{type: tosca.nodes.nfv.VnfVirtualLink}}
    c2: {{type: {VDU}}}
"#
        ))
        .unwrap();

        let found = find_by(&tree, "type", VDU);
        assert_eq!(names(&found), vec![Some("c1".into()), Some("c2".into())]);
        assert_eq!(found[0].node.get("type").and_then(Tree::as_str), Some(VDU));
        assert_eq!(found[1].entry().map(|e| e.name), Some("c2"));
    }

    #[test]
    fn test_matches_at_any_depth() {
        let tree = from_yaml_str(
            r#"
a:
  x: {kind: hit}
  deeper:
    still:
      y: {kind: hit}
b:
  - z: {kind: hit}
"#,
        )
        .unwrap();

        let found = find_by(&tree, "kind", "hit");
        assert_eq!(
            names(&found),
            vec![Some("x".into()), Some("y".into()), Some("z".into())]
        );
    }

    #[test]
    fn test_sequence_elements_carry_no_parent_key() {
        let tree = from_yaml_str("list:\n  - {type: t, n: 1}\n  - {type: t, n: 2}\n").unwrap();
        let found = find_by(&tree, "type", "t");
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|s| s.parent_key.is_none()));
        assert_eq!(found[1].node.get("n"), Some(&Tree::from(2)));
    }

    #[test]
    fn test_top_level_match_is_raw() {
        let tree = from_yaml_str("type: t\n").unwrap();
        let found = find_all(&tree, "type", None).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].parent_key.is_none());
        assert_eq!(found[0].node, &tree);
    }

    #[test]
    fn test_key_only_filter() {
        let tree = from_yaml_str("a: {members: [x]}\nb: {members: []}\nc: {other: 1}\n").unwrap();
        let found = find_all(&tree, "members", None).unwrap();
        assert_eq!(names(&found), vec![Some("a".into()), Some("b".into())]);
    }

    #[test]
    fn test_match_is_reported_once_and_descendants_are_searched() {
        let tree = from_yaml_str(
            r#"
outer:
  type: t
  properties:
    inner: {type: t}
"#,
        )
        .unwrap();

        let found = find_by(&tree, "type", "t");
        assert_eq!(names(&found), vec![Some("outer".into()), Some("inner".into())]);
    }

    #[test]
    fn test_value_filter_rejects_other_values() {
        let tree = from_yaml_str("a: {type: x}\nb: {type: y}\n").unwrap();
        let found = find_all(&tree, "type", Some(&Tree::from("y"))).unwrap();
        assert_eq!(names(&found), vec![Some("b".into())]);
    }
}

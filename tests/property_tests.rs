//! Property tests for the path engine

use proptest::prelude::*;
use vnfd_convert::converters::strip_unit;
use vnfd_convert::documents::Tree;
use vnfd_convert::paths::{resolve, resolve_with, write, write_with, ListSelect};

fn scalar() -> impl Strategy<Value = Tree> {
    prop_oneof![
        any::<i64>().prop_map(Tree::from),
        any::<bool>().prop_map(Tree::from),
        "[a-z0-9 ]{0,8}".prop_map(Tree::from),
    ]
}

fn mapping(inner: impl Strategy<Value = Tree>) -> impl Strategy<Value = Tree> {
    prop::collection::vec(("[a-z]{1,4}", inner), 1..4)
        .prop_map(|entries| Tree::Map(entries.into_iter().collect()))
}

/// Mappings nested in mappings only
fn document() -> impl Strategy<Value = Tree> {
    mapping(scalar().prop_recursive(4, 32, 4, |inner| mapping(inner)))
}

/// Mappings whose values may be lists of mappings, as in descriptors
fn document_with_lists() -> impl Strategy<Value = Tree> {
    let node = scalar().prop_recursive(4, 48, 4, |inner| {
        prop_oneof![
            mapping(inner.clone()),
            prop::collection::vec(mapping(inner), 0..4).prop_map(Tree::Seq),
        ]
    });
    mapping(node)
}

fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

/// Every path below the root of a mapping-only tree
fn paths(tree: &Tree, prefix: &str, out: &mut Vec<String>) {
    if let Tree::Map(map) = tree {
        for (key, child) in map {
            let path = join(prefix, key);
            paths(child, &path, out);
            out.push(path);
        }
    }
}

/// The mapping a path step lands on once element `index` of a list is taken
fn descend(tree: &Tree, index: usize) -> Option<&Tree> {
    let node = match tree {
        Tree::Seq(items) => items.get(index)?,
        other => other,
    };
    node.is_map().then_some(node)
}

/// Every path that resolves when each list met selects element `index`
///
/// With `mappings_only`, only paths ending on a mapping (after that
/// selection) are kept, so a fresh key can be written below them.
fn reachable(tree: &Tree, index: usize, prefix: &str, mappings_only: bool, out: &mut Vec<String>) {
    let Some(Tree::Map(map)) = descend(tree, index) else {
        return;
    };
    for (key, child) in map {
        let path = join(prefix, key);
        if !mappings_only || descend(child, index).is_some() {
            out.push(path.clone());
        }
        reachable(child, index, &path, mappings_only, out);
    }
}

proptest! {
    #[test]
    fn prop_rewriting_a_resolved_value_is_a_no_op(doc in document(), pick in any::<prop::sample::Index>()) {
        let mut all = Vec::new();
        paths(&doc, "", &mut all);
        let path = pick.get(&all).clone();

        let value = resolve(&path, &doc).unwrap().clone();
        let mut copy = doc.clone();
        write(&path, &mut copy, value, false, 0).unwrap();
        prop_assert_eq!(copy, doc);
    }

    #[test]
    fn prop_rewriting_through_lists_is_a_no_op(
        doc in document_with_lists(),
        index in 0usize..3,
        pick in any::<prop::sample::Index>(),
    ) {
        let mut all = Vec::new();
        reachable(&doc, index, "", false, &mut all);
        prop_assume!(!all.is_empty());
        let path = pick.get(&all).clone();
        let select = ListSelect::Each(index);

        let value = resolve_with(&path, &doc, select).unwrap().clone();
        let mut copy = doc.clone();
        write_with(&path, &mut copy, value, false, select).unwrap();
        prop_assert_eq!(copy, doc);
    }

    #[test]
    fn prop_written_value_reads_back(
        segments in prop::collection::vec("[a-z]{1,6}", 1..5),
        value in scalar(),
    ) {
        let path = segments.join(".");
        let mut tree = Tree::empty_map();
        write(&path, &mut tree, value.clone(), true, 0).unwrap();
        prop_assert_eq!(resolve(&path, &tree).unwrap(), &value);
    }

    #[test]
    fn prop_new_leaf_under_existing_path_reads_back(
        doc in document_with_lists(),
        index in 0usize..3,
        pick in any::<prop::sample::Index>(),
        value in scalar(),
    ) {
        // The root counts as a parent, so there is always a candidate
        let mut parents = vec![String::new()];
        reachable(&doc, index, "", true, &mut parents);
        let path = join(pick.get::<String>(&parents), "new_leaf");
        let select = ListSelect::Each(index);

        let mut copy = doc.clone();
        write_with(&path, &mut copy, value.clone(), true, select).unwrap();
        prop_assert_eq!(resolve_with(&path, &copy, select).unwrap(), &value);
    }

    #[test]
    fn prop_strict_overwrite_reads_back(
        doc in document_with_lists(),
        index in 0usize..3,
        pick in any::<prop::sample::Index>(),
        value in scalar(),
    ) {
        let mut all = Vec::new();
        reachable(&doc, index, "", false, &mut all);
        prop_assume!(!all.is_empty());
        let path = pick.get(&all).clone();
        let select = ListSelect::Each(index);

        let mut copy = doc.clone();
        write_with(&path, &mut copy, value.clone(), false, select).unwrap();
        prop_assert_eq!(resolve_with(&path, &copy, select).unwrap(), &value);
    }

    #[test]
    fn prop_unit_suffix_is_dropped(n in any::<i32>(), unit in "[A-Za-z]{1,3}", space in " ?") {
        let text = format!("{}{}{}", n, space, unit);
        prop_assert_eq!(strip_unit(&Tree::from(text.as_str())), Tree::from(n.to_string().as_str()));
    }
}

//! Document tree model
//!
//! Both descriptor dialects are hierarchical key/value documents. This
//! module provides the closed `Tree` type they are loaded into, its
//! truthiness rules, and conversions from and to YAML and JSON.

use crate::error::Result;
use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered mapping node
pub type TreeMap = IndexMap<String, Tree>;

/// Leaf value of a document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    /// Null / missing value
    Null,
    /// Boolean
    Bool(bool),
    /// Integer number
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String
    Str(String),
}

impl Scalar {
    /// Check if this scalar is falsy (null, false, zero or empty string)
    pub fn is_falsy(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::Bool(b) => !b,
            Scalar::Int(i) => *i == 0,
            Scalar::Float(f) => *f == 0.0,
            Scalar::Str(s) => s.is_empty(),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => write!(f, "null"),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

/// A parsed document: mapping, sequence or scalar
#[derive(Debug, Clone, PartialEq)]
pub enum Tree {
    /// Ordered mapping from string keys to subtrees
    Map(TreeMap),
    /// Ordered sequence of subtrees
    Seq(Vec<Tree>),
    /// Leaf value
    Scalar(Scalar),
}

/// A single named entry of a mapping
///
/// Several source constructs wrap their payload in a one-key mapping
/// (`{vdu_name: {...}}`, `{level_name: {...}}`). This record names both
/// halves explicitly.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry<'a> {
    /// The key of the entry
    pub name: &'a str,
    /// The value stored under the key
    pub body: &'a Tree,
}

impl Tree {
    /// Create an empty mapping
    pub fn empty_map() -> Self {
        Tree::Map(TreeMap::new())
    }

    /// Create a null scalar
    pub fn null() -> Self {
        Tree::Scalar(Scalar::Null)
    }

    /// Create the blank placeholder used while fabricating paths
    pub fn blank() -> Self {
        Tree::Scalar(Scalar::Str(String::new()))
    }

    /// Check if this is a mapping
    pub fn is_map(&self) -> bool {
        matches!(self, Tree::Map(_))
    }

    /// Check if this is a sequence
    pub fn is_seq(&self) -> bool {
        matches!(self, Tree::Seq(_))
    }

    /// Get the mapping, if this is one
    pub fn as_map(&self) -> Option<&TreeMap> {
        match self {
            Tree::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get the mapping mutably, if this is one
    pub fn as_map_mut(&mut self) -> Option<&mut TreeMap> {
        match self {
            Tree::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Get the sequence, if this is one
    pub fn as_seq(&self) -> Option<&[Tree]> {
        match self {
            Tree::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Get the sequence mutably, if this is one
    pub fn as_seq_mut(&mut self) -> Option<&mut Vec<Tree>> {
        match self {
            Tree::Seq(items) => Some(items),
            _ => None,
        }
    }

    /// Get the string value, if this is a string scalar
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Tree::Scalar(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Get the integer value, if this is an integer scalar
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Tree::Scalar(Scalar::Int(i)) => Some(*i),
            _ => None,
        }
    }

    /// Get the boolean value, if this is a boolean scalar
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Tree::Scalar(Scalar::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    /// Text form of a scalar; `None` for mappings and sequences
    pub fn to_text(&self) -> Option<String> {
        match self {
            Tree::Scalar(s) => Some(s.to_string()),
            _ => None,
        }
    }

    /// Look up a key of a mapping
    pub fn get(&self, key: &str) -> Option<&Tree> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Check truthiness: null, false, zero, "", {} and [] are falsy
    pub fn is_falsy(&self) -> bool {
        match self {
            Tree::Map(m) => m.is_empty(),
            Tree::Seq(items) => items.is_empty(),
            Tree::Scalar(s) => s.is_falsy(),
        }
    }

    /// Inverse of [`Tree::is_falsy`]
    pub fn is_truthy(&self) -> bool {
        !self.is_falsy()
    }

    /// Check for numeric zero (booleans are not numbers here)
    pub fn is_zero(&self) -> bool {
        match self {
            Tree::Scalar(Scalar::Int(0)) => true,
            Tree::Scalar(Scalar::Float(f)) => *f == 0.0,
            _ => false,
        }
    }

    /// View a one-key mapping as a named entry
    pub fn single_entry(&self) -> Option<Entry<'_>> {
        match self {
            Tree::Map(m) if m.len() == 1 => m
                .iter()
                .next()
                .map(|(name, body)| Entry { name, body }),
            _ => None,
        }
    }

    /// Iterate the entries of a mapping, or the single entries of a
    /// sequence of one-key mappings
    ///
    /// Source documents write repeated named items either way
    /// (`levels: {a: .., b: ..}` or `levels: [{a: ..}, {b: ..}]`).
    pub fn entries(&self) -> Vec<Entry<'_>> {
        match self {
            Tree::Map(m) => m.iter().map(|(name, body)| Entry { name, body }).collect(),
            Tree::Seq(items) => items.iter().filter_map(Tree::single_entry).collect(),
            Tree::Scalar(_) => Vec::new(),
        }
    }

    /// Nesting depth (a scalar has depth 0)
    pub fn depth(&self) -> usize {
        match self {
            Tree::Map(m) => 1 + m.values().map(Tree::depth).max().unwrap_or(0),
            Tree::Seq(items) => 1 + items.iter().map(Tree::depth).max().unwrap_or(0),
            Tree::Scalar(_) => 0,
        }
    }

    /// Compact single-line rendering for diagnostics
    pub fn describe(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self))
    }
}

impl From<Scalar> for Tree {
    fn from(s: Scalar) -> Self {
        Tree::Scalar(s)
    }
}

impl From<&str> for Tree {
    fn from(s: &str) -> Self {
        Tree::Scalar(Scalar::Str(s.to_string()))
    }
}

impl From<String> for Tree {
    fn from(s: String) -> Self {
        Tree::Scalar(Scalar::Str(s))
    }
}

impl From<i64> for Tree {
    fn from(i: i64) -> Self {
        Tree::Scalar(Scalar::Int(i))
    }
}

impl From<i32> for Tree {
    fn from(i: i32) -> Self {
        Tree::Scalar(Scalar::Int(i64::from(i)))
    }
}

impl From<bool> for Tree {
    fn from(b: bool) -> Self {
        Tree::Scalar(Scalar::Bool(b))
    }
}

impl From<f64> for Tree {
    fn from(f: f64) -> Self {
        Tree::Scalar(Scalar::Float(f))
    }
}

impl From<Vec<Tree>> for Tree {
    fn from(items: Vec<Tree>) -> Self {
        Tree::Seq(items)
    }
}

impl From<TreeMap> for Tree {
    fn from(m: TreeMap) -> Self {
        Tree::Map(m)
    }
}

// =============================================================================
// YAML / JSON conversion
// =============================================================================

fn yaml_key_text(key: &serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => "null".to_string(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

impl From<serde_yaml::Value> for Tree {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Tree::null(),
            Value::Bool(b) => Tree::from(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Tree::from(i)
                } else {
                    Tree::from(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Tree::from(s),
            Value::Sequence(items) => Tree::Seq(items.into_iter().map(Tree::from).collect()),
            Value::Mapping(mapping) => Tree::Map(
                mapping
                    .into_iter()
                    .map(|(k, v)| (yaml_key_text(&k), Tree::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Tree::from(tagged.value),
        }
    }
}

impl From<serde_json::Value> for Tree {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Tree::null(),
            Value::Bool(b) => Tree::from(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Tree::from(i)
                } else {
                    Tree::from(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Tree::from(s),
            Value::Array(items) => Tree::Seq(items.into_iter().map(Tree::from).collect()),
            Value::Object(obj) => Tree::Map(obj.into_iter().map(|(k, v)| (k, Tree::from(v))).collect()),
        }
    }
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Tree::Map(m) => {
                let mut map = serializer.serialize_map(Some(m.len()))?;
                for (k, v) in m {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Tree::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Tree::Scalar(Scalar::Null) => serializer.serialize_unit(),
            Tree::Scalar(Scalar::Bool(b)) => serializer.serialize_bool(*b),
            Tree::Scalar(Scalar::Int(i)) => serializer.serialize_i64(*i),
            Tree::Scalar(Scalar::Float(f)) => serializer.serialize_f64(*f),
            Tree::Scalar(Scalar::Str(s)) => serializer.serialize_str(s),
        }
    }
}

impl<'de> Deserialize<'de> for Tree {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_yaml::Value::deserialize(deserializer).map(Tree::from)
    }
}

/// Parse a YAML document into a tree
pub fn from_yaml_str(text: &str) -> Result<Tree> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;
    Ok(Tree::from(value))
}

/// Parse a JSON document into a tree
pub fn from_json_str(text: &str) -> Result<Tree> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    Ok(Tree::from(value))
}

/// Serialize a tree as YAML
pub fn to_yaml_string(tree: &Tree) -> Result<String> {
    Ok(serde_yaml::to_string(tree)?)
}

/// Serialize a tree as JSON
pub fn to_json_string(tree: &Tree, pretty: bool) -> Result<String> {
    if pretty {
        Ok(serde_json::to_string_pretty(tree)?)
    } else {
        Ok(serde_json::to_string(tree)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_preserves_key_order() {
        let tree = from_yaml_str("zeta: 1\nalpha: 2\nmid: 3\n").unwrap();
        let keys: Vec<&str> = tree.as_map().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_yaml_scalars() {
        let tree = from_yaml_str("a: 1\nb: 2.5\nc: true\nd: ~\ne: text\n").unwrap();
        assert_eq!(tree.get("a"), Some(&Tree::from(1)));
        assert_eq!(tree.get("b"), Some(&Tree::from(2.5)));
        assert_eq!(tree.get("c"), Some(&Tree::from(true)));
        assert_eq!(tree.get("d"), Some(&Tree::null()));
        assert_eq!(tree.get("e").and_then(Tree::as_str), Some("text"));
    }

    #[test]
    fn test_yaml_non_string_keys_are_stringified() {
        let tree = from_yaml_str("1: one\ntrue: yes-value\n").unwrap();
        assert!(tree.get("1").is_some());
        assert!(tree.get("true").is_some());
    }

    #[test]
    fn test_truthiness() {
        assert!(Tree::null().is_falsy());
        assert!(Tree::blank().is_falsy());
        assert!(Tree::empty_map().is_falsy());
        assert!(Tree::Seq(vec![]).is_falsy());
        assert!(Tree::from(0).is_falsy());
        assert!(Tree::from(false).is_falsy());
        assert!(Tree::from("x").is_truthy());
        assert!(Tree::from(3).is_truthy());
    }

    #[test]
    fn test_is_zero_excludes_false() {
        assert!(Tree::from(0).is_zero());
        assert!(Tree::from(0.0).is_zero());
        assert!(!Tree::from(false).is_zero());
        assert!(!Tree::blank().is_zero());
    }

    #[test]
    fn test_single_entry() {
        let tree = from_yaml_str("c1:\n  type: compute\n").unwrap();
        let entry = tree.single_entry().unwrap();
        assert_eq!(entry.name, "c1");
        assert_eq!(entry.body.get("type").and_then(Tree::as_str), Some("compute"));

        let two = from_yaml_str("a: 1\nb: 2\n").unwrap();
        assert!(two.single_entry().is_none());
    }

    #[test]
    fn test_entries_from_map_and_list() {
        let as_map = from_yaml_str("a: 1\nb: 2\n").unwrap();
        let as_list = from_yaml_str("- a: 1\n- b: 2\n").unwrap();
        let names = |t: &Tree| t.entries().iter().map(|e| e.name.to_string()).collect::<Vec<_>>();
        assert_eq!(names(&as_map), vec!["a", "b"]);
        assert_eq!(names(&as_list), vec!["a", "b"]);
    }

    #[test]
    fn test_depth() {
        assert_eq!(Tree::from(1).depth(), 0);
        let tree = from_yaml_str("a:\n  b:\n    - c: 1\n").unwrap();
        assert_eq!(tree.depth(), 4);
    }

    #[test]
    fn test_json_yaml_agree() {
        let yaml = from_yaml_str("a:\n  - 1\n  - x\nb: {c: false}\n").unwrap();
        let json = from_json_str(r#"{"a": [1, "x"], "b": {"c": false}}"#).unwrap();
        assert_eq!(yaml, json);
    }

    #[test]
    fn test_serialize_json() {
        let tree = from_yaml_str("b: 1\na: [x, 2]\n").unwrap();
        assert_eq!(to_json_string(&tree, false).unwrap(), r#"{"b":1,"a":["x",2]}"#);
    }

    #[test]
    fn test_deserialize_through_serde() {
        let tree: Tree = serde_json::from_str(r#"{"k": [true, null]}"#).unwrap();
        assert_eq!(
            tree.get("k"),
            Some(&Tree::Seq(vec![Tree::from(true), Tree::null()]))
        );
    }
}

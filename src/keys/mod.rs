//! Schema key tables
//!
//! The literal path strings of both descriptor dialects, kept as data.
//! Every table deserializes with defaults, so a YAML or JSON key file only
//! has to name the entries it changes:
//!
//! ```yaml
//! tosca:
//!   vdu_type: acme.nodes.Vdu
//! one_to_one:
//!   - key: id
//!     tosca: topology_template.node_templates.vnf.properties.descriptor_id
//!     sol6: vnfd.id
//! ```

pub mod sol6;
pub mod tosca;

pub use sol6::Sol6Keys;
pub use tosca::ToscaKeys;

use crate::documents::Tree;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A field copied verbatim between the two dialects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneToOne {
    /// Name of the field
    pub key: String,
    /// Path in the TOSCA descriptor
    pub tosca: String,
    /// Path in the SOL006 descriptor
    pub sol6: String,
}

impl OneToOne {
    fn new(key: &str, tosca_property: &str, sol6: &str) -> Self {
        Self {
            key: key.to_string(),
            tosca: ToscaKeys::vnf_property(tosca_property),
            sol6: sol6.to_string(),
        }
    }
}

/// A constant written into the SOL006 descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Literal {
    /// Destination path
    pub path: String,
    /// Value written
    pub value: String,
}

/// Every key table a conversion needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaKeys {
    /// TOSCA types and paths
    pub tosca: ToscaKeys,
    /// SOL006 paths and values
    pub sol6: Sol6Keys,
    /// Fields copied verbatim
    pub one_to_one: Vec<OneToOne>,
    /// Constants written after the verbatim copies
    pub literals: Vec<Literal>,
    /// Substitution-mapping requirement names that name connection points
    pub sub_link_types: Vec<String>,
}

impl Default for SchemaKeys {
    fn default() -> Self {
        Self {
            tosca: ToscaKeys::default(),
            sol6: Sol6Keys::default(),
            one_to_one: default_one_to_one(),
            literals: Vec::new(),
            sub_link_types: ToscaKeys::default_sub_link_types(),
        }
    }
}

fn default_one_to_one() -> Vec<OneToOne> {
    vec![
        OneToOne::new("id", "descriptor_id", "vnfd.id"),
        OneToOne::new("provider", "provider", "vnfd.provider"),
        OneToOne::new("product_name", "product_name", "vnfd.product-name"),
        OneToOne::new("software_version", "software_version", "vnfd.software-version"),
        OneToOne::new("version", "descriptor_version", "vnfd.version"),
        OneToOne::new("product_info_name", "product_info_name", "vnfd.product-info-name"),
        OneToOne::new(
            "product_info_description",
            "product_info_description",
            "vnfd.product-info-description",
        ),
        OneToOne::new("vnfm_info", "vnfm_info", "vnfd.vnfm-info"),
        OneToOne::new("df_id", "flavour_id", "vnfd.df.id"),
        OneToOne::new("df_description", "flavour_description", "vnfd.df.description"),
    ]
}

impl SchemaKeys {
    /// Build key tables from a loaded key document
    pub fn from_tree(tree: &Tree) -> Result<Self> {
        let value = serde_json::to_value(tree)?;
        let keys: SchemaKeys = serde_json::from_value(value)?;
        keys.validate()?;
        Ok(keys)
    }

    /// Build key tables from YAML text
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let keys: SchemaKeys = serde_yaml::from_str(text)?;
        keys.validate()?;
        Ok(keys)
    }

    /// Check the tables for empty paths, duplicate keys and misplaced fields
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for entry in &self.one_to_one {
            if entry.tosca.is_empty() || entry.sol6.is_empty() {
                return Err(Error::Config(format!(
                    "one-to-one entry '{}' has an empty path",
                    entry.key
                )));
            }
            if !seen.insert(entry.key.as_str()) {
                return Err(Error::Config(format!(
                    "duplicate one-to-one key '{}'",
                    entry.key
                )));
            }
        }

        if let Some(literal) = self.literals.iter().find(|l| l.path.is_empty()) {
            return Err(Error::Config(format!(
                "literal '{}' has an empty path",
                literal.value
            )));
        }

        self.sol6.validate()
    }

    /// Check whether a substitution-mapping requirement names a connection point
    pub fn is_sub_link_type(&self, name: &str) -> bool {
        self.sub_link_types.iter().any(|t| t == name)
    }
}

//! # vnfd-convert
//!
//! Conversion of ETSI NFV descriptors between TOSCA (SOL001) VNF templates
//! and SOL006 VNFDs, built on a small path-addressed tree engine.
//!
//! ## Features
//!
//! - Dotted-path reads and writes over YAML/JSON trees, with structure
//!   fabrication on write
//! - Subtree discovery by key (every node template of a given `type`)
//! - Declarative field mapping tables with per-rule flags
//! - TOSCA to SOL006 conversion of compute flavors, storage, VDU profiles,
//!   instantiation levels, scaling aspects, affinity groups, virtual links
//!   and connection points
//! - Best-effort SOL006 to TOSCA conversion
//! - Overridable schema key tables (YAML or JSON)
//!
//! ## Example
//!
//! ```rust
//! use vnfd_convert::converters::{Converter, ConverterConfig, Sol6Converter};
//! use vnfd_convert::documents::from_yaml_str;
//! use vnfd_convert::keys::SchemaKeys;
//!
//! let tosca = from_yaml_str(r#"
//! topology_template:
//!   node_templates:
//!     vnf:
//!       type: tosca.nodes.nfv.VNF
//!       properties: {descriptor_id: vnf-1, provider: acme}
//!     mgmt: {type: tosca.nodes.nfv.VnfVirtualLink}
//!     orch: {type: tosca.nodes.nfv.VnfVirtualLink}
//! "#).unwrap();
//!
//! let keys = SchemaKeys::default();
//! let skeleton = keys.sol6.skeleton().unwrap();
//! let sol6 = Sol6Converter::new(&tosca, skeleton, &keys, ConverterConfig::new())
//!     .convert()
//!     .unwrap();
//! assert_eq!(sol6.get("vnfd").and_then(|v| v.get("provider")).and_then(|v| v.as_str()), Some("acme"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Documents and loading
pub mod documents;
pub mod locations;
pub mod loaders;

// Path engine
pub mod paths;
pub mod mapping;

// Conversion
pub mod keys;
pub mod converters;

// Re-exports for convenience
pub use error::{Error, Result};

/// Version of the vnfd-convert library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

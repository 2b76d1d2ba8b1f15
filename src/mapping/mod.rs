//! Declarative field mapping
//!
//! Bulk 1:1 and 1:many projections built on the path engine:
//!
//! - [`flags`]: per-rule switches (blank-if-missing, force-literal, ...)
//! - [`elem`]: [`MapElem`], the discovered instances a rule fans out over
//! - [`mapper`]: the [`FieldMapper`] rule table and its runner
//!
//! ## Example
//!
//! ```rust
//! use vnfd_convert::documents::{from_yaml_str, Tree};
//! use vnfd_convert::mapping::{elems_from_list, FieldMapper, Flag};
//!
//! let source = from_yaml_str("vdus: [{id: c1, min: 0}, {id: c2, min: 2}]").unwrap();
//! let mut mapper = FieldMapper::new();
//! mapper.add_literal("tosca_definitions_version", "tosca_simple_yaml_1_2");
//! mapper.add_expand("nodes.{}.min", &[], "vdus.min", elems_from_list(&["c1", "c2"]));
//!
//! let mut target = Tree::empty_map();
//! let report = mapper.run(&source, &mut target).unwrap();
//! assert_eq!(report.written, 3);
//! ```

pub mod elem;
pub mod flags;
pub mod mapper;

pub use elem::{elems_from_list, elems_with_parent, MapElem};
pub use flags::{Flag, FlagSet};
pub use mapper::{FieldMapper, MapEntry, MapReport, Source};

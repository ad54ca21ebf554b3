//! Code generation for resource controllers.
//!
//! This crate contains the field model of a resource (a typed tree of its
//! Spec and Status fields, addressable by canonical [`FieldPath`]s), the user
//! configuration which attaches overrides to that model and selects a
//! [`FlavorConfig`], and the generators which walk the model to emit source
//! code fragments.
//!
//! ## Usage
//!
//! ```
//! use controller_codegen::{Crd, codegen::compare_resource, config::GeneratorConfig};
//! use controller_codegen::model::ResourceDefinition;
//!
//! let definition = ResourceDefinition::from_yaml_str(
//!     "
//! name: Bucket
//! spec:
//!   - name: ACL
//!     type: string
//!   - name: Name
//!     type: string
//! ",
//! )
//! .expect("definition must parse");
//!
//! let config = GeneratorConfig::from_yaml_str(
//!     "
//! resources:
//!   Bucket:
//!     ignore: [ACL]
//! ",
//! )
//! .expect("config must parse");
//!
//! let crd = Crd::from_config(&definition, &config).expect("resource model must build");
//! let fragment = compare_resource(crd.config(), &crd, "delta", "a.ko", "b.ko", 1)
//!     .expect("fragment must generate");
//!
//! assert!(fragment.contains("a.ko.Spec.Name"));
//! assert!(!fragment.contains("ACL"));
//! ```
//!
//! [`FieldPath`]: field_path::FieldPath
//! [`FlavorConfig`]: config::FlavorConfig

pub mod codegen;
pub mod config;
pub mod model;

mod crd;

pub use crd::*;

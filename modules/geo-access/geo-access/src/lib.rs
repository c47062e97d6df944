//! Geo Access Module
//!
//! Decides whether a principal's role permits an action on a resource, and
//! compiles the geographic row restriction the data layer must apply.
//!
//! ## Configuration
//!
//! ```yaml
//! predicate_mode: join
//! permissions:
//!   manager: ["fosas.create", "fosas.read", "fosas.update", "batiments.manage"]
//!   user: ["*.read"]
//! resources:
//!   fosas: leaf
//!   regions: region
//!   users: ~
//! ```
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod domain;
pub mod module;

pub use config::{GeoAccessConfig, PredicateMode};
pub use domain::{
    FilterCompiler, GeoHierarchy, GeoRow, HierarchyStore, PermissionRule, PermissionSet,
    PredicateEvaluator, ResourceCatalog, ScopeResolver, Service, StaticHierarchyProvider,
};
pub use module::GeoAccessModule;

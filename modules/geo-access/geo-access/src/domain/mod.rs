//! Domain layer for the geo access module.

pub mod catalog;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod hierarchy;
pub mod local_client;
pub mod permissions;
pub mod resolver;
pub mod service;
pub mod static_provider;

pub use catalog::ResourceCatalog;
pub use compiler::FilterCompiler;
pub use error::DomainError;
pub use evaluator::{GeoRow, PredicateEvaluator};
pub use hierarchy::{GeoHierarchy, HierarchyStore, NotFound};
pub use local_client::GeoAccessLocalClient;
pub use permissions::{ActionSelector, PermissionRule, PermissionSet, ResourceSelector};
pub use resolver::ScopeResolver;
pub use service::Service;
pub use static_provider::StaticHierarchyProvider;

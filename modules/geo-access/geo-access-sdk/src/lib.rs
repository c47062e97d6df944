#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Geo Access SDK
//!
//! This crate provides the public API for the `geo_access` module:
//!
//! - [`GeoAccessClient`] - Decision API for consumers (controllers, data access layer)
//! - [`HierarchyProvider`] - Contract the data layer implements to supply hierarchy snapshots
//! - [`Action`], [`ResourceKind`], [`Decision`], [`Access`] - Decision models
//! - [`HierarchySnapshot`] - Plain geographic containment data
//! - [`GeoAccessError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use geo_access_sdk::{Access, Action, GeoAccessClient, ResourceKind};
//!
//! match client.enforce(&principal, "fosas", Action::Update, ResourceKind::Leaf)? {
//!     Access::Granted { predicate } => repo.update_where(&predicate, changes),
//!     Access::Denied { reason } => return Err(forbidden(reason)),
//! }
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod provider_api;

pub use api::GeoAccessClient;
pub use error::GeoAccessError;
pub use models::{
    Access, Action, Arrondissement, Decision, DenyCode, DenyReason, Department, GeoTarget,
    HierarchySnapshot, Region, ResourceKind, UnknownAction,
};
pub use provider_api::HierarchyProvider;

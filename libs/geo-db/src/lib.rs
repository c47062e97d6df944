#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `SeaORM` translation of geographic scope predicates.
//!
//! Entities opt in by implementing [`GeoScopableEntity`]; queries are then
//! restricted with [`build_geo_condition`] or the [`GeoScopedQuery`] extension.
//!
//! ```ignore
//! let predicate = client.scope_filter(&principal, ResourceKind::Leaf)?;
//! let fosas = fosa::Entity::find()
//!     .geo_scoped(&predicate, &GeoTables::default())
//!     .all(&db)
//!     .await?;
//! ```

pub mod cond;
pub mod entity_traits;
pub mod tables;

pub use cond::{GeoScopedQuery, build_geo_condition};
pub use entity_traits::GeoScopableEntity;
pub use tables::GeoTables;

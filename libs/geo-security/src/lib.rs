#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
pub mod ids;
pub mod predicate;
pub mod principal;
pub mod scope;

pub use ids::{ArrondissementId, DepartmentId, RegionId};
pub use predicate::{GeoField, GeoJoin, Predicate};
pub use principal::{Principal, PrincipalError, RawPrincipal, Role, Scope, ScopeType};
pub use scope::{GeoLevel, ScopeFilter};

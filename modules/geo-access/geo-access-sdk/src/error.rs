//! Error types for the geo access module.

use geo_security::{GeoLevel, PrincipalError};
use thiserror::Error;

/// Errors that can occur when using the geo access API.
///
/// Access denial is expressed via [`crate::Decision::Deny`], not as an error variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoAccessError {
    /// The principal handed over by the authentication layer is malformed.
    #[error("invalid principal: {0}")]
    InvalidPrincipal(String),

    /// The principal's scope references an id absent from the hierarchy snapshot.
    ///
    /// Read paths should treat this as "matches nothing"; write paths as a hard failure.
    #[error("unresolvable scope: {level} {id} is not in the hierarchy snapshot")]
    UnresolvableScope { level: GeoLevel, id: i64 },

    /// The resource name is not in the resource catalog.
    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    /// The engine has not been initialized yet.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GeoAccessError {
    #[must_use]
    pub const fn is_unresolvable_scope(&self) -> bool {
        matches!(self, Self::UnresolvableScope { .. })
    }
}

impl From<PrincipalError> for GeoAccessError {
    fn from(e: PrincipalError) -> Self {
        Self::InvalidPrincipal(e.to_string())
    }
}

//! Domain errors for the geo access engine.

use geo_access_sdk::GeoAccessError;
use geo_security::GeoLevel;

/// Internal domain errors.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("{level} {id} is not in the hierarchy snapshot")]
    UnresolvableScope { level: GeoLevel, id: i64 },

    #[error("unknown resource '{0}'")]
    UnknownResource(String),

    #[error("invalid permission pattern '{pattern}' for role '{role}': {reason}")]
    InvalidPermissionPattern {
        role: String,
        pattern: String,
        reason: String,
    },

    #[error("invalid hierarchy snapshot: {0}")]
    InvalidHierarchy(String),

    #[error("hierarchy provider failed: {0}")]
    ProviderFailed(String),

    #[error("geo access is not initialized: no hierarchy snapshot installed")]
    NotInitialized,
}

impl From<DomainError> for GeoAccessError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::UnresolvableScope { level, id } => Self::UnresolvableScope { level, id },
            DomainError::UnknownResource(name) => Self::UnknownResource(name),
            DomainError::NotInitialized => {
                Self::Unavailable("no hierarchy snapshot installed".to_owned())
            }
            DomainError::ProviderFailed(reason) => Self::Unavailable(reason),
            other @ (DomainError::InvalidPermissionPattern { .. }
            | DomainError::InvalidHierarchy(_)) => Self::Internal(other.to_string()),
        }
    }
}

//! Local (in-process) client for the geo access engine.

use std::sync::Arc;

use geo_access_sdk::{
    Access, Action, Decision, GeoAccessClient, GeoAccessError, GeoTarget, ResourceKind,
};
use geo_security::{Predicate, Principal};

use super::{DomainError, Service};

/// Local client wrapping the service.
pub struct GeoAccessLocalClient {
    svc: Arc<Service>,
}

impl GeoAccessLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> GeoAccessError {
    match &e {
        DomainError::UnresolvableScope { .. } | DomainError::UnknownResource(_) => {
            tracing::debug!(operation = op, error = %e, "geo_access call rejected");
        }
        _ => tracing::error!(operation = op, error = ?e, "geo_access call failed"),
    }
    e.into()
}

impl GeoAccessClient for GeoAccessLocalClient {
    fn authorize(&self, principal: &Principal, resource: &str, action: Action) -> Decision {
        self.svc.authorize(principal, resource, action)
    }

    fn scope_filter(
        &self,
        principal: &Principal,
        kind: ResourceKind,
    ) -> Result<Predicate, GeoAccessError> {
        self.svc
            .scope_filter(principal, kind)
            .map_err(|e| log_and_convert("scope_filter", e))
    }

    fn scope_filter_for(
        &self,
        principal: &Principal,
        resource: &str,
    ) -> Result<Option<Predicate>, GeoAccessError> {
        self.svc
            .scope_filter_for(principal, resource)
            .map_err(|e| log_and_convert("scope_filter_for", e))
    }

    fn enforce(
        &self,
        principal: &Principal,
        resource: &str,
        action: Action,
        kind: ResourceKind,
    ) -> Result<Access, GeoAccessError> {
        self.svc
            .enforce(principal, resource, action, kind)
            .map_err(|e| log_and_convert("enforce", e))
    }

    fn check_target(
        &self,
        principal: &Principal,
        target: GeoTarget,
    ) -> Result<bool, GeoAccessError> {
        self.svc
            .check_target(principal, target)
            .map_err(|e| log_and_convert("check_target", e))
    }
}

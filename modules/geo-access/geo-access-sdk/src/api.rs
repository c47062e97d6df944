//! Public API trait for the geo access engine.

use geo_security::{Predicate, Principal, RawPrincipal};

use crate::error::GeoAccessError;
use crate::models::{Access, Action, Decision, GeoTarget, ResourceKind};

/// Public API of the access-control engine.
///
/// Every call is a pure function of its inputs, the permission table and
/// the hierarchy snapshot current at call time. Implementations must be
/// safe to call concurrently from any number of request handlers.
///
/// ```ignore
/// let decision = client.authorize(&principal, "fosas", Action::Update);
/// if decision.is_allowed() {
///     let predicate = client.scope_filter(&principal, ResourceKind::Leaf)?;
///     repo.list_where(&predicate)
/// }
/// ```
pub trait GeoAccessClient: Send + Sync {
    /// Decide whether `action` on `resource` is permitted for the principal's role.
    ///
    /// Never touches geography.
    fn authorize(&self, principal: &Principal, resource: &str, action: Action) -> Decision;

    /// Compile the row restriction for records of `kind` visible to the principal.
    ///
    /// Only meaningful after [`GeoAccessClient::authorize`] returned `Allow`.
    ///
    /// # Errors
    ///
    /// - `UnresolvableScope` if the principal's scope id is not in the snapshot
    /// - `Unavailable` if no snapshot has been installed yet
    fn scope_filter(
        &self,
        principal: &Principal,
        kind: ResourceKind,
    ) -> Result<Predicate, GeoAccessError>;

    /// Compile the row restriction for a named resource, using the resource catalog.
    ///
    /// Returns `None` for permission-only resources that carry no geography.
    ///
    /// # Errors
    ///
    /// - `UnknownResource` if the name is not in the catalog
    /// - any error of [`GeoAccessClient::scope_filter`]
    fn scope_filter_for(
        &self,
        principal: &Principal,
        resource: &str,
    ) -> Result<Option<Predicate>, GeoAccessError>;

    /// Authorize, then compile the scope filter only if allowed.
    ///
    /// # Errors
    ///
    /// Same as [`GeoAccessClient::scope_filter`]; a denial is returned as `Access::Denied`.
    fn enforce(
        &self,
        principal: &Principal,
        resource: &str,
        action: Action,
        kind: ResourceKind,
    ) -> Result<Access, GeoAccessError>;

    /// Check that a concrete write target lies inside the principal's scope.
    ///
    /// # Errors
    ///
    /// - `UnresolvableScope` if the principal's scope id or the target id is not in the snapshot
    /// - `Unavailable` if no snapshot has been installed yet
    fn check_target(&self, principal: &Principal, target: GeoTarget)
    -> Result<bool, GeoAccessError>;

    /// Validate a raw principal, then authorize.
    ///
    /// # Errors
    ///
    /// - `InvalidPrincipal` if the principal is malformed
    fn authorize_raw(
        &self,
        raw: &RawPrincipal,
        resource: &str,
        action: Action,
    ) -> Result<Decision, GeoAccessError> {
        let principal = raw.validate()?;
        Ok(self.authorize(&principal, resource, action))
    }

    /// Validate a raw principal, then enforce.
    ///
    /// # Errors
    ///
    /// - `InvalidPrincipal` if the principal is malformed
    /// - any error of [`GeoAccessClient::enforce`]
    fn enforce_raw(
        &self,
        raw: &RawPrincipal,
        resource: &str,
        action: Action,
        kind: ResourceKind,
    ) -> Result<Access, GeoAccessError> {
        let principal = raw.validate()?;
        self.enforce(&principal, resource, action, kind)
    }
}

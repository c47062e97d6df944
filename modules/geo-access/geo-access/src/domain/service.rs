//! Access decision service: permission check first, geography second.

use std::sync::Arc;

use geo_access_sdk::{Access, Action, Decision, DenyReason, GeoTarget, ResourceKind};
use geo_security::{Predicate, Principal, ScopeFilter};
use tracing::{debug, warn};

use super::catalog::ResourceCatalog;
use super::compiler::FilterCompiler;
use super::error::DomainError;
use super::hierarchy::{GeoHierarchy, HierarchyStore, NotFound};
use super::permissions::PermissionSet;
use super::resolver::ScopeResolver;
use crate::config::{GeoAccessConfig, PredicateMode};

/// Geo access service.
///
/// Holds the immutable permission table and a handle on the hierarchy store.
/// Each call loads the current snapshot once and evaluates against it.
pub struct Service {
    permissions: PermissionSet,
    catalog: ResourceCatalog,
    hierarchy: Arc<HierarchyStore>,
    mode: PredicateMode,
}

impl Service {
    #[must_use]
    pub fn new(
        permissions: PermissionSet,
        catalog: ResourceCatalog,
        hierarchy: Arc<HierarchyStore>,
        mode: PredicateMode,
    ) -> Self {
        Self {
            permissions,
            catalog,
            hierarchy,
            mode,
        }
    }

    /// Build the permission table and catalog from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidPermissionPattern`] if the permission table does not validate.
    pub fn from_config(
        cfg: &GeoAccessConfig,
        hierarchy: Arc<HierarchyStore>,
    ) -> Result<Self, DomainError> {
        let catalog = ResourceCatalog::from_config(&cfg.resources);
        let permissions = PermissionSet::from_table(&cfg.permissions, &catalog)?;
        Ok(Self::new(
            permissions,
            catalog,
            hierarchy,
            cfg.predicate_mode,
        ))
    }

    #[must_use]
    pub fn hierarchy(&self) -> &Arc<HierarchyStore> {
        &self.hierarchy
    }

    #[must_use]
    pub const fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Role check only; never consults geography.
    #[must_use]
    #[tracing::instrument(skip_all, fields(role = %principal.role(), resource = %resource, action = %action))]
    pub fn authorize(&self, principal: &Principal, resource: &str, action: Action) -> Decision {
        if self.permissions.allows(principal.role(), resource, action) {
            debug!("Permission granted");
            Decision::Allow
        } else {
            debug!("Permission denied");
            Decision::Deny(DenyReason::role_lacks_permission(format!(
                "{resource}.{action}"
            )))
        }
    }

    /// Row restriction for records of `kind` visible to `principal`.
    ///
    /// # Errors
    ///
    /// - [`DomainError::UnresolvableScope`] if the scope root is not in the snapshot
    /// - [`DomainError::NotInitialized`] if no snapshot is installed
    #[tracing::instrument(skip_all, fields(role = %principal.role(), kind = ?kind))]
    pub fn scope_filter(
        &self,
        principal: &Principal,
        kind: ResourceKind,
    ) -> Result<Predicate, DomainError> {
        let filter = ScopeResolver::resolve(principal);
        if filter.is_unrestricted() {
            return Ok(Predicate::Unrestricted);
        }

        let hierarchy = self.hierarchy.snapshot()?;
        let compiler = FilterCompiler::new(&hierarchy);
        let predicate = compiler
            .compile(filter, kind)
            .map_err(|e| unresolvable(filter, e))?;

        let predicate = match self.mode {
            PredicateMode::Join => predicate,
            PredicateMode::Expanded => compiler.expand(predicate),
        };
        debug!(%predicate, "Compiled scope filter");
        Ok(predicate)
    }

    /// Row restriction for a catalogued resource; `None` for permission-only resources.
    ///
    /// # Errors
    ///
    /// - [`DomainError::UnknownResource`] if `resource` is not catalogued
    /// - any error of [`Service::scope_filter`]
    pub fn scope_filter_for(
        &self,
        principal: &Principal,
        resource: &str,
    ) -> Result<Option<Predicate>, DomainError> {
        self.catalog
            .kind_of(resource)?
            .map(|kind| self.scope_filter(principal, kind))
            .transpose()
    }

    /// Authorize, then compile the scope filter only if allowed.
    ///
    /// # Errors
    ///
    /// Any error of [`Service::scope_filter`]. A denial is `Ok(Access::Denied)`.
    pub fn enforce(
        &self,
        principal: &Principal,
        resource: &str,
        action: Action,
        kind: ResourceKind,
    ) -> Result<Access, DomainError> {
        match self.authorize(principal, resource, action) {
            Decision::Deny(reason) => Ok(Access::Denied { reason }),
            Decision::Allow => Ok(Access::Granted {
                predicate: self.scope_filter(principal, kind)?,
            }),
        }
    }

    /// Does `target` lie inside the principal's scope?
    ///
    /// Write-path check: only the scope root and the nodes below it pass.
    /// This is stricter than [`Service::scope_filter`], which also lets a
    /// scoped principal read the ancestor nodes of its root (a department
    /// scope sees its own region row but may not write to it).
    ///
    /// Both the scope root and the target must exist in the snapshot, even
    /// for unrestricted principals.
    ///
    /// # Errors
    ///
    /// - [`DomainError::UnresolvableScope`] if the scope root or the target is not in the snapshot
    /// - [`DomainError::NotInitialized`] if no snapshot is installed
    #[tracing::instrument(skip_all, fields(role = %principal.role(), target = ?target))]
    pub fn check_target(
        &self,
        principal: &Principal,
        target: GeoTarget,
    ) -> Result<bool, DomainError> {
        let hierarchy = self.hierarchy.snapshot()?;
        let filter = ScopeResolver::resolve(principal);
        ensure_root_exists(&hierarchy, filter).map_err(|e| unresolvable(filter, e))?;
        let ancestry = hierarchy.ancestry(target)?;

        let inside = match filter {
            ScopeFilter::Unrestricted => true,
            ScopeFilter::Region(r) => ancestry.region == r,
            ScopeFilter::Department(d) => ancestry.department == Some(d),
            ScopeFilter::Arrondissement(a) => ancestry.arrondissement == Some(a),
        };
        debug!(inside, "Checked write target");
        Ok(inside)
    }
}

fn ensure_root_exists(hierarchy: &GeoHierarchy, filter: ScopeFilter) -> Result<(), NotFound> {
    match filter.root() {
        Some((level, id)) if !hierarchy.contains(level, id) => Err(NotFound { level, id }),
        _ => Ok(()),
    }
}

fn unresolvable(filter: ScopeFilter, e: NotFound) -> DomainError {
    warn!(
        scope = ?filter,
        level = %e.level,
        id = e.id,
        "Principal scope is not in the hierarchy snapshot"
    );
    e.into()
}

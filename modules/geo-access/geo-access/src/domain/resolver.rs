//! Principal to scope root resolution.

use geo_security::{Principal, Role, Scope, ScopeFilter};

/// Maps a validated principal to the geographic root it may see.
///
/// Pure: does not consult the hierarchy. Existence of the root id is checked
/// later, when the filter is compiled against a snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopeResolver;

impl ScopeResolver {
    #[must_use]
    pub const fn resolve(principal: &Principal) -> ScopeFilter {
        if matches!(principal.role(), Role::SuperAdmin) {
            return ScopeFilter::Unrestricted;
        }
        match principal.scope() {
            Scope::National => ScopeFilter::Unrestricted,
            Scope::Regional(r) => ScopeFilter::Region(r),
            Scope::Departmental(d) => ScopeFilter::Department(d),
            Scope::Arrondissement(a) => ScopeFilter::Arrondissement(a),
        }
    }
}

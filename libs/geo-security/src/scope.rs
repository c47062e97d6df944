use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ids::{ArrondissementId, DepartmentId, RegionId};

/// One of the three concrete geographic levels below the nation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoLevel {
    Region,
    Department,
    Arrondissement,
}

impl GeoLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Department => "department",
            Self::Arrondissement => "arrondissement",
        }
    }
}

impl fmt::Display for GeoLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolved scope of a principal, before it is compiled against a resource kind.
///
/// The same scope compiles differently depending on whether the target
/// resource *is* a geographic node or *attaches to* one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ScopeFilter {
    /// No geographic restriction (national scope or `super_admin`).
    Unrestricted,
    Region(RegionId),
    Department(DepartmentId),
    Arrondissement(ArrondissementId),
}

impl ScopeFilter {
    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// Level and raw id of the scope root, `None` when unrestricted.
    #[must_use]
    pub const fn root(&self) -> Option<(GeoLevel, i64)> {
        match self {
            Self::Unrestricted => None,
            Self::Region(r) => Some((GeoLevel::Region, r.get())),
            Self::Department(d) => Some((GeoLevel::Department, d.get())),
            Self::Arrondissement(a) => Some((GeoLevel::Arrondissement, a.get())),
        }
    }
}

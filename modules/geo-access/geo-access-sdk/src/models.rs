//! Domain models for the geo access module.

use std::fmt;
use std::str::FromStr;

use geo_security::{ArrondissementId, DepartmentId, Predicate, RegionId};
use serde::{Deserialize, Serialize};

/// Action named in a permission pattern.
///
/// `Manage` implies the four CRUD actions for the same resource.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    Manage,
}

impl Action {
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::Read,
        Self::Update,
        Self::Delete,
        Self::Manage,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Manage => "manage",
        }
    }

    /// `true` for create/read/update/delete, the actions `manage` implies.
    #[must_use]
    pub const fn is_crud(self) -> bool {
        !matches!(self, Self::Manage)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised action name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action '{0}'")]
pub struct UnknownAction(pub String);

impl FromStr for Action {
    type Err = UnknownAction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| UnknownAction(s.to_owned()))
    }
}

/// How a resource type relates to the geographic hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// The region table itself.
    Region,
    /// The department table itself.
    Department,
    /// The arrondissement table itself.
    Arrondissement,
    /// Anything attached to an arrondissement (facility and its sub-resources).
    Leaf,
}

impl ResourceKind {
    pub const ALL: [Self; 4] = [
        Self::Region,
        Self::Department,
        Self::Arrondissement,
        Self::Leaf,
    ];
}

/// Machine-readable denial code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenyCode {
    RoleLacksPermission,
}

impl DenyCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoleLacksPermission => "role_lacks_permission",
        }
    }
}

impl fmt::Display for DenyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reason attached to a [`Decision::Deny`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DenyReason {
    /// Machine-readable error code.
    pub code: DenyCode,
    /// Human-readable details (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl DenyReason {
    #[must_use]
    pub fn role_lacks_permission(details: impl Into<String>) -> Self {
        Self {
            code: DenyCode::RoleLacksPermission,
            details: Some(details.into()),
        }
    }
}

/// Outcome of a permission check. Denial is a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "reason", rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }

    #[must_use]
    pub const fn deny_reason(&self) -> Option<&DenyReason> {
        match self {
            Self::Allow => None,
            Self::Deny(reason) => Some(reason),
        }
    }
}

/// Outcome of the combined authorize-then-filter pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum Access {
    /// Allowed; the data layer must apply the predicate.
    Granted { predicate: Predicate },
    /// Denied before any geographic evaluation took place.
    Denied { reason: DenyReason },
}

impl Access {
    #[must_use]
    pub const fn predicate(&self) -> Option<&Predicate> {
        match self {
            Self::Granted { predicate } => Some(predicate),
            Self::Denied { .. } => None,
        }
    }
}

/// A concrete node a write operation targets.
///
/// Leaf resources are targeted through the arrondissement they attach to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level", content = "id", rename_all = "snake_case")]
pub enum GeoTarget {
    Region(RegionId),
    Department(DepartmentId),
    Arrondissement(ArrondissementId),
}

/// Region node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub name: String,
}

/// Department node, owned by exactly one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub region_id: RegionId,
}

/// Arrondissement node, owned by exactly one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrondissement {
    pub id: ArrondissementId,
    pub name: String,
    pub department_id: DepartmentId,
}

/// Plain containment data as supplied by the data layer.
///
/// No invariants are assumed here; the engine validates the strict-tree
/// shape when it indexes the snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HierarchySnapshot {
    pub regions: Vec<Region>,
    pub departments: Vec<Department>,
    pub arrondissements: Vec<Arrondissement>,
}

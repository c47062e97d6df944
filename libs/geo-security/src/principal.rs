use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ids::{ArrondissementId, DepartmentId, RegionId};

/// Role assigned to an authenticated actor.
///
/// Immutable for the duration of a request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Manager,
    User,
}

impl Role {
    pub const ALL: [Self; 4] = [Self::SuperAdmin, Self::Admin, Self::Manager, Self::User];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = PrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| PrincipalError::UnknownRole(s.to_owned()))
    }
}

/// Geographic breadth of a principal's scope.
///
/// Ordered from broadest to narrowest: `National < Regional < Departmental < Arrondissement`
/// in derive order, so `a < b` reads "a is broader than b".
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScopeType {
    National,
    Regional,
    Departmental,
    Arrondissement,
}

impl ScopeType {
    pub const ALL: [Self; 4] = [
        Self::National,
        Self::Regional,
        Self::Departmental,
        Self::Arrondissement,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::National => "national",
            Self::Regional => "regional",
            Self::Departmental => "departmental",
            Self::Arrondissement => "arrondissement",
        }
    }

    /// `true` if `self` covers strictly more territory than `other`.
    #[must_use]
    pub fn is_broader_than(self, other: Self) -> bool {
        self < other
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScopeType {
    type Err = PrincipalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| PrincipalError::UnknownScopeType(s.to_owned()))
    }
}

/// A validated geographic scope: the scope type together with its single id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope_type", content = "id", rename_all = "snake_case")]
pub enum Scope {
    National,
    Regional(RegionId),
    Departmental(DepartmentId),
    Arrondissement(ArrondissementId),
}

impl Scope {
    #[must_use]
    pub const fn scope_type(self) -> ScopeType {
        match self {
            Self::National => ScopeType::National,
            Self::Regional(_) => ScopeType::Regional,
            Self::Departmental(_) => ScopeType::Departmental,
            Self::Arrondissement(_) => ScopeType::Arrondissement,
        }
    }
}

/// Errors raised while validating a principal handed over by the authentication layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrincipalError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("unknown scope type '{0}'")]
    UnknownScopeType(String),

    #[error("scope type '{scope_type}' requires '{field}' to be set")]
    MissingScopeId {
        scope_type: ScopeType,
        field: &'static str,
    },

    #[error("scope type '{scope_type}' does not allow '{field}' to be set")]
    UnexpectedScopeId {
        scope_type: ScopeType,
        field: &'static str,
    },
}

/// An authenticated actor as seen by the access-control engine.
///
/// The scope-id cardinality invariant holds by construction: the [`Scope`]
/// variant carries exactly the id that matches its type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    role: Role,
    scope: Scope,
}

impl Principal {
    #[must_use]
    pub const fn new(role: Role, scope: Scope) -> Self {
        Self { role, scope }
    }

    #[must_use]
    pub const fn national(role: Role) -> Self {
        Self::new(role, Scope::National)
    }

    #[must_use]
    pub const fn regional(role: Role, region: RegionId) -> Self {
        Self::new(role, Scope::Regional(region))
    }

    #[must_use]
    pub const fn departmental(role: Role, department: DepartmentId) -> Self {
        Self::new(role, Scope::Departmental(department))
    }

    #[must_use]
    pub const fn arrondissement(role: Role, arrondissement: ArrondissementId) -> Self {
        Self::new(role, Scope::Arrondissement(arrondissement))
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    #[must_use]
    pub const fn scope(&self) -> Scope {
        self.scope
    }

    #[must_use]
    pub const fn scope_type(&self) -> ScopeType {
        self.scope.scope_type()
    }
}

/// Principal exactly as supplied by the authentication layer, before validation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPrincipal {
    pub role: String,
    pub scope_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrondissement_id: Option<i64>,
}

impl RawPrincipal {
    /// Build a raw principal from the `(role, scopeType, scopeId)` triple.
    ///
    /// The id lands in the field matching `scope_type`; an unrecognised scope
    /// type keeps the id out of every field so validation reports the type.
    #[must_use]
    pub fn with_scope_id(role: &str, scope_type: &str, scope_id: Option<i64>) -> Self {
        let mut raw = Self {
            role: role.to_owned(),
            scope_type: scope_type.to_owned(),
            ..Self::default()
        };
        match scope_type.parse::<ScopeType>() {
            // A national principal carrying an id must still be rejected, so it lands somewhere.
            Ok(ScopeType::Regional | ScopeType::National) => raw.region_id = scope_id,
            Ok(ScopeType::Departmental) => raw.department_id = scope_id,
            Ok(ScopeType::Arrondissement) => raw.arrondissement_id = scope_id,
            Err(_) => {}
        }
        raw
    }

    /// Validate into a [`Principal`].
    ///
    /// # Errors
    ///
    /// - [`PrincipalError::UnknownRole`] / [`PrincipalError::UnknownScopeType`] for unrecognised names
    /// - [`PrincipalError::MissingScopeId`] if the id matching the scope type is absent
    /// - [`PrincipalError::UnexpectedScopeId`] if any other id field is populated
    pub fn validate(&self) -> Result<Principal, PrincipalError> {
        let role: Role = self.role.parse()?;
        let scope_type: ScopeType = self.scope_type.parse()?;

        let fields = [
            ("regionId", self.region_id, ScopeType::Regional),
            ("departmentId", self.department_id, ScopeType::Departmental),
            (
                "arrondissementId",
                self.arrondissement_id,
                ScopeType::Arrondissement,
            ),
        ];
        for (field, value, owner) in fields {
            if owner == scope_type {
                if value.is_none() {
                    return Err(PrincipalError::MissingScopeId { scope_type, field });
                }
            } else if value.is_some() {
                return Err(PrincipalError::UnexpectedScopeId { scope_type, field });
            }
        }

        let scope = match (scope_type, self.region_id, self.department_id, self.arrondissement_id) {
            (ScopeType::Regional, Some(r), _, _) => Scope::Regional(RegionId::new(r)),
            (ScopeType::Departmental, _, Some(d), _) => Scope::Departmental(DepartmentId::new(d)),
            (ScopeType::Arrondissement, _, _, Some(a)) => {
                Scope::Arrondissement(ArrondissementId::new(a))
            }
            _ => Scope::National,
        };
        Ok(Principal::new(role, scope))
    }
}

impl TryFrom<&RawPrincipal> for Principal {
    type Error = PrincipalError;

    fn try_from(raw: &RawPrincipal) -> Result<Self, Self::Error> {
        raw.validate()
    }
}

//! Backend-agnostic row restriction emitted by the filter compiler.
//!
//! A [`Predicate`] names *what* a row must satisfy in terms of geographic
//! fields. Turning it into SQL (or anything else) is the job of the storage
//! backend's own translator.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scope::GeoLevel;

/// A geographic field of the target entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoField {
    /// The entity's own identity (for geographic node tables).
    Id,
    /// Parent region key (department table).
    RegionId,
    /// Parent department key (arrondissement table).
    DepartmentId,
    /// Attachment point of leaf resources.
    ArrondissementId,
}

impl GeoField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::RegionId => "region_id",
            Self::DepartmentId => "department_id",
            Self::ArrondissementId => "arrondissement_id",
        }
    }
}

impl fmt::Display for GeoField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ancestor lookup performed through the hierarchy rather than a stored column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeoJoin {
    /// Field references a department; compare that department's region.
    DepartmentToRegion,
    /// Field references an arrondissement; compare its department.
    ArrondissementToDepartment,
    /// Field references an arrondissement; compare its department's region.
    ArrondissementToRegion,
}

impl GeoJoin {
    /// Level the restricted field points at.
    #[must_use]
    pub const fn source(self) -> GeoLevel {
        match self {
            Self::DepartmentToRegion => GeoLevel::Department,
            Self::ArrondissementToDepartment | Self::ArrondissementToRegion => {
                GeoLevel::Arrondissement
            }
        }
    }

    /// Level of the ancestor compared against the predicate value.
    #[must_use]
    pub const fn target(self) -> GeoLevel {
        match self {
            Self::DepartmentToRegion | Self::ArrondissementToRegion => GeoLevel::Region,
            Self::ArrondissementToDepartment => GeoLevel::Department,
        }
    }
}

/// Abstract boolean restriction over a target entity's geographic fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    /// No restriction at all.
    Unrestricted,
    /// `field = value`
    Eq { field: GeoField, value: i64 },
    /// `field IN (values)`; an empty list matches nothing.
    In { field: GeoField, values: Vec<i64> },
    /// `ancestor(field) = value`, resolved through a join on the hierarchy tables.
    JoinThrough {
        field: GeoField,
        join: GeoJoin,
        value: i64,
    },
}

impl Predicate {
    #[must_use]
    pub fn eq(field: GeoField, value: impl Into<i64>) -> Self {
        Self::Eq {
            field,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn is_in<V: Into<i64>>(field: GeoField, values: impl IntoIterator<Item = V>) -> Self {
        Self::In {
            field,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn join_through(field: GeoField, join: GeoJoin, value: impl Into<i64>) -> Self {
        Self::JoinThrough {
            field,
            join,
            value: value.into(),
        }
    }

    #[must_use]
    pub const fn is_unrestricted(&self) -> bool {
        matches!(self, Self::Unrestricted)
    }

    /// `true` if the predicate can never match a row.
    #[must_use]
    pub fn is_deny_all(&self) -> bool {
        matches!(self, Self::In { values, .. } if values.is_empty())
    }

    /// The restricted field, `None` when unrestricted.
    #[must_use]
    pub const fn field(&self) -> Option<GeoField> {
        match self {
            Self::Unrestricted => None,
            Self::Eq { field, .. } | Self::In { field, .. } | Self::JoinThrough { field, .. } => {
                Some(*field)
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unrestricted => f.write_str("true"),
            Self::Eq { field, value } => write!(f, "{field} = {value}"),
            Self::In { field, values } => {
                write!(f, "{field} IN (")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str(")")
            }
            Self::JoinThrough { field, join, value } => {
                write!(f, "{}_of({field}) = {value}", join.target())
            }
        }
    }
}

//! In-memory evaluation of predicates against rows.
//!
//! Used by callers that already hold records in memory (and by the tests)
//! to apply the same restriction a database backend would.

use geo_security::{ArrondissementId, DepartmentId, GeoField, GeoJoin, Predicate};

use super::hierarchy::GeoHierarchy;

/// A record exposing its geographic fields.
pub trait GeoRow {
    /// Value of `field`, or `None` if the record has no such field.
    fn geo_field(&self, field: GeoField) -> Option<i64>;
}

/// Evaluates predicates against rows, resolving joins through a snapshot.
///
/// Fails closed: a missing field or an id unknown to the snapshot never matches.
#[derive(Debug, Clone, Copy)]
pub struct PredicateEvaluator<'a> {
    hierarchy: &'a GeoHierarchy,
}

impl<'a> PredicateEvaluator<'a> {
    #[must_use]
    pub const fn new(hierarchy: &'a GeoHierarchy) -> Self {
        Self { hierarchy }
    }

    #[must_use]
    pub fn matches(&self, predicate: &Predicate, row: &impl GeoRow) -> bool {
        match predicate {
            Predicate::Unrestricted => true,
            Predicate::Eq { field, value } => row.geo_field(*field) == Some(*value),
            Predicate::In { field, values } => row
                .geo_field(*field)
                .is_some_and(|v| values.contains(&v)),
            Predicate::JoinThrough { field, join, value } => row
                .geo_field(*field)
                .and_then(|v| self.ancestor(*join, v))
                .is_some_and(|ancestor| ancestor == *value),
        }
    }

    /// Keep the rows `predicate` matches.
    #[must_use]
    pub fn filter<'r, R: GeoRow>(
        &self,
        predicate: &Predicate,
        rows: impl IntoIterator<Item = &'r R>,
    ) -> Vec<&'r R>
    where
        R: 'r,
    {
        rows.into_iter()
            .filter(|row| self.matches(predicate, *row))
            .collect()
    }

    fn ancestor(&self, join: GeoJoin, id: i64) -> Option<i64> {
        let h = self.hierarchy;
        let ancestor = match join {
            GeoJoin::DepartmentToRegion => {
                h.region_of_department(DepartmentId::new(id)).ok()?.get()
            }
            GeoJoin::ArrondissementToDepartment => {
                h.department_of(ArrondissementId::new(id)).ok()?.get()
            }
            GeoJoin::ArrondissementToRegion => {
                h.region_of_arrondissement(ArrondissementId::new(id)).ok()?.get()
            }
        };
        Some(ancestor)
    }
}

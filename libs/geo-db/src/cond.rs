use geo_security::{GeoField, GeoJoin, Predicate};
use sea_orm::sea_query::{Expr, Query, SelectStatement, SimpleExpr};
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, Select};

use crate::entity_traits::GeoScopableEntity;
use crate::tables::GeoTables;

/// Build a deny-all condition (`WHERE false`).
fn deny_all() -> Condition {
    Condition::all().add(Expr::value(false))
}

/// Builds a `SeaORM` `Condition` from a geographic [`Predicate`].
///
/// | Predicate | SQL |
/// |-----------|-----|
/// | `Unrestricted` | no filtering |
/// | `Eq` | `col = v` |
/// | `In` | `col IN (..)`; empty list is `WHERE false` |
/// | `JoinThrough` | `col IN (SELECT id FROM <hierarchy tables> WHERE <ancestor> = v)` |
///
/// A field the entity cannot resolve fails closed (`WHERE false`).
pub fn build_geo_condition<E>(predicate: &Predicate, tables: &GeoTables) -> Condition
where
    E: GeoScopableEntity,
    E::Column: ColumnTrait + Copy,
{
    match predicate {
        Predicate::Unrestricted => Condition::all(),
        Predicate::In { values, .. } if values.is_empty() => deny_all(),
        Predicate::Eq { field, value } => with_column::<E>(*field, |col| col.eq(*value)),
        Predicate::In { field, values } => {
            with_column::<E>(*field, |col| col.is_in(values.iter().copied()))
        }
        Predicate::JoinThrough { field, join, value } => with_column::<E>(*field, |col| {
            col.in_subquery(ancestor_subquery(*join, *value, tables))
        }),
    }
}

/// Resolve `field` to a table-qualified column of `E` and build the condition on it.
fn with_column<E>(field: GeoField, build: impl FnOnce(Expr) -> SimpleExpr) -> Condition
where
    E: GeoScopableEntity,
    E::Column: ColumnTrait + Copy,
{
    match E::resolve_field(field) {
        Some(col) => Condition::all().add(build(Expr::col((E::default(), col)))),
        None => {
            let entity = E::default();
            tracing::warn!(
                table = entity.table_name(),
                %field,
                "Entity has no column for geographic field; denying all rows"
            );
            deny_all()
        }
    }
}

/// Ids of the hierarchy nodes whose ancestor (per `join`) is `value`.
fn ancestor_subquery(join: GeoJoin, value: i64, tables: &GeoTables) -> SelectStatement {
    let id = tables.id_column.as_str();
    match join {
        GeoJoin::DepartmentToRegion => Query::select()
            .column(tables.department_col(id))
            .from(tables.department_table())
            .and_where(Expr::col(tables.department_col(&tables.region_column)).eq(value))
            .take(),
        GeoJoin::ArrondissementToDepartment => Query::select()
            .column(tables.arrondissement_col(id))
            .from(tables.arrondissement_table())
            .and_where(Expr::col(tables.arrondissement_col(&tables.department_column)).eq(value))
            .take(),
        GeoJoin::ArrondissementToRegion => Query::select()
            .column(tables.arrondissement_col(id))
            .from(tables.arrondissement_table())
            .inner_join(
                tables.department_table(),
                Expr::col(tables.arrondissement_col(&tables.department_column))
                    .equals(tables.department_col(id)),
            )
            .and_where(Expr::col(tables.department_col(&tables.region_column)).eq(value))
            .take(),
    }
}

/// Restrict a `SeaORM` select by a geographic predicate.
///
/// `Unrestricted` leaves the query untouched.
pub trait GeoScopedQuery: Sized {
    #[must_use]
    fn geo_scoped(self, predicate: &Predicate, tables: &GeoTables) -> Self;
}

impl<E> GeoScopedQuery for Select<E>
where
    E: GeoScopableEntity,
    E::Column: ColumnTrait + Copy,
{
    fn geo_scoped(self, predicate: &Predicate, tables: &GeoTables) -> Self {
        if predicate.is_unrestricted() {
            return self;
        }
        self.filter(build_geo_condition::<E>(predicate, tables))
    }
}

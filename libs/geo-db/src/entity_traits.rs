use geo_security::GeoField;
use sea_orm::EntityTrait;

/// Maps geographic predicate fields to an entity's columns.
///
/// Every field the entity does not carry must return `None`; a predicate on
/// such a field then compiles to `WHERE false`.
///
/// ```rust,ignore
/// impl GeoScopableEntity for fosa::Entity {
///     fn resolve_field(field: GeoField) -> Option<Self::Column> {
///         match field {
///             GeoField::Id => Some(fosa::Column::Id),
///             GeoField::ArrondissementId => Some(fosa::Column::ArrondissementId),
///             GeoField::RegionId | GeoField::DepartmentId => None,
///         }
///     }
/// }
/// ```
pub trait GeoScopableEntity: EntityTrait {
    fn resolve_field(field: GeoField) -> Option<Self::Column>;
}

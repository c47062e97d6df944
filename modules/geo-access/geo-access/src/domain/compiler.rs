//! Scope filter compilation.
//!
//! A [`ScopeFilter`] is compiled against the kind of record being queried:
//! geographic node tables are matched on their own id or parent key, leaf
//! resources on their `arrondissement_id` attachment point. The table below
//! is the whole contract.
//!
//! | scope \ kind     | Region          | Department                  | Arrondissement                        | Leaf                                         |
//! |------------------|-----------------|-----------------------------|---------------------------------------|----------------------------------------------|
//! | Region(r)        | `id = r`        | `region_id = r`             | `region_of(department_id) = r`        | `region_of(arrondissement_id) = r`           |
//! | Department(d)    | `id = region(d)`| `id = d`                    | `department_id = d`                   | `department_of(arrondissement_id) = d`       |
//! | Arrondissement(a)| `id = region(a)`| `id = department(a)`        | `id = a`                              | `arrondissement_id = a`                      |

use geo_security::{GeoField, GeoJoin, Predicate, ScopeFilter};

use super::hierarchy::{GeoHierarchy, NotFound};

/// Compiles scope filters into predicates against one hierarchy snapshot.
#[derive(Debug, Clone, Copy)]
pub struct FilterCompiler<'a> {
    hierarchy: &'a GeoHierarchy,
}

impl<'a> FilterCompiler<'a> {
    #[must_use]
    pub const fn new(hierarchy: &'a GeoHierarchy) -> Self {
        Self { hierarchy }
    }

    /// Compile `filter` for records of `kind`.
    ///
    /// The scope root is always looked up first, so an id missing from the
    /// snapshot fails here rather than producing a predicate that matches
    /// nothing.
    ///
    /// # Errors
    ///
    /// [`NotFound`] if the scope root is not in the snapshot.
    pub fn compile(
        &self,
        filter: ScopeFilter,
        kind: geo_access_sdk::ResourceKind,
    ) -> Result<Predicate, NotFound> {
        use geo_access_sdk::ResourceKind as K;

        let h = self.hierarchy;
        let predicate = match filter {
            ScopeFilter::Unrestricted => Predicate::Unrestricted,
            ScopeFilter::Region(r) => {
                h.region(r)?;
                match kind {
                    K::Region => Predicate::eq(GeoField::Id, r),
                    K::Department => Predicate::eq(GeoField::RegionId, r),
                    K::Arrondissement => Predicate::join_through(
                        GeoField::DepartmentId,
                        GeoJoin::DepartmentToRegion,
                        r,
                    ),
                    K::Leaf => Predicate::join_through(
                        GeoField::ArrondissementId,
                        GeoJoin::ArrondissementToRegion,
                        r,
                    ),
                }
            }
            ScopeFilter::Department(d) => {
                let region = h.region_of_department(d)?;
                match kind {
                    K::Region => Predicate::eq(GeoField::Id, region),
                    K::Department => Predicate::eq(GeoField::Id, d),
                    K::Arrondissement => Predicate::eq(GeoField::DepartmentId, d),
                    K::Leaf => Predicate::join_through(
                        GeoField::ArrondissementId,
                        GeoJoin::ArrondissementToDepartment,
                        d,
                    ),
                }
            }
            ScopeFilter::Arrondissement(a) => {
                let department = h.department_of(a)?;
                match kind {
                    K::Region => Predicate::eq(GeoField::Id, h.region_of_department(department)?),
                    K::Department => Predicate::eq(GeoField::Id, department),
                    K::Arrondissement => Predicate::eq(GeoField::Id, a),
                    K::Leaf => Predicate::eq(GeoField::ArrondissementId, a),
                }
            }
        };
        Ok(predicate)
    }

    /// Rewrite join-through predicates as `IN` lists over the snapshot.
    ///
    /// For backends that cannot join on the hierarchy tables. Other shapes
    /// are returned unchanged. The result matches the same rows as the input
    /// as long as the backend's hierarchy agrees with this snapshot.
    #[must_use]
    pub fn expand(&self, predicate: Predicate) -> Predicate {
        let Predicate::JoinThrough { field, join, value } = predicate else {
            return predicate;
        };
        let h = self.hierarchy;
        match join {
            GeoJoin::DepartmentToRegion => {
                Predicate::is_in(field, h.departments_of(value.into()).iter().copied())
            }
            GeoJoin::ArrondissementToDepartment => {
                Predicate::is_in(field, h.arrondissements_of(value.into()).iter().copied())
            }
            GeoJoin::ArrondissementToRegion => {
                Predicate::is_in(field, h.arrondissements_of_region(value.into()))
            }
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use geo_access_sdk::{
        Arrondissement, Department, HierarchySnapshot, Region, ResourceKind,
    };
    use geo_security::{ArrondissementId, DepartmentId, GeoLevel, RegionId};

    fn hierarchy() -> GeoHierarchy {
        GeoHierarchy::from_snapshot(HierarchySnapshot {
            regions: vec![Region {
                id: RegionId::new(1),
                name: "Centre".to_owned(),
            }],
            departments: vec![
                Department {
                    id: DepartmentId::new(10),
                    name: "Mfoundi".to_owned(),
                    region_id: RegionId::new(1),
                },
                Department {
                    id: DepartmentId::new(11),
                    name: "Lekie".to_owned(),
                    region_id: RegionId::new(1),
                },
            ],
            arrondissements: vec![
                Arrondissement {
                    id: ArrondissementId::new(100),
                    name: "Yaounde 1er".to_owned(),
                    department_id: DepartmentId::new(10),
                },
                Arrondissement {
                    id: ArrondissementId::new(110),
                    name: "Monatele".to_owned(),
                    department_id: DepartmentId::new(11),
                },
            ],
        })
        .unwrap()
    }

    #[test]
    fn unrestricted_compiles_to_true_for_every_kind() {
        let h = hierarchy();
        let c = FilterCompiler::new(&h);
        for kind in ResourceKind::ALL {
            assert_eq!(
                c.compile(ScopeFilter::Unrestricted, kind).unwrap(),
                Predicate::Unrestricted
            );
        }
    }

    #[test]
    fn region_scope_table() {
        let h = hierarchy();
        let c = FilterCompiler::new(&h);
        let s = ScopeFilter::Region(RegionId::new(1));
        assert_eq!(c.compile(s, ResourceKind::Region).unwrap().to_string(), "id = 1");
        assert_eq!(
            c.compile(s, ResourceKind::Department).unwrap().to_string(),
            "region_id = 1"
        );
        assert_eq!(
            c.compile(s, ResourceKind::Arrondissement).unwrap().to_string(),
            "region_of(department_id) = 1"
        );
        assert_eq!(
            c.compile(s, ResourceKind::Leaf).unwrap().to_string(),
            "region_of(arrondissement_id) = 1"
        );
    }

    #[test]
    fn department_scope_table() {
        let h = hierarchy();
        let c = FilterCompiler::new(&h);
        let s = ScopeFilter::Department(DepartmentId::new(10));
        assert_eq!(c.compile(s, ResourceKind::Region).unwrap().to_string(), "id = 1");
        assert_eq!(c.compile(s, ResourceKind::Department).unwrap().to_string(), "id = 10");
        assert_eq!(
            c.compile(s, ResourceKind::Arrondissement).unwrap().to_string(),
            "department_id = 10"
        );
        assert_eq!(
            c.compile(s, ResourceKind::Leaf).unwrap().to_string(),
            "department_of(arrondissement_id) = 10"
        );
    }

    #[test]
    fn arrondissement_scope_table() {
        let h = hierarchy();
        let c = FilterCompiler::new(&h);
        let s = ScopeFilter::Arrondissement(ArrondissementId::new(110));
        assert_eq!(c.compile(s, ResourceKind::Region).unwrap().to_string(), "id = 1");
        assert_eq!(c.compile(s, ResourceKind::Department).unwrap().to_string(), "id = 11");
        assert_eq!(
            c.compile(s, ResourceKind::Arrondissement).unwrap().to_string(),
            "id = 110"
        );
        assert_eq!(
            c.compile(s, ResourceKind::Leaf).unwrap().to_string(),
            "arrondissement_id = 110"
        );
    }

    #[test]
    fn unknown_root_fails_for_every_kind() {
        let h = hierarchy();
        let c = FilterCompiler::new(&h);
        for kind in ResourceKind::ALL {
            let err = c
                .compile(ScopeFilter::Region(RegionId::new(9)), kind)
                .unwrap_err();
            assert_eq!(err.level, GeoLevel::Region);
            let err = c
                .compile(ScopeFilter::Arrondissement(ArrondissementId::new(999)), kind)
                .unwrap_err();
            assert_eq!(
                err,
                NotFound {
                    level: GeoLevel::Arrondissement,
                    id: 999
                }
            );
        }
    }

    #[test]
    fn expand_rewrites_joins_only() {
        let h = hierarchy();
        let c = FilterCompiler::new(&h);
        let join = c
            .compile(ScopeFilter::Region(RegionId::new(1)), ResourceKind::Leaf)
            .unwrap();
        assert_eq!(
            c.expand(join),
            Predicate::is_in(GeoField::ArrondissementId, [100_i64, 110])
        );

        let join = c
            .compile(ScopeFilter::Region(RegionId::new(1)), ResourceKind::Arrondissement)
            .unwrap();
        assert_eq!(
            c.expand(join),
            Predicate::is_in(GeoField::DepartmentId, [10_i64, 11])
        );

        let eq = Predicate::eq(GeoField::Id, 10_i64);
        assert_eq!(c.expand(eq.clone()), eq);
    }
}

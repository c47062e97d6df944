#![allow(dead_code)]

use std::sync::Arc;

use geo_access::{GeoAccessConfig, GeoHierarchy, GeoRow, HierarchyStore, Service};
use geo_access_sdk::{Arrondissement, Department, HierarchySnapshot, Region, ResourceKind};
use geo_security::{ArrondissementId, DepartmentId, GeoField, RegionId};

/// Three regions, four departments, six arrondissements.
///
/// ```text
/// Centre (1)    -> Mfoundi (10) -> Yaounde 1er (100), Yaounde 2e (101)
///               -> Lekie (11)   -> Monatele (110)
/// Littoral (2)  -> Wouri (20)   -> Douala 1er (200), Douala 2e (201)
/// Ouest (3)     -> Mifi (30)    -> Bafoussam 1er (300)
/// ```
pub fn snapshot() -> HierarchySnapshot {
    let regions = [(1, "Centre"), (2, "Littoral"), (3, "Ouest")];
    let departments = [(10, "Mfoundi", 1), (11, "Lekie", 1), (20, "Wouri", 2), (30, "Mifi", 3)];
    let arrondissements = [
        (100, "Yaounde 1er", 10),
        (101, "Yaounde 2e", 10),
        (110, "Monatele", 11),
        (200, "Douala 1er", 20),
        (201, "Douala 2e", 20),
        (300, "Bafoussam 1er", 30),
    ];

    HierarchySnapshot {
        regions: regions
            .into_iter()
            .map(|(id, name)| Region {
                id: RegionId::new(id),
                name: name.to_owned(),
            })
            .collect(),
        departments: departments
            .into_iter()
            .map(|(id, name, region)| Department {
                id: DepartmentId::new(id),
                name: name.to_owned(),
                region_id: RegionId::new(region),
            })
            .collect(),
        arrondissements: arrondissements
            .into_iter()
            .map(|(id, name, department)| Arrondissement {
                id: ArrondissementId::new(id),
                name: name.to_owned(),
                department_id: DepartmentId::new(department),
            })
            .collect(),
    }
}

pub fn hierarchy() -> GeoHierarchy {
    GeoHierarchy::from_snapshot(snapshot()).unwrap()
}

pub fn service_with(cfg: &GeoAccessConfig) -> Service {
    let store = Arc::new(HierarchyStore::with_hierarchy(hierarchy()));
    Service::from_config(cfg, store).unwrap()
}

pub fn service() -> Service {
    service_with(&GeoAccessConfig::default())
}

/// A record of any kind, with only the columns its table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Row {
    pub id: i64,
    pub region_id: Option<i64>,
    pub department_id: Option<i64>,
    pub arrondissement_id: Option<i64>,
}

impl GeoRow for Row {
    fn geo_field(&self, field: GeoField) -> Option<i64> {
        match field {
            GeoField::Id => Some(self.id),
            GeoField::RegionId => self.region_id,
            GeoField::DepartmentId => self.department_id,
            GeoField::ArrondissementId => self.arrondissement_id,
        }
    }
}

/// Table contents for `kind`; leaf rows are one facility per arrondissement, id `arrondissement * 10`.
pub fn rows(kind: ResourceKind) -> Vec<Row> {
    let s = snapshot();
    let row = |id: i64| Row {
        id,
        region_id: None,
        department_id: None,
        arrondissement_id: None,
    };
    match kind {
        ResourceKind::Region => s.regions.iter().map(|r| row(r.id.get())).collect(),
        ResourceKind::Department => s
            .departments
            .iter()
            .map(|d| Row {
                region_id: Some(d.region_id.get()),
                ..row(d.id.get())
            })
            .collect(),
        ResourceKind::Arrondissement => s
            .arrondissements
            .iter()
            .map(|a| Row {
                department_id: Some(a.department_id.get()),
                ..row(a.id.get())
            })
            .collect(),
        ResourceKind::Leaf => s
            .arrondissements
            .iter()
            .map(|a| Row {
                arrondissement_id: Some(a.id.get()),
                ..row(a.id.get() * 10)
            })
            .collect(),
    }
}

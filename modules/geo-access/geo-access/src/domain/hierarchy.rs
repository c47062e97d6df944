//! Indexed geographic containment graph and its copy-on-write holder.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use geo_access_sdk::{
    Arrondissement, Department, GeoTarget, HierarchyProvider, HierarchySnapshot, Region,
};
use geo_security::{ArrondissementId, DepartmentId, GeoLevel, RegionId, ScopeFilter};
use tracing::{info, warn};

use super::error::DomainError;

/// Lookup of an id absent from the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{level} {id} not found")]
pub struct NotFound {
    pub level: GeoLevel,
    pub id: i64,
}

impl NotFound {
    const fn region(id: RegionId) -> Self {
        Self {
            level: GeoLevel::Region,
            id: id.get(),
        }
    }

    const fn department(id: DepartmentId) -> Self {
        Self {
            level: GeoLevel::Department,
            id: id.get(),
        }
    }

    const fn arrondissement(id: ArrondissementId) -> Self {
        Self {
            level: GeoLevel::Arrondissement,
            id: id.get(),
        }
    }
}

impl From<NotFound> for DomainError {
    fn from(e: NotFound) -> Self {
        Self::UnresolvableScope {
            level: e.level,
            id: e.id,
        }
    }
}

/// Chain of ancestors of a node, from the region down to the node itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ancestry {
    pub region: RegionId,
    pub department: Option<DepartmentId>,
    pub arrondissement: Option<ArrondissementId>,
}

/// Read-only, indexed view of one hierarchy snapshot.
///
/// Construction validates that the data forms a strict tree: unique ids,
/// every department under a known region, every arrondissement under a
/// known department.
#[derive(Debug, Clone, Default)]
pub struct GeoHierarchy {
    regions: HashMap<RegionId, Region>,
    departments: HashMap<DepartmentId, Department>,
    arrondissements: HashMap<ArrondissementId, Arrondissement>,
    departments_by_region: HashMap<RegionId, Vec<DepartmentId>>,
    arrondissements_by_department: HashMap<DepartmentId, Vec<ArrondissementId>>,
}

impl GeoHierarchy {
    /// Index and validate a snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidHierarchy`] on duplicate ids or dangling parent references.
    pub fn from_snapshot(snapshot: HierarchySnapshot) -> Result<Self, DomainError> {
        let mut h = Self::default();

        for region in snapshot.regions {
            let id = region.id;
            if h.regions.insert(id, region).is_some() {
                return Err(DomainError::InvalidHierarchy(format!(
                    "duplicate region id {id}"
                )));
            }
            h.departments_by_region.entry(id).or_default();
        }

        for department in snapshot.departments {
            let (id, parent) = (department.id, department.region_id);
            let Some(children) = h.departments_by_region.get_mut(&parent) else {
                return Err(DomainError::InvalidHierarchy(format!(
                    "department {id} references unknown region {parent}"
                )));
            };
            children.push(id);
            if h.departments.insert(id, department).is_some() {
                return Err(DomainError::InvalidHierarchy(format!(
                    "duplicate department id {id}"
                )));
            }
            h.arrondissements_by_department.entry(id).or_default();
        }

        for arrondissement in snapshot.arrondissements {
            let (id, parent) = (arrondissement.id, arrondissement.department_id);
            let Some(children) = h.arrondissements_by_department.get_mut(&parent) else {
                return Err(DomainError::InvalidHierarchy(format!(
                    "arrondissement {id} references unknown department {parent}"
                )));
            };
            children.push(id);
            if h.arrondissements.insert(id, arrondissement).is_some() {
                return Err(DomainError::InvalidHierarchy(format!(
                    "duplicate arrondissement id {id}"
                )));
            }
        }

        for children in h.departments_by_region.values_mut() {
            children.sort_unstable();
        }
        for children in h.arrondissements_by_department.values_mut() {
            children.sort_unstable();
        }
        Ok(h)
    }

    /// # Errors
    ///
    /// [`NotFound`] if the id is not in the snapshot.
    pub fn region(&self, id: RegionId) -> Result<&Region, NotFound> {
        self.regions.get(&id).ok_or(NotFound::region(id))
    }

    /// # Errors
    ///
    /// [`NotFound`] if the id is not in the snapshot.
    pub fn department(&self, id: DepartmentId) -> Result<&Department, NotFound> {
        self.departments.get(&id).ok_or(NotFound::department(id))
    }

    /// # Errors
    ///
    /// [`NotFound`] if the id is not in the snapshot.
    pub fn arrondissement(&self, id: ArrondissementId) -> Result<&Arrondissement, NotFound> {
        self.arrondissements
            .get(&id)
            .ok_or(NotFound::arrondissement(id))
    }

    /// Region owning a department.
    ///
    /// # Errors
    ///
    /// [`NotFound`] if the department is not in the snapshot.
    pub fn region_of_department(&self, id: DepartmentId) -> Result<RegionId, NotFound> {
        self.department(id).map(|d| d.region_id)
    }

    /// Department owning an arrondissement.
    ///
    /// # Errors
    ///
    /// [`NotFound`] if the arrondissement is not in the snapshot.
    pub fn department_of(&self, id: ArrondissementId) -> Result<DepartmentId, NotFound> {
        self.arrondissement(id).map(|a| a.department_id)
    }

    /// Region owning an arrondissement, through its department.
    ///
    /// # Errors
    ///
    /// [`NotFound`] if the arrondissement is not in the snapshot.
    pub fn region_of_arrondissement(&self, id: ArrondissementId) -> Result<RegionId, NotFound> {
        let department = self.department_of(id)?;
        self.region_of_department(department)
    }

    /// Departments of a region, sorted by id. Empty for unknown regions.
    #[must_use]
    pub fn departments_of(&self, id: RegionId) -> &[DepartmentId] {
        self.departments_by_region
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Arrondissements of a department, sorted by id. Empty for unknown departments.
    #[must_use]
    pub fn arrondissements_of(&self, id: DepartmentId) -> &[ArrondissementId] {
        self.arrondissements_by_department
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// All arrondissements of a region, across its departments.
    #[must_use]
    pub fn arrondissements_of_region(&self, id: RegionId) -> Vec<ArrondissementId> {
        let mut out: Vec<ArrondissementId> = self
            .departments_of(id)
            .iter()
            .flat_map(|d| self.arrondissements_of(*d).iter().copied())
            .collect();
        out.sort_unstable();
        out
    }

    /// Closed set of arrondissements a scope covers; `None` when unrestricted.
    ///
    /// # Errors
    ///
    /// [`NotFound`] if the scope root is not in the snapshot.
    pub fn arrondissements_under(
        &self,
        filter: ScopeFilter,
    ) -> Result<Option<BTreeSet<ArrondissementId>>, NotFound> {
        let covered = match filter {
            ScopeFilter::Unrestricted => return Ok(None),
            ScopeFilter::Region(r) => {
                self.region(r)?;
                self.arrondissements_of_region(r).into_iter().collect()
            }
            ScopeFilter::Department(d) => {
                self.department(d)?;
                self.arrondissements_of(d).iter().copied().collect()
            }
            ScopeFilter::Arrondissement(a) => {
                self.arrondissement(a)?;
                BTreeSet::from([a])
            }
        };
        Ok(Some(covered))
    }

    /// Ancestors of a node, including the node itself.
    ///
    /// # Errors
    ///
    /// [`NotFound`] if the node (or, for a corrupted index, one of its parents) is missing.
    pub fn ancestry(&self, target: GeoTarget) -> Result<Ancestry, NotFound> {
        match target {
            GeoTarget::Region(r) => Ok(Ancestry {
                region: self.region(r)?.id,
                department: None,
                arrondissement: None,
            }),
            GeoTarget::Department(d) => Ok(Ancestry {
                region: self.region_of_department(d)?,
                department: Some(d),
                arrondissement: None,
            }),
            GeoTarget::Arrondissement(a) => {
                let department = self.department_of(a)?;
                Ok(Ancestry {
                    region: self.region_of_department(department)?,
                    department: Some(department),
                    arrondissement: Some(a),
                })
            }
        }
    }

    /// Does the node at `level`/`id` exist?
    #[must_use]
    pub fn contains(&self, level: GeoLevel, id: i64) -> bool {
        match level {
            GeoLevel::Region => self.regions.contains_key(&RegionId::new(id)),
            GeoLevel::Department => self.departments.contains_key(&DepartmentId::new(id)),
            GeoLevel::Arrondissement => self
                .arrondissements
                .contains_key(&ArrondissementId::new(id)),
        }
    }

    /// Node counts as `(regions, departments, arrondissements)`.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        (
            self.regions.len(),
            self.departments.len(),
            self.arrondissements.len(),
        )
    }
}

/// Holder of the current hierarchy snapshot.
///
/// Readers take an `Arc` once per evaluation and keep it for the whole call;
/// a refresh installs a new snapshot atomically and never mutates the old one.
#[derive(Default)]
pub struct HierarchyStore {
    current: ArcSwapOption<GeoHierarchy>,
}

impl HierarchyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `hierarchy`.
    #[must_use]
    pub fn with_hierarchy(hierarchy: GeoHierarchy) -> Self {
        let store = Self::new();
        store.install(hierarchy);
        store
    }

    /// The snapshot current at call time.
    ///
    /// # Errors
    ///
    /// [`DomainError::NotInitialized`] if nothing has been installed yet.
    pub fn snapshot(&self) -> Result<Arc<GeoHierarchy>, DomainError> {
        self.current.load_full().ok_or(DomainError::NotInitialized)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.current.load().is_some()
    }

    /// Atomically replace the current snapshot.
    pub fn install(&self, hierarchy: GeoHierarchy) {
        let (regions, departments, arrondissements) = hierarchy.counts();
        self.current.store(Some(Arc::new(hierarchy)));
        info!(
            regions,
            departments,
            arrondissements,
            "Installed geographic hierarchy snapshot"
        );
    }

    /// Pull a fresh snapshot from `provider`, validate it and install it.
    ///
    /// On failure the previously installed snapshot stays in place.
    ///
    /// # Errors
    ///
    /// - [`DomainError::ProviderFailed`] if the provider cannot supply a snapshot
    /// - [`DomainError::InvalidHierarchy`] if the snapshot is not a strict tree
    #[tracing::instrument(skip_all)]
    pub async fn refresh(
        &self,
        provider: &dyn HierarchyProvider,
    ) -> Result<(), DomainError> {
        let snapshot = provider.load_snapshot().await.map_err(|e| {
            warn!(error = %e, "Hierarchy provider failed, keeping current snapshot");
            DomainError::ProviderFailed(e.to_string())
        })?;
        let hierarchy = GeoHierarchy::from_snapshot(snapshot).inspect_err(|e| {
            warn!(error = %e, "Rejected hierarchy snapshot, keeping current snapshot");
        })?;
        self.install(hierarchy);
        Ok(())
    }
}

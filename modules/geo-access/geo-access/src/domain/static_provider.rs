//! Hierarchy provider serving a fixed snapshot.

use async_trait::async_trait;
use geo_access_sdk::{GeoAccessError, HierarchyProvider, HierarchySnapshot};

use crate::config::GeoAccessConfig;

/// Serves the snapshot embedded in configuration. Intended for development and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticHierarchyProvider {
    snapshot: HierarchySnapshot,
}

impl StaticHierarchyProvider {
    #[must_use]
    pub fn new(snapshot: HierarchySnapshot) -> Self {
        Self { snapshot }
    }

    #[must_use]
    pub fn from_config(cfg: &GeoAccessConfig) -> Self {
        Self::new(cfg.hierarchy.clone())
    }
}

#[async_trait]
impl HierarchyProvider for StaticHierarchyProvider {
    async fn load_snapshot(&self) -> Result<HierarchySnapshot, GeoAccessError> {
        Ok(self.snapshot.clone())
    }
}

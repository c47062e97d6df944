//! Geo access module wiring.

use std::sync::{Arc, OnceLock};

use geo_access_sdk::{GeoAccessClient, HierarchyProvider};
use tracing::info;

use crate::config::GeoAccessConfig;
use crate::domain::{GeoAccessLocalClient, HierarchyStore, Service};

/// Geo access module.
///
/// This module:
/// 1. Validates the permission table and resource catalog from configuration
/// 2. Loads the first hierarchy snapshot from the data layer's provider
/// 3. Exposes a [`GeoAccessClient`] backed by the in-process service
///
/// Later snapshots are pulled on demand with [`GeoAccessModule::refresh_hierarchy`].
#[derive(Default)]
pub struct GeoAccessModule {
    state: OnceLock<State>,
}

struct State {
    service: Arc<Service>,
    provider: Arc<dyn HierarchyProvider>,
}

impl GeoAccessModule {
    pub const MODULE_NAME: &'static str = "geo-access";

    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the service and install the first snapshot.
    ///
    /// # Errors
    ///
    /// Fails if the permission table is invalid, the provider cannot supply a
    /// valid snapshot, or the module is already initialized.
    #[tracing::instrument(skip_all, fields(predicate_mode = ?cfg.predicate_mode))]
    pub async fn init(
        &self,
        cfg: &GeoAccessConfig,
        provider: Arc<dyn HierarchyProvider>,
    ) -> anyhow::Result<()> {
        info!("Initializing {} module", Self::MODULE_NAME);

        let store = Arc::new(HierarchyStore::new());
        let svc = Arc::new(Service::from_config(cfg, Arc::clone(&store))?);
        store.refresh(provider.as_ref()).await?;

        self.state
            .set(State {
                service: svc,
                provider,
            })
            .map_err(|_| anyhow::anyhow!("{} module already initialized", Self::MODULE_NAME))?;

        info!("{} module initialized successfully", Self::MODULE_NAME);
        Ok(())
    }

    /// Client for consumers.
    ///
    /// # Errors
    ///
    /// Fails if the module has not been initialized.
    pub fn client(&self) -> anyhow::Result<Arc<dyn GeoAccessClient>> {
        let state = self.state()?;
        Ok(Arc::new(GeoAccessLocalClient::new(Arc::clone(&state.service))))
    }

    /// Re-pull the hierarchy from the provider and swap it in.
    ///
    /// In-flight evaluations finish against the snapshot they started with.
    ///
    /// # Errors
    ///
    /// Fails if the module has not been initialized or the new snapshot is rejected;
    /// the previous snapshot stays installed in that case.
    pub async fn refresh_hierarchy(&self) -> anyhow::Result<()> {
        let state = self.state()?;
        state
            .service
            .hierarchy()
            .refresh(state.provider.as_ref())
            .await?;
        Ok(())
    }

    fn state(&self) -> anyhow::Result<&State> {
        self.state
            .get()
            .ok_or_else(|| anyhow::anyhow!("{} module not initialized", Self::MODULE_NAME))
    }
}

//! Contract for the external data layer that owns the geographic tables.

use async_trait::async_trait;

use crate::error::GeoAccessError;
use crate::models::HierarchySnapshot;

/// Supplies geographic containment data to the engine.
///
/// Called at start-up and on every explicit refresh; never on the
/// evaluation path.
#[async_trait]
pub trait HierarchyProvider: Send + Sync {
    /// Load a complete, consistent snapshot of regions, departments and arrondissements.
    ///
    /// # Errors
    ///
    /// - `Unavailable` if the backing store cannot be reached
    /// - `Internal` for unexpected errors
    async fn load_snapshot(&self) -> Result<HierarchySnapshot, GeoAccessError>;
}

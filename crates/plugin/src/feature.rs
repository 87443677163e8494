use crate::export::RouteExport;
use crate::state::DynSlice;
use std::sync::Arc;
use waypost_api::BoxError;

/// Identifies a feature module in logs and aggregation errors.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FeatureInfo {
    pub id: String,
}

impl FeatureInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A compiled-in feature unit. Route files found by the scanner are the
/// other way to contribute routes; both end up in the same route table.
pub trait FeatureModule: Send + Sync {
    fn info(&self) -> FeatureInfo;

    /// The module's default route export.
    fn routes(&self) -> Result<RouteExport, BoxError>;

    /// State slices this module registers at load time.
    fn slices(&self) -> Vec<Arc<dyn DynSlice>> {
        Vec::new()
    }
}

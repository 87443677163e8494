use crate::error::AggregationError;
use std::sync::Arc;
use tracing::debug;
use waypost_api::RouteFragment;
use waypost_plugin::{DynSlice, FeatureInfo, FeatureModule};

/// Explicit registration list of compiled-in feature modules.
///
/// Modules keep the order they were registered in; their routes are
/// appended to the route table after the scanned ones.
#[derive(Default, Clone)]
pub struct FeatureRegistry {
    modules: Vec<Arc<dyn FeatureModule>>,
}

impl FeatureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, module: Arc<dyn FeatureModule>) {
        self.modules.push(module);
    }

    pub fn with_module(mut self, module: Arc<dyn FeatureModule>) -> Self {
        self.register(module);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn modules(&self) -> &[Arc<dyn FeatureModule>] {
        &self.modules
    }

    /// Route exports of every module, flattened one level, in registration order.
    pub fn collect_routes(&self) -> Result<Vec<(FeatureInfo, Vec<RouteFragment>)>, AggregationError> {
        let mut out = Vec::with_capacity(self.modules.len());
        for module in &self.modules {
            let info = module.info();
            let export = module.routes().map_err(|e| AggregationError::Feature {
                feature: info.id.clone(),
                reason: e.to_string(),
            })?;
            export.validate().map_err(|e| AggregationError::Feature {
                feature: info.id.clone(),
                reason: e.to_string(),
            })?;
            let fragments = export.into_fragments();
            debug!("Feature {} contributed {} fragment(s)", info.id, fragments.len());
            out.push((info, fragments));
        }
        Ok(out)
    }

    /// State slices declared by every module, in registration order.
    pub fn collect_slices(&self) -> Vec<(FeatureInfo, Arc<dyn DynSlice>)> {
        self.modules
            .iter()
            .flat_map(|module| {
                let info = module.info();
                module
                    .slices()
                    .into_iter()
                    .map(move |slice| (info.clone(), slice))
            })
            .collect()
    }
}

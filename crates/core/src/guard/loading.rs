use crate::store::StateContainer;
use crate::store::global::{GLOBAL_SLICE, SET_LOADING};
use std::sync::Arc;
use tracing::warn;
use waypost_api::{AfterNavigationHook, NavigationError, NavigationTransition};

/// Lowers the global loading flag once an attempt settles. A superseded
/// attempt leaves the flag alone: the attempt that replaced it owns it now
/// and lowers it when it settles.
pub struct LoadingIndicatorHook {
    store: Arc<StateContainer>,
}

impl LoadingIndicatorHook {
    pub fn new(store: Arc<StateContainer>) -> Self {
        Self { store }
    }
}

impl AfterNavigationHook for LoadingIndicatorHook {
    fn after_each(&self, transition: &NavigationTransition, failure: Option<&NavigationError>) {
        if matches!(failure, Some(NavigationError::Superseded { .. })) {
            return;
        }
        if let Err(err) = self
            .store
            .commit(&format!("{GLOBAL_SLICE}/{SET_LOADING}"), false)
        {
            warn!(
                "Could not clear the loading flag after navigation {}: {}",
                transition.id, err
            );
        }
    }
}

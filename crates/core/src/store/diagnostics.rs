//! Process-wide handle to the state container for diagnostic tooling.
//!
//! Application code gets the container injected. This cell exists so that a
//! debugger or inspector can reach the state without a reference to the app.

use super::container::StateContainer;
use once_cell::sync::OnceCell;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

static DIAGNOSTIC_STORE: OnceCell<Arc<StateContainer>> = OnceCell::new();

/// Publish `container`. Returns false when another container was published
/// first; the first one stays visible.
pub fn expose_for_diagnostics(container: Arc<StateContainer>) -> bool {
    let exposed = DIAGNOSTIC_STORE.set(container).is_ok();
    if exposed {
        debug!("State container exposed for diagnostics");
    }
    exposed
}

pub fn diagnostic_store() -> Option<Arc<StateContainer>> {
    DIAGNOSTIC_STORE.get().cloned()
}

pub fn diagnostic_snapshot() -> Option<Value> {
    DIAGNOSTIC_STORE.get().map(|store| store.snapshot())
}

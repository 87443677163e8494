pub mod container;
pub mod diagnostics;
pub mod global;

pub use container::StateContainer;
pub use diagnostics::{diagnostic_snapshot, diagnostic_store, expose_for_diagnostics};
pub use global::{GLOBAL_SLICE, GlobalModule, GlobalState, global_slice};

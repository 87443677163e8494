pub mod component;
pub mod error;
pub mod guard;
pub mod models;
pub mod navigation;

// Re-export commonly used types
pub use component::{ComponentLoader, LoadedComponent};
pub use error::{BoxError, NavigationError, NavigationResult, StoreError, StoreResult};
pub use guard::{AfterNavigationHook, NavigationGuard};
pub use models::*;
pub use navigation::NavigationService;

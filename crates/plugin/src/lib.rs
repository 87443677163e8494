pub mod export;
pub mod feature;
pub mod matcher;
pub mod state;

pub use export::{ExportError, RouteExport};
pub use feature::{FeatureInfo, FeatureModule};
pub use matcher::{DEFAULT_ROUTE_FILE_PATTERN, FileMatcherCap, FileNameMatcher};
pub use state::{DynSlice, MutationObserver, MutationRecord, Slice, SliceDefinition, SliceHandle};

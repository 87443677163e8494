//! Feature discovery: route modules found on disk and feature modules
//! registered in code.

pub mod registry;
pub mod scanner;

pub use registry::FeatureRegistry;
pub use scanner::{DiscoveredFeature, FeatureScanner, ScanResult};

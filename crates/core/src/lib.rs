pub mod config;
pub mod error;
pub mod logging;

pub mod features;
pub mod guard;
pub mod router;
pub mod store;

pub use error::{AggregationError, Result, WaypostError};

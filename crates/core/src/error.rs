use std::path::PathBuf;
use thiserror::Error;
use waypost_api::{NavigationError, StoreError};

/// Failures while building the route table. Always fatal at startup.
#[derive(Error, Debug)]
pub enum AggregationError {
    #[error("failed to load route module {path}: {reason}")]
    Load { path: PathBuf, reason: String },
    #[error("route module {path} has a malformed default export: {reason}")]
    MalformedExport { path: PathBuf, reason: String },
    #[error("failed to walk feature directory {path}: {reason}")]
    Walk { path: PathBuf, reason: String },
    #[error("feature module '{feature}' failed to provide routes: {reason}")]
    Feature { feature: String, reason: String },
}

#[derive(Error, Debug)]
pub enum WaypostError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Route aggregation error: {0}")]
    Aggregation(#[from] AggregationError),
    #[error("State error: {0}")]
    Store(#[from] StoreError),
    #[error("Navigation error: {0}")]
    Navigation(#[from] NavigationError),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<regex::Error> for WaypostError {
    fn from(err: regex::Error) -> Self {
        WaypostError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, WaypostError>;

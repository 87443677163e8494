//! Feature registry scanner.
//!
//! Walks the feature directory, picks the files the matcher accepts, loads
//! each one and validates its default export. Traversal is depth-first with
//! siblings sorted by file name, so the discovery order is lexicographic by
//! path components and identical on every machine.

use crate::error::AggregationError;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use walkdir::WalkDir;
use waypost_api::RouteFragment;
use waypost_plugin::{FileMatcherCap, FileNameMatcher, RouteExport};

/// Routes contributed by one route module file.
#[derive(Debug, Clone)]
pub struct DiscoveredFeature {
    pub source: PathBuf,
    pub fragments: Vec<RouteFragment>,
}

/// Result of a feature scan, in discovery order.
#[derive(Debug, Default, Clone)]
pub struct ScanResult {
    pub features: Vec<DiscoveredFeature>,
    pub duration: Duration,
}

impl ScanResult {
    pub fn total_fragments(&self) -> usize {
        self.features.iter().map(|f| f.fragments.len()).sum()
    }
}

pub struct FeatureScanner {
    root: PathBuf,
    matcher: Arc<dyn FileMatcherCap>,
}

impl FeatureScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            matcher: Arc::new(FileNameMatcher::default()),
        }
    }

    pub fn with_matcher(mut self, matcher: Arc<dyn FileMatcherCap>) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Matching module paths in discovery order, without loading them.
    pub fn discover(&self) -> Result<Vec<PathBuf>, AggregationError> {
        if !self.root.is_dir() {
            return Err(AggregationError::Walk {
                path: self.root.clone(),
                reason: "not a directory".to_string(),
            });
        }

        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| AggregationError::Walk {
                path: e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.root.clone()),
                reason: e.to_string(),
            })?;
            if entry.file_type().is_file() && self.matcher.supports_path(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(paths)
    }

    /// Load every matching module. The first failure aborts the scan: a
    /// partial route table is never returned.
    pub fn scan(&self) -> Result<ScanResult, AggregationError> {
        let start = Instant::now();
        let mut result = ScanResult::default();

        for path in self.discover()? {
            let feature = Self::load_module(&path)?;
            debug!(
                "Loaded {} route fragment(s) from {}",
                feature.fragments.len(),
                path.display()
            );
            result.features.push(feature);
        }

        result.duration = start.elapsed();
        info!(
            "Feature scan of {} complete: {} modules, {} fragments in {:?}",
            self.root.display(),
            result.features.len(),
            result.total_fragments(),
            result.duration
        );
        Ok(result)
    }

    fn load_module(path: &Path) -> Result<DiscoveredFeature, AggregationError> {
        let raw = std::fs::read_to_string(path).map_err(|e| AggregationError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let value: serde_json::Value =
            serde_json::from_str(&raw).map_err(|e| AggregationError::Load {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        let export =
            RouteExport::from_value(value).map_err(|e| AggregationError::MalformedExport {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(DiscoveredFeature {
            source: path.to_path_buf(),
            fragments: export.into_fragments(),
        })
    }
}

//! Deployment configuration.
//!
//! Only the base path is expected to vary between deployments; it comes from
//! `BASE_URL`. The rest has working defaults and can be set from a JSON file.

use crate::error::{Result, WaypostError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use waypost_plugin::DEFAULT_ROUTE_FILE_PATTERN;

pub const ENV_BASE_URL: &str = "BASE_URL";
pub const ENV_FEATURES_DIR: &str = "WAYPOST_FEATURES_DIR";
pub const ENV_ROUTE_PATTERN: &str = "WAYPOST_ROUTE_PATTERN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppConfig {
    /// Root prefix of every URL the router produces or accepts.
    pub base_path: String,
    pub features_dir: PathBuf,
    pub route_file_pattern: String,
    pub auth: AuthConfig,
}

/// Where the default guard looks for the authentication state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthConfig {
    pub login_path: String,
    pub slice: String,
    pub accessor: String,
    /// Route meta flag that marks a record as protected.
    pub meta_key: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: "/login".to_string(),
            slice: "auth".to_string(),
            accessor: "isAuthenticated".to_string(),
            meta_key: "requiresAuth".to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            features_dir: PathBuf::from("src/features"),
            route_file_pattern: DEFAULT_ROUTE_FILE_PATTERN.to_string(),
            auth: AuthConfig::default(),
        }
    }
}

impl AppConfig {
    /// Defaults plus environment overrides.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Read a JSON config file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: AppConfig = serde_json::from_str(&raw).map_err(|e| {
            WaypostError::Config(format!("invalid config {}: {}", path.display(), e))
        })?;
        config.apply_env();
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(base) = std::env::var(ENV_BASE_URL) {
            self.base_path = base;
        }
        if let Ok(dir) = std::env::var(ENV_FEATURES_DIR) {
            self.features_dir = PathBuf::from(dir);
        }
        if let Ok(pattern) = std::env::var(ENV_ROUTE_PATTERN) {
            self.route_file_pattern = pattern;
        }
        self.base_path = normalize_base(&self.base_path);
    }

    pub fn with_base_path(mut self, base: &str) -> Self {
        self.base_path = normalize_base(base);
        self
    }

    pub fn with_features_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.features_dir = dir.into();
        self
    }
}

/// Leading slash, no trailing slash; the root base becomes empty.
pub fn normalize_base(base: &str) -> String {
    let trimmed = base.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base(""), "");
        assert_eq!(normalize_base("/"), "");
        assert_eq!(normalize_base("/app/"), "/app");
        assert_eq!(normalize_base("app"), "/app");
        assert_eq!(normalize_base(" /nested/app// "), "/nested/app");
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypost.json");
        std::fs::write(
            &path,
            r#"{ "featuresDir": "modules/features", "auth": { "loginPath": "/signin" } }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.features_dir, PathBuf::from("modules/features"));
        assert_eq!(config.auth.login_path, "/signin");
        assert_eq!(config.auth.slice, "auth");
        assert_eq!(config.route_file_pattern, DEFAULT_ROUTE_FILE_PATTERN);
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("waypost.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(AppConfig::load(&path), Err(WaypostError::Config(_))));
    }
}

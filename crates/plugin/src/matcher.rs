use regex::{Regex, RegexBuilder};
use std::path::Path;

/// Decides which files under the feature root are route modules.
pub trait FileMatcherCap: Send + Sync {
    fn supports_path(&self, path: &Path) -> bool;
}

/// Default route-module file name rule.
pub const DEFAULT_ROUTE_FILE_PATTERN: &str = r"router\.json$";

/// Case-insensitive regex applied to the file name only.
#[derive(Debug, Clone)]
pub struct FileNameMatcher {
    pattern: Regex,
}

impl FileNameMatcher {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let pattern = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { pattern })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Default for FileNameMatcher {
    fn default() -> Self {
        Self {
            pattern: RegexBuilder::new(DEFAULT_ROUTE_FILE_PATTERN)
                .case_insensitive(true)
                .build()
                .expect("default route file pattern is valid"),
        }
    }
}

impl FileMatcherCap for FileNameMatcher {
    fn supports_path(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| self.pattern.is_match(name))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_router_files() {
        let matcher = FileNameMatcher::default();
        assert!(matcher.supports_path(Path::new("features/users/router.json")));
        assert!(matcher.supports_path(Path::new("features/users/Router.JSON")));
        assert!(matcher.supports_path(Path::new("features/admin.router.json")));
        assert!(!matcher.supports_path(Path::new("features/users/router.json.bak")));
        assert!(!matcher.supports_path(Path::new("features/users/routes.json")));
        // Only the file name is tested, not parent directories
        assert!(!matcher.supports_path(Path::new("router.json/index.json")));
    }

    #[test]
    fn test_custom_pattern() {
        let matcher = FileNameMatcher::new(r"^routes?\.json$").unwrap();
        assert!(matcher.supports_path(Path::new("a/routes.json")));
        assert!(matcher.supports_path(Path::new("a/route.json")));
        assert!(!matcher.supports_path(Path::new("a/router.json")));
        assert!(FileNameMatcher::new("(").is_err());
    }
}

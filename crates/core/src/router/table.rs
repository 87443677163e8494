use crate::features::ScanResult;
use std::fmt;
use std::path::PathBuf;
use waypost_api::RouteFragment;
use waypost_plugin::FeatureInfo;

/// Where a route table entry came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteSource {
    File(PathBuf),
    Feature(String),
    Inline,
}

impl fmt::Display for RouteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteSource::File(path) => write!(f, "{}", path.display()),
            RouteSource::Feature(id) => write!(f, "feature:{id}"),
            RouteSource::Inline => f.write_str("inline"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableEntry {
    pub source: RouteSource,
    pub fragment: RouteFragment,
}

/// Ordered route fragments. Insertion order is discovery order and decides
/// which record wins when two paths conflict.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<TableEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fragments(fragments: impl IntoIterator<Item = RouteFragment>) -> Self {
        let mut table = Self::new();
        for fragment in fragments {
            table.push(RouteSource::Inline, fragment);
        }
        table
    }

    pub fn push(&mut self, source: RouteSource, fragment: RouteFragment) {
        self.entries.push(TableEntry { source, fragment });
    }

    pub fn extend_scanned(&mut self, scan: ScanResult) {
        for feature in scan.features {
            for fragment in feature.fragments {
                self.push(RouteSource::File(feature.source.clone()), fragment);
            }
        }
    }

    pub fn extend_features(&mut self, routes: Vec<(FeatureInfo, Vec<RouteFragment>)>) {
        for (info, fragments) in routes {
            for fragment in fragments {
                self.push(RouteSource::Feature(info.id.clone()), fragment);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[TableEntry] {
        &self.entries
    }

    pub fn fragments(&self) -> impl Iterator<Item = &RouteFragment> {
        self.entries.iter().map(|e| &e.fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::DiscoveredFeature;

    #[test]
    fn test_scanned_then_feature_routes_keep_order() {
        let scan = ScanResult {
            features: vec![
                DiscoveredFeature {
                    source: PathBuf::from("a/router.json"),
                    fragments: vec![RouteFragment::new("/a", "A")],
                },
                DiscoveredFeature {
                    source: PathBuf::from("b/router.json"),
                    fragments: vec![RouteFragment::new("/b", "B")],
                },
            ],
            duration: Default::default(),
        };

        let mut table = RouteTable::new();
        table.extend_scanned(scan);
        table.extend_features(vec![(
            FeatureInfo::new("c"),
            vec![RouteFragment::new("/c", "C")],
        )]);

        let paths: Vec<_> = table.fragments().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["/a", "/b", "/c"]);
        assert_eq!(table.entries()[2].source, RouteSource::Feature("c".into()));
        assert_eq!(table.entries()[0].source.to_string(), "a/router.json");
    }
}

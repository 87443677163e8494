use super::route::{ComponentRef, RouteMeta};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One compiled route record that took part in a match, outermost first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRecord {
    /// Full pattern, parent paths included (`/users/:id`).
    pub path: String,
    pub name: Option<String>,
    pub component: Option<ComponentRef>,
    pub meta: RouteMeta,
}

/// A location resolved against the route table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedRoute {
    pub path: String,
    pub full_path: String,
    pub name: Option<String>,
    pub params: BTreeMap<String, String>,
    pub query: BTreeMap<String, String>,
    pub hash: String,
    pub matched: Vec<MatchedRecord>,
    /// Full path of the location that redirected here, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirected_from: Option<String>,
}

impl ResolvedRoute {
    /// The route every engine starts from before the initial navigation.
    pub fn start() -> Self {
        Self {
            path: "/".to_string(),
            full_path: "/".to_string(),
            name: None,
            params: BTreeMap::new(),
            query: BTreeMap::new(),
            hash: String::new(),
            matched: Vec::new(),
            redirected_from: None,
        }
    }

    pub fn is_start(&self) -> bool {
        self.matched.is_empty() && self.path == "/" && self.redirected_from.is_none()
    }

    pub fn is_matched(&self) -> bool {
        !self.matched.is_empty()
    }

    /// Innermost component, the one that renders the page body.
    pub fn component(&self) -> Option<&ComponentRef> {
        self.matched.last().and_then(|r| r.component.as_ref())
    }

    /// Meta merged across matched records, inner records overriding outer ones.
    pub fn meta(&self) -> RouteMeta {
        let mut merged = RouteMeta::new();
        for record in &self.matched {
            for (k, v) in &record.meta {
                merged.insert(k.clone(), v.clone());
            }
        }
        merged
    }

    /// True when any matched record sets `key` to a truthy value.
    pub fn meta_flag(&self, key: &str) -> bool {
        self.matched.iter().any(|record| match record.meta.get(key) {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::Null) | None => false,
            Some(_) => true,
        })
    }

    /// Same location, ignoring how it was reached.
    pub fn same_location(&self, other: &ResolvedRoute) -> bool {
        self.full_path == other.full_path
    }
}

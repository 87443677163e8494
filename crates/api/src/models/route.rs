use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Free-form metadata attached to a route record (`requiresAuth`, titles, ...).
pub type RouteMeta = serde_json::Map<String, serde_json::Value>;

/// Reference to a view component that is loaded lazily on first navigation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ComponentRef(String);

impl ComponentRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentRef {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A single navigable path contributed by one feature module.
///
/// Fragments are immutable once loaded; the router compiles them into
/// records and never edits them in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct RouteFragment {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Records that only redirect may omit the component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub meta: RouteMeta,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RouteFragment>,
}

impl RouteFragment {
    pub fn new(path: impl Into<String>, component: impl Into<ComponentRef>) -> Self {
        Self {
            path: path.into(),
            name: None,
            component: Some(component.into()),
            redirect: None,
            meta: RouteMeta::new(),
            children: Vec::new(),
        }
    }

    pub fn redirect(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: None,
            component: None,
            redirect: Some(target.into()),
            meta: RouteMeta::new(),
            children: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }

    pub fn with_child(mut self, child: RouteFragment) -> Self {
        self.children.push(child);
        self
    }

    /// Number of fragments in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(RouteFragment::subtree_len)
            .sum::<usize>()
    }
}

impl From<String> for ComponentRef {
    fn from(value: String) -> Self {
        Self(value)
    }
}

//! The "default export" of a route module.
//!
//! A route module exports either one fragment or a sequence of fragments.
//! Anything else is a configuration error the caller must treat as fatal.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use waypost_api::RouteFragment;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("expected a route fragment or an array of route fragments, found {0}")]
    UnexpectedShape(&'static str),
    #[error("fragment #{index}: {reason}")]
    InvalidFragment { index: usize, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RouteExport {
    One(RouteFragment),
    Many(Vec<RouteFragment>),
}

impl RouteExport {
    /// Parse and validate a loaded JSON document as a default export.
    /// An empty array is a valid export that contributes no routes.
    pub fn from_value(value: Value) -> Result<Self, ExportError> {
        let export = match value {
            Value::Object(_) => RouteExport::One(parse_fragment(0, value)?),
            Value::Array(items) => RouteExport::Many(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(index, item)| parse_fragment(index, item))
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            other => return Err(ExportError::UnexpectedShape(json_kind(&other))),
        };
        export.validate()?;
        Ok(export)
    }

    /// Check every top-level fragment: a non-empty path, and a component,
    /// redirect or children at every level. Nested routes may use an empty
    /// path for the parent's default child.
    pub fn validate(&self) -> Result<(), ExportError> {
        self.fragments()
            .iter()
            .enumerate()
            .try_for_each(|(index, fragment)| {
                if fragment.path.trim().is_empty() {
                    return Err(ExportError::InvalidFragment {
                        index,
                        reason: "route path must not be empty".to_string(),
                    });
                }
                check_targets(fragment)
                    .map_err(|reason| ExportError::InvalidFragment { index, reason })
            })
    }

    pub fn fragments(&self) -> &[RouteFragment] {
        match self {
            RouteExport::One(fragment) => std::slice::from_ref(fragment),
            RouteExport::Many(fragments) => fragments,
        }
    }

    /// Flatten one level: a module contributing N fragments yields N entries.
    pub fn into_fragments(self) -> Vec<RouteFragment> {
        match self {
            RouteExport::One(fragment) => vec![fragment],
            RouteExport::Many(fragments) => fragments,
        }
    }
}

impl From<RouteFragment> for RouteExport {
    fn from(value: RouteFragment) -> Self {
        RouteExport::One(value)
    }
}

impl From<Vec<RouteFragment>> for RouteExport {
    fn from(value: Vec<RouteFragment>) -> Self {
        RouteExport::Many(value)
    }
}

fn parse_fragment(index: usize, value: Value) -> Result<RouteFragment, ExportError> {
    if !value.is_object() {
        return Err(ExportError::InvalidFragment {
            index,
            reason: format!("expected an object, found {}", json_kind(&value)),
        });
    }
    serde_json::from_value(value).map_err(|e| ExportError::InvalidFragment {
        index,
        reason: e.to_string(),
    })
}

fn check_targets(fragment: &RouteFragment) -> Result<(), String> {
    if fragment.component.is_none() && fragment.redirect.is_none() && fragment.children.is_empty()
    {
        return Err(format!(
            "route '{}' needs a component, a redirect or children",
            fragment.path
        ));
    }
    fragment.children.iter().try_for_each(check_targets)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_fragment_export() {
        let export = RouteExport::from_value(json!({ "path": "/a", "component": "A" })).unwrap();
        let fragments = export.into_fragments();
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].path, "/a");
    }

    #[test]
    fn test_sequence_export_is_flattened_in_order() {
        let export = RouteExport::from_value(json!([
            { "path": "/b", "component": "B" },
            { "path": "/c", "component": "C" }
        ]))
        .unwrap();
        let paths: Vec<_> = export.into_fragments().into_iter().map(|f| f.path).collect();
        assert_eq!(paths, vec!["/b", "/c"]);
    }

    #[test]
    fn test_malformed_exports_are_rejected() {
        assert!(matches!(
            RouteExport::from_value(json!("routes")),
            Err(ExportError::UnexpectedShape("a string"))
        ));
        assert!(matches!(
            RouteExport::from_value(json!([{ "path": "/ok", "component": "Ok" }, 42])),
            Err(ExportError::InvalidFragment { index: 1, .. })
        ));
        assert!(matches!(
            RouteExport::from_value(json!({ "component": "NoPath" })),
            Err(ExportError::InvalidFragment { index: 0, .. })
        ));
        assert!(matches!(
            RouteExport::from_value(json!({ "path": "/empty" })),
            Err(ExportError::InvalidFragment { .. })
        ));
    }

    #[test]
    fn test_empty_array_contributes_no_routes() {
        let export = RouteExport::from_value(json!([])).unwrap();
        assert!(export.into_fragments().is_empty());
    }

    #[test]
    fn test_validate_catches_built_exports() {
        let export = RouteExport::from(vec![
            RouteFragment::new("/ok", "Ok"),
            RouteFragment {
                path: String::new(),
                name: None,
                component: None,
                redirect: None,
                meta: Default::default(),
                children: Vec::new(),
            },
        ]);
        assert!(matches!(
            export.validate(),
            Err(ExportError::InvalidFragment { index: 1, .. })
        ));
        assert!(RouteExport::from(RouteFragment::new("/ok", "Ok")).validate().is_ok());
    }

    #[test]
    fn test_default_child_may_have_empty_path() {
        let export = RouteExport::from_value(json!({
            "path": "/users",
            "component": "UsersLayout",
            "children": [{ "path": "", "component": "UserList" }]
        }))
        .unwrap();
        assert_eq!(export.into_fragments()[0].children[0].path, "");

        assert!(matches!(
            RouteExport::from_value(json!({ "path": "", "component": "Root" })),
            Err(ExportError::InvalidFragment { index: 0, .. })
        ));
    }
}

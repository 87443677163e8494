use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Navigation target, either a raw path (optionally with query and hash) or a
/// named route with parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Path(String),
    Named {
        name: String,
        #[serde(default)]
        params: BTreeMap<String, String>,
    },
}

impl Location {
    pub fn named(name: impl Into<String>) -> Self {
        Location::Named {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn with_param(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            Location::Named { name, mut params } => {
                params.insert(key.into(), value.into());
                Location::Named { name, params }
            }
            other => other,
        }
    }
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        Location::Path(value.to_string())
    }
}

impl From<String> for Location {
    fn from(value: String) -> Self {
        Location::Path(value)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Path(path) => f.write_str(path),
            Location::Named { name, params } => write!(f, "{{name: {name}, params: {params:?}}}"),
        }
    }
}

/// A raw location split into its path, query and hash parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationParts {
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub hash: String,
}

impl LocationParts {
    pub fn parse(raw: &str) -> Self {
        let (rest, hash) = match raw.split_once('#') {
            Some((rest, hash)) => (rest, format!("#{hash}")),
            None => (raw, String::new()),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (
                path,
                url::form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect(),
            ),
            None => (rest, BTreeMap::new()),
        };

        let mut path = path.to_string();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }

        Self { path, query, hash }
    }

    /// Path plus serialized query and hash.
    pub fn full_path(&self) -> String {
        let mut out = self.path.clone();
        if !self.query.is_empty() {
            let query = url::form_urlencoded::Serializer::new(String::new())
                .extend_pairs(self.query.iter())
                .finish();
            out.push('?');
            out.push_str(&query);
        }
        out.push_str(&self.hash);
        out
    }
}

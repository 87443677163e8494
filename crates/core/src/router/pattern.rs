//! Route path patterns.
//!
//! Supported syntax: static segments, `:param`, optional `:param?` and a
//! catch-all `*` segment captured as `pathMatch`. Static segments compare
//! case-insensitively and a trailing slash is ignored.

use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

pub const CATCH_ALL_PARAM: &str = "pathMatch";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param { name: String, optional: bool },
    CatchAll,
}

#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
    regex: Regex,
    /// Capture group `i + 1` holds `keys[i]`.
    keys: Vec<String>,
}

impl PathPattern {
    pub fn compile(path: &str) -> Result<Self, regex::Error> {
        let segments: Vec<Segment> = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(parse_segment)
            .collect();

        let mut expr = String::from("^");
        let mut keys = Vec::new();
        for segment in &segments {
            match segment {
                Segment::Static(text) => {
                    expr.push('/');
                    expr.push_str(&regex::escape(text));
                }
                Segment::Param {
                    name,
                    optional: false,
                } => {
                    expr.push_str("/([^/]+)");
                    keys.push(name.clone());
                }
                Segment::Param {
                    name,
                    optional: true,
                } => {
                    expr.push_str("(?:/([^/]+))?");
                    keys.push(name.clone());
                }
                Segment::CatchAll => {
                    expr.push_str("/(.*)");
                    keys.push(CATCH_ALL_PARAM.to_string());
                }
            }
        }
        expr.push_str("/?$");

        let regex = RegexBuilder::new(&expr).case_insensitive(true).build()?;
        Ok(Self {
            source: normalize_path(path),
            segments,
            regex,
            keys,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_catch_all(&self) -> bool {
        self.segments.iter().any(|s| matches!(s, Segment::CatchAll))
    }

    pub fn param_names(&self) -> &[String] {
        &self.keys
    }

    /// Params captured from `path`, or `None` when the pattern does not match.
    pub fn captures(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let caps = self.regex.captures(path)?;
        let mut params = BTreeMap::new();
        for (i, key) in self.keys.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.insert(key.clone(), m.as_str().trim_end_matches('/').to_string());
            }
        }
        Some(params)
    }

    /// Build a concrete path from params. Returns the name of the first
    /// required param that is missing.
    pub fn fill(&self, params: &BTreeMap<String, String>) -> Result<String, String> {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Static(text) => {
                    out.push('/');
                    out.push_str(text);
                }
                Segment::Param { name, optional } => match params.get(name) {
                    Some(value) if !value.is_empty() => {
                        out.push('/');
                        out.push_str(value);
                    }
                    _ if *optional => {}
                    _ => return Err(name.clone()),
                },
                Segment::CatchAll => {
                    if let Some(value) = params.get(CATCH_ALL_PARAM) {
                        out.push('/');
                        out.push_str(value.trim_start_matches('/'));
                    }
                }
            }
        }
        if out.is_empty() {
            out.push('/');
        }
        Ok(out)
    }
}

fn parse_segment(raw: &str) -> Segment {
    if raw == "*" {
        return Segment::CatchAll;
    }
    match raw.strip_prefix(':') {
        Some(name) => match name.strip_suffix('?') {
            Some(name) => Segment::Param {
                name: name.to_string(),
                optional: true,
            },
            None => Segment::Param {
                name: name.to_string(),
                optional: false,
            },
        },
        None => Segment::Static(raw.to_string()),
    }
}

/// Replace `:param` segments of a redirect target with captured params.
/// Query and hash are kept verbatim. Returns the first missing required param.
pub fn substitute_params(
    target: &str,
    params: &BTreeMap<String, String>,
) -> Result<String, String> {
    let (path, rest) = match target.find(['?', '#']) {
        Some(i) => target.split_at(i),
        None => (target, ""),
    };

    let mut segments = Vec::new();
    for segment in path.split('/') {
        let Some(name) = segment.strip_prefix(':') else {
            segments.push(segment.to_string());
            continue;
        };
        let (name, optional) = match name.strip_suffix('?') {
            Some(name) => (name, true),
            None => (name, false),
        };
        match params.get(name) {
            Some(value) => segments.push(value.clone()),
            None if optional => {}
            None => return Err(name.to_string()),
        }
    }
    Ok(format!("{}{}", segments.join("/"), rest))
}

/// Join a child path onto its parent. Absolute child paths stand alone.
pub fn join_paths(parent: &str, child: &str) -> String {
    if child.starts_with('/') || parent.is_empty() {
        return normalize_path(child);
    }
    normalize_path(&format!("{}/{}", parent.trim_end_matches('/'), child))
}

/// Collapse duplicate slashes, force a leading slash, drop the trailing one.
pub fn normalize_path(path: &str) -> String {
    let joined = path
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");
    format!("/{joined}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_static_match_ignores_case_and_trailing_slash() {
        let pattern = PathPattern::compile("/users/list").unwrap();
        assert!(pattern.captures("/users/list").is_some());
        assert!(pattern.captures("/Users/List/").is_some());
        assert!(pattern.captures("/users").is_none());
        assert!(pattern.captures("/users/list/extra").is_none());
    }

    #[test]
    fn test_params() {
        let pattern = PathPattern::compile("/users/:id/posts/:postId?").unwrap();
        assert_eq!(
            pattern.captures("/users/42/posts/7"),
            Some(params(&[("id", "42"), ("postId", "7")]))
        );
        assert_eq!(
            pattern.captures("/users/42/posts"),
            Some(params(&[("id", "42")]))
        );
        assert!(pattern.captures("/users//posts").is_none());
        assert_eq!(pattern.param_names(), &["id".to_string(), "postId".to_string()]);
    }

    #[test]
    fn test_catch_all() {
        let pattern = PathPattern::compile("*").unwrap();
        assert!(pattern.is_catch_all());
        assert_eq!(
            pattern.captures("/anything/at/all"),
            Some(params(&[("pathMatch", "anything/at/all")]))
        );
        assert!(pattern.captures("/").is_some());

        let files = PathPattern::compile("/files/*").unwrap();
        assert!(files.captures("/files/a/b.txt").is_some());
        assert!(files.captures("/other/a").is_none());
    }

    #[test]
    fn test_root() {
        let pattern = PathPattern::compile("/").unwrap();
        assert!(pattern.captures("/").is_some());
        assert!(pattern.captures("/a").is_none());
    }

    #[test]
    fn test_fill() {
        let pattern = PathPattern::compile("/users/:id/:tab?").unwrap();
        assert_eq!(pattern.fill(&params(&[("id", "42")])), Ok("/users/42".into()));
        assert_eq!(
            pattern.fill(&params(&[("id", "42"), ("tab", "posts")])),
            Ok("/users/42/posts".into())
        );
        assert_eq!(pattern.fill(&params(&[])), Err("id".into()));
        assert_eq!(PathPattern::compile("/").unwrap().fill(&params(&[])), Ok("/".into()));
    }

    #[test]
    fn test_substitute_params() {
        let captured = params(&[("id", "7")]);
        assert_eq!(
            substitute_params("/profile/:id?tab=info", &captured),
            Ok("/profile/7?tab=info".into())
        );
        assert_eq!(substitute_params("/home", &captured), Ok("/home".into()));
        assert_eq!(substitute_params("/a/:missing", &captured), Err("missing".into()));
        assert_eq!(substitute_params("/a/:opt?", &captured), Ok("/a".into()));
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(join_paths("/users", ":id"), "/users/:id");
        assert_eq!(join_paths("/users/", "/absolute"), "/absolute");
        assert_eq!(join_paths("", "about"), "/about");
        assert_eq!(join_paths("/", ""), "/");
    }
}

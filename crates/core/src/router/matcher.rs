//! Route matching.
//!
//! Fragments are flattened into records once, when the engine is built.
//! Matching walks the records in a fixed order: nested routes before the
//! route that contains them, catch-all routes after everything else.

use super::pattern::{PathPattern, join_paths, substitute_params};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;
use waypost_api::{
    ComponentRef, Location, LocationParts, MatchedRecord, NavigationError, NavigationResult,
    ResolvedRoute, RouteFragment, RouteMeta,
};

/// Redirect hops followed before a resolution is rejected as a loop.
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct RouteRecord {
    pub pattern: PathPattern,
    pub name: Option<String>,
    pub component: Option<ComponentRef>,
    pub redirect: Option<String>,
    pub meta: RouteMeta,
    pub parent: Option<usize>,
}

impl RouteRecord {
    pub fn path(&self) -> &str {
        self.pattern.as_str()
    }

    fn to_matched(&self) -> MatchedRecord {
        MatchedRecord {
            path: self.path().to_string(),
            name: self.name.clone(),
            component: self.component.clone(),
            meta: self.meta.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteMatcher {
    /// Depth-first, parents before children. Parent links index into this.
    records: Vec<RouteRecord>,
    /// Indices into `records` in match priority order.
    order: Vec<usize>,
    names: HashMap<String, usize>,
}

impl RouteMatcher {
    pub fn compile<'a>(
        fragments: impl IntoIterator<Item = &'a RouteFragment>,
    ) -> Result<Self, regex::Error> {
        let mut matcher = Self::default();
        let mut post_order = Vec::new();
        for fragment in fragments {
            matcher.add_fragment(fragment, None, "", &mut post_order)?;
        }

        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut regular = Vec::new();
        let mut catch_all = Vec::new();
        for idx in post_order {
            let record = &matcher.records[idx];
            if let Some(&kept) = seen.get(&record.path().to_lowercase()) {
                // A parent shadowed by its own default (empty path) child is expected.
                if !matcher.is_ancestor(idx, kept) {
                    warn!(
                        "Route path '{}' is already registered, keeping the first record",
                        record.path()
                    );
                }
                continue;
            }
            seen.insert(record.path().to_lowercase(), idx);
            if record.pattern.is_catch_all() {
                catch_all.push(idx);
            } else {
                regular.push(idx);
            }
        }
        regular.extend(catch_all);
        matcher.order = regular;
        Ok(matcher)
    }

    fn add_fragment(
        &mut self,
        fragment: &RouteFragment,
        parent: Option<usize>,
        parent_path: &str,
        post_order: &mut Vec<usize>,
    ) -> Result<(), regex::Error> {
        let full_path = join_paths(parent_path, &fragment.path);
        let idx = self.records.len();
        self.records.push(RouteRecord {
            pattern: PathPattern::compile(&full_path)?,
            name: fragment.name.clone(),
            component: fragment.component.clone(),
            redirect: fragment.redirect.clone(),
            meta: fragment.meta.clone(),
            parent,
        });

        if let Some(name) = &fragment.name {
            if self.names.contains_key(name) {
                warn!(
                    "Route name '{}' is already registered, ignoring it on '{}'",
                    name, full_path
                );
            } else {
                self.names.insert(name.clone(), idx);
            }
        }

        for child in &fragment.children {
            self.add_fragment(child, Some(idx), &full_path, post_order)?;
        }
        post_order.push(idx);
        Ok(())
    }

    fn is_ancestor(&self, ancestor: usize, mut idx: usize) -> bool {
        while let Some(parent) = self.records[idx].parent {
            if parent == ancestor {
                return true;
            }
            idx = parent;
        }
        false
    }

    /// Records in match priority order.
    pub fn records(&self) -> impl Iterator<Item = &RouteRecord> {
        self.order.iter().map(|&idx| &self.records[idx])
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteRecord> {
        self.names.get(name).map(|&idx| &self.records[idx])
    }

    /// Resolve a location. A path that matches nothing resolves to a route
    /// with an empty `matched` list.
    pub fn resolve(&self, location: &Location) -> NavigationResult<ResolvedRoute> {
        self.resolve_counted(location, 0).map(|(route, _)| route)
    }

    /// Resolve a location with `hops` redirects already taken. Returns the
    /// route and the hop count after any static redirects it followed.
    pub fn resolve_counted(
        &self,
        location: &Location,
        hops: usize,
    ) -> NavigationResult<(ResolvedRoute, usize)> {
        match location {
            Location::Path(raw) => self.resolve_parts(LocationParts::parse(raw), None, hops),
            Location::Named { name, params } => {
                let idx = *self
                    .names
                    .get(name)
                    .ok_or_else(|| NavigationError::UnknownRouteName(name.clone()))?;
                let record = &self.records[idx];
                let path = record
                    .pattern
                    .fill(params)
                    .map_err(|param| NavigationError::MissingParam {
                        route: name.clone(),
                        param,
                    })?;
                let parts = LocationParts {
                    path,
                    ..Default::default()
                };
                if record.redirect.is_some() {
                    return self.resolve_parts(parts, None, hops);
                }
                let params = record
                    .pattern
                    .captures(&parts.path)
                    .unwrap_or_else(|| params.clone());
                Ok((self.build(idx, params, parts, None), hops))
            }
        }
    }

    fn find(&self, path: &str) -> Option<(usize, BTreeMap<String, String>)> {
        self.order.iter().find_map(|&idx| {
            self.records[idx]
                .pattern
                .captures(path)
                .map(|params| (idx, params))
        })
    }

    fn resolve_parts(
        &self,
        parts: LocationParts,
        redirected_from: Option<String>,
        hops: usize,
    ) -> NavigationResult<(ResolvedRoute, usize)> {
        let Some((idx, params)) = self.find(&parts.path) else {
            let route = ResolvedRoute {
                path: parts.path.clone(),
                full_path: parts.full_path(),
                name: None,
                params: BTreeMap::new(),
                query: parts.query,
                hash: parts.hash,
                matched: Vec::new(),
                redirected_from,
            };
            return Ok((route, hops));
        };

        let record = &self.records[idx];
        let Some(target) = &record.redirect else {
            return Ok((self.build(idx, params, parts, redirected_from), hops));
        };

        let origin = redirected_from.unwrap_or_else(|| parts.full_path());
        if hops >= MAX_REDIRECTS {
            return Err(NavigationError::RedirectLoop { from: origin });
        }
        let target =
            substitute_params(target, &params).map_err(|param| NavigationError::MissingParam {
                route: record.path().to_string(),
                param,
            })?;
        let mut next = LocationParts::parse(&target);
        if next.query.is_empty() {
            next.query = parts.query;
        }
        if next.hash.is_empty() {
            next.hash = parts.hash;
        }
        self.resolve_parts(next, Some(origin), hops + 1)
    }

    fn build(
        &self,
        idx: usize,
        params: BTreeMap<String, String>,
        parts: LocationParts,
        redirected_from: Option<String>,
    ) -> ResolvedRoute {
        let mut matched = Vec::new();
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            let record = &self.records[i];
            matched.push(record.to_matched());
            cursor = record.parent;
        }
        matched.reverse();

        ResolvedRoute {
            full_path: parts.full_path(),
            path: parts.path,
            name: self.records[idx].name.clone(),
            params,
            query: parts.query,
            hash: parts.hash,
            matched,
            redirected_from,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn matcher(fragments: &[RouteFragment]) -> RouteMatcher {
        RouteMatcher::compile(fragments).unwrap()
    }

    fn path(raw: &str) -> Location {
        Location::from(raw)
    }

    #[test]
    fn test_nested_routes_build_matched_chain() {
        let admin = RouteFragment::new("/admin", "AdminLayout")
            .with_meta("requiresAuth", json!(true))
            .with_child(RouteFragment::new("users", "AdminUsers").with_name("admin-users"))
            .with_child(RouteFragment::new("users/:id", "AdminUser"));
        let m = matcher(&[admin]);

        let route = m.resolve(&path("/admin/users/42?tab=posts")).unwrap();
        assert_eq!(route.matched.len(), 2);
        assert_eq!(route.matched[0].path, "/admin");
        assert_eq!(route.matched[1].path, "/admin/users/:id");
        assert_eq!(route.params.get("id").map(String::as_str), Some("42"));
        assert_eq!(route.query.get("tab").map(String::as_str), Some("posts"));
        assert!(route.meta_flag("requiresAuth"));
        assert_eq!(route.component(), Some(&ComponentRef::new("AdminUser")));

        let layout = m.resolve(&path("/admin")).unwrap();
        assert_eq!(layout.matched.len(), 1);
    }

    #[test]
    fn test_first_registered_path_wins() {
        let m = matcher(&[
            RouteFragment::new("/a", "FirstA"),
            RouteFragment::new("/A/", "SecondA"),
        ]);
        assert_eq!(m.len(), 1);
        let route = m.resolve(&path("/a")).unwrap();
        assert_eq!(route.component(), Some(&ComponentRef::new("FirstA")));
    }

    #[test]
    fn test_default_child_shadows_parent() {
        let m = matcher(&[RouteFragment::new("/users", "UsersLayout")
            .with_child(RouteFragment::new("", "UserList"))]);
        let route = m.resolve(&path("/users")).unwrap();
        assert_eq!(route.matched.len(), 2);
        assert_eq!(route.component(), Some(&ComponentRef::new("UserList")));
    }

    #[test]
    fn test_first_registered_name_wins() {
        let m = matcher(&[
            RouteFragment::new("/one", "One").with_name("dup"),
            RouteFragment::new("/two", "Two").with_name("dup"),
        ]);
        assert_eq!(m.by_name("dup").map(RouteRecord::path), Some("/one"));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_catch_all_matches_last() {
        let m = matcher(&[
            RouteFragment::new("*", "NotFound"),
            RouteFragment::new("/home", "Home"),
        ]);
        let home = m.resolve(&path("/home")).unwrap();
        assert_eq!(home.component(), Some(&ComponentRef::new("Home")));

        let missing = m.resolve(&path("/nowhere/else")).unwrap();
        assert_eq!(missing.component(), Some(&ComponentRef::new("NotFound")));
        assert_eq!(
            missing.params.get("pathMatch").map(String::as_str),
            Some("nowhere/else")
        );
    }

    #[test]
    fn test_unmatched_path_resolves_empty() {
        let m = matcher(&[RouteFragment::new("/home", "Home")]);
        let route = m.resolve(&path("/missing#frag")).unwrap();
        assert!(!route.is_matched());
        assert_eq!(route.full_path, "/missing#frag");
    }

    #[test]
    fn test_named_location() {
        let m = matcher(&[RouteFragment::new("/users/:id", "User").with_name("user")]);

        let route = m
            .resolve(&Location::named("user").with_param("id", "7"))
            .unwrap();
        assert_eq!(route.path, "/users/7");
        assert_eq!(route.name.as_deref(), Some("user"));

        assert!(matches!(
            m.resolve(&Location::named("user")),
            Err(NavigationError::MissingParam { .. })
        ));
        assert!(matches!(
            m.resolve(&Location::named("ghost")),
            Err(NavigationError::UnknownRouteName(_))
        ));
    }

    #[test]
    fn test_static_redirects() {
        let m = matcher(&[
            RouteFragment::redirect("/", "/home"),
            RouteFragment::redirect("/u/:id", "/users/:id"),
            RouteFragment::new("/home", "Home"),
            RouteFragment::new("/users/:id", "User"),
        ]);

        let home = m.resolve(&path("/?ref=mail")).unwrap();
        assert_eq!(home.path, "/home");
        assert_eq!(home.full_path, "/home?ref=mail");
        assert_eq!(home.redirected_from.as_deref(), Some("/?ref=mail"));

        let user = m.resolve(&path("/u/3")).unwrap();
        assert_eq!(user.path, "/users/3");
    }

    #[test]
    fn test_redirect_loop_is_rejected() {
        let m = matcher(&[
            RouteFragment::redirect("/ping", "/pong"),
            RouteFragment::redirect("/pong", "/ping"),
        ]);
        assert!(matches!(
            m.resolve(&path("/ping")),
            Err(NavigationError::RedirectLoop { .. })
        ));
    }
}

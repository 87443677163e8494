use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use waypost_api::{BoxError, NavigationService, RouteFragment, StoreError};
use waypost_core::AggregationError;
use waypost_core::config::AppConfig;
use waypost_plugin::{DynSlice, FeatureInfo, FeatureModule, RouteExport, SliceDefinition};
use waypost_runtime::{App, WaypostError, build_default_app};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Session {
    token: Option<String>,
}

fn auth_slice() -> Arc<dyn DynSlice> {
    Arc::new(
        SliceDefinition::new("auth", Session::default())
            .mutation("setToken", |s: &mut Session, token: Option<String>| s.token = token)
            .accessor("isAuthenticated", |s: &Session| s.token.is_some())
            .build(),
    )
}

struct AuthFeature;

impl FeatureModule for AuthFeature {
    fn info(&self) -> FeatureInfo {
        FeatureInfo::new("auth")
    }

    fn routes(&self) -> Result<RouteExport, BoxError> {
        Ok(RouteFragment::new("/login", "auth/Login").into())
    }

    fn slices(&self) -> Vec<Arc<dyn DynSlice>> {
        vec![auth_slice()]
    }
}

fn write_module(root: &Path, feature: &str, body: &str) {
    let dir = root.join(feature);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("router.json"), body).unwrap();
}

fn feature_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_module(dir.path(), "home", r#"{ "path": "/", "component": "home/Index" }"#);
    write_module(
        dir.path(),
        "admin",
        r#"{ "path": "/admin", "component": "admin/Index", "meta": { "requiresAuth": true } }"#,
    );
    dir
}

#[tokio::test]
async fn test_bootstrap_scans_registers_and_guards() {
    let dir = feature_tree();
    let config = AppConfig::default()
        .with_features_dir(dir.path())
        .with_base_path("/portal");
    let app = App::builder(config)
        .with_feature(Arc::new(AuthFeature))
        .build()
        .unwrap();

    let paths: Vec<_> = app.table().fragments().map(|f| f.path.as_str()).collect();
    assert_eq!(paths, vec!["/admin", "/", "/login"]);
    assert_eq!(app.store().names(), vec!["global", "auth"]);

    let route = app.start("/portal/admin").await.unwrap();
    assert_eq!(route.path, "/login");
    assert!(!app.global().is_loading().unwrap());

    app.store().commit("auth/setToken", Some("t0k3n")).unwrap();
    let route = app.router().push("/admin".into()).await.unwrap();
    assert_eq!(route.path, "/admin");
    assert_eq!(app.router().url_for(&route), "/portal/admin");
}

#[test]
fn test_duplicate_slice_halts_bootstrap() {
    let dir = feature_tree();
    let config = AppConfig::default().with_features_dir(dir.path());
    let result = App::builder(config)
        .with_slice(auth_slice())
        .with_feature(Arc::new(AuthFeature))
        .build();

    assert!(matches!(
        result,
        Err(WaypostError::Store(StoreError::DuplicateSlice(ref name))) if name == "auth"
    ));
}

#[test]
fn test_broken_module_halts_bootstrap() {
    let dir = feature_tree();
    write_module(dir.path(), "broken", r#"{ "path": "/broken", "#);

    let config = AppConfig::default().with_features_dir(dir.path());
    assert!(matches!(
        build_default_app(config),
        Err(WaypostError::Aggregation(AggregationError::Load { .. }))
    ));
}

#[test]
fn test_invalid_route_pattern_is_a_config_error() {
    let dir = feature_tree();
    let mut config = AppConfig::default().with_features_dir(dir.path());
    config.route_file_pattern = "(".to_string();
    assert!(matches!(
        build_default_app(config),
        Err(WaypostError::Config(_))
    ));
}

#[tokio::test]
async fn test_compiled_in_features_only() {
    let app = App::builder(AppConfig::default().with_features_dir("/nonexistent"))
        .without_scan()
        .with_feature(Arc::new(AuthFeature))
        .build()
        .unwrap();
    assert_eq!(app.table().len(), 1);
    let route = app.start("/login").await.unwrap();
    assert_eq!(route.component().map(|c| c.as_str()), Some("auth/Login"));
}

use std::sync::Arc;
use waypost_api::{
    AfterNavigationHook, ComponentLoader, NavigationGuard, NavigationResult, NavigationService,
    ResolvedRoute,
};
use waypost_core::config::AppConfig;
use waypost_core::features::{FeatureRegistry, FeatureScanner};
use waypost_core::guard::{DefaultGuard, LoadingIndicatorHook};
use waypost_core::router::{NavigationEngine, RouteTable, RouterAssembler};
use waypost_core::store::{GlobalModule, StateContainer, expose_for_diagnostics};
use waypost_plugin::{DynSlice, FeatureModule, FileNameMatcher};

pub use waypost_core::{Result, WaypostError};

/// A bootstrapped application: one state container, one router.
pub struct App {
    config: AppConfig,
    store: Arc<StateContainer>,
    global: GlobalModule,
    router: Arc<NavigationEngine>,
    table: RouteTable,
}

impl App {
    pub fn builder(config: AppConfig) -> AppBuilder {
        AppBuilder::new(config)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> Arc<StateContainer> {
        Arc::clone(&self.store)
    }

    pub fn global(&self) -> &GlobalModule {
        &self.global
    }

    pub fn router(&self) -> Arc<NavigationEngine> {
        Arc::clone(&self.router)
    }

    /// The aggregated route table the router was built from.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Run the initial navigation. The app becomes interactive after this.
    pub async fn start(&self, url: &str) -> NavigationResult<ResolvedRoute> {
        self.router.start(url).await
    }
}

/// Wires the container, the feature sources and the router together.
///
/// Order matters: slices are registered before any route is aggregated so a
/// duplicate slice stops bootstrap before the router exists, and the guard
/// is installed before the first navigation.
pub struct AppBuilder {
    config: AppConfig,
    registry: FeatureRegistry,
    slices: Vec<Arc<dyn DynSlice>>,
    loader: Option<Arc<dyn ComponentLoader>>,
    guard: Option<Arc<dyn NavigationGuard>>,
    after_hooks: Vec<Arc<dyn AfterNavigationHook>>,
    scan: bool,
    expose_diagnostics: bool,
}

impl AppBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            registry: FeatureRegistry::new(),
            slices: Vec::new(),
            loader: None,
            guard: None,
            after_hooks: Vec::new(),
            scan: true,
            expose_diagnostics: false,
        }
    }

    pub fn with_feature(mut self, module: Arc<dyn FeatureModule>) -> Self {
        self.registry.register(module);
        self
    }

    pub fn with_slice(mut self, slice: Arc<dyn DynSlice>) -> Self {
        self.slices.push(slice);
        self
    }

    pub fn with_loader(mut self, loader: Arc<dyn ComponentLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Replace the default auth/loading guard.
    pub fn with_guard(mut self, guard: Arc<dyn NavigationGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    pub fn with_after_hook(mut self, hook: Arc<dyn AfterNavigationHook>) -> Self {
        self.after_hooks.push(hook);
        self
    }

    /// Only use compiled-in feature modules, skip the directory scan.
    pub fn without_scan(mut self) -> Self {
        self.scan = false;
        self
    }

    pub fn expose_diagnostics(mut self) -> Self {
        self.expose_diagnostics = true;
        self
    }

    pub fn build(self) -> Result<App> {
        let store = Arc::new(StateContainer::new());
        let global = GlobalModule::register(&store)?;
        for slice in self.slices {
            store.register(slice)?;
        }
        for (info, slice) in self.registry.collect_slices() {
            tracing::debug!("Feature {} registers slice '{}'", info.id, slice.name());
            store.register(slice)?;
        }

        let mut table = RouteTable::new();
        if self.scan {
            let matcher = FileNameMatcher::new(&self.config.route_file_pattern)?;
            let scan = FeatureScanner::new(&self.config.features_dir)
                .with_matcher(Arc::new(matcher))
                .scan()?;
            table.extend_scanned(scan);
        }
        table.extend_features(self.registry.collect_routes()?);

        let guard = self.guard.unwrap_or_else(|| {
            Arc::new(DefaultGuard::new(
                Arc::clone(&store),
                self.config.auth.clone(),
            ))
        });
        let mut assembler = RouterAssembler::new(&self.config)
            .with_guard(guard)
            .with_after_hook(Arc::new(LoadingIndicatorHook::new(Arc::clone(&store))));
        if let Some(loader) = self.loader {
            assembler = assembler.with_loader(loader);
        }
        for hook in self.after_hooks {
            assembler = assembler.with_after_hook(hook);
        }
        let router = assembler.assemble(&table)?;

        if self.expose_diagnostics && !expose_for_diagnostics(Arc::clone(&store)) {
            tracing::warn!("A state container is already exposed for diagnostics");
        }

        tracing::info!(
            "Bootstrap complete: {} route fragments, {} state slices",
            table.len(),
            store.len()
        );
        Ok(App {
            config: self.config,
            store,
            global,
            router: Arc::new(router),
            table,
        })
    }
}

/// Bootstraps an app from configuration alone: scanned routes, default guard.
pub fn build_default_app(config: AppConfig) -> Result<App> {
    AppBuilder::new(config).build()
}

/// Initializes the logging system for a specific component.
/// This delegates to the core logging module.
pub fn init_logging(component: &str, to_stderr: bool) -> impl Drop {
    waypost_core::logging::init_logging(component, to_stderr)
}

use super::components::ImmediateLoader;
use super::engine::{EngineOptions, NavigationEngine};
use super::matcher::RouteMatcher;
use super::table::RouteTable;
use crate::config::AppConfig;
use crate::error::Result;
use crate::guard::AllowAll;
use std::sync::Arc;
use tracing::info;
use waypost_api::{AfterNavigationHook, ComponentLoader, NavigationGuard};

/// Turns a route table into a configured navigation engine.
///
/// The assembler owns no matching logic. It fixes the record order, applies
/// the deployment base path and installs the single global guard before
/// anything can navigate.
pub struct RouterAssembler {
    options: EngineOptions,
    loader: Arc<dyn ComponentLoader>,
    guard: Arc<dyn NavigationGuard>,
    after_hooks: Vec<Arc<dyn AfterNavigationHook>>,
}

impl RouterAssembler {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            options: EngineOptions {
                base_path: config.base_path.clone(),
            },
            loader: Arc::new(ImmediateLoader),
            guard: Arc::new(AllowAll),
            after_hooks: Vec::new(),
        }
    }

    pub fn with_loader(mut self, loader: Arc<dyn ComponentLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_guard(mut self, guard: Arc<dyn NavigationGuard>) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_after_hook(mut self, hook: Arc<dyn AfterNavigationHook>) -> Self {
        self.after_hooks.push(hook);
        self
    }

    pub fn assemble(self, table: &RouteTable) -> Result<NavigationEngine> {
        let matcher = RouteMatcher::compile(table.fragments())?;
        info!(
            "Assembled router: {} fragments, {} records, base '{}'",
            table.len(),
            matcher.len(),
            self.options.base_path
        );

        let engine = NavigationEngine::new(matcher, self.loader, self.options);
        engine.install_guard(self.guard)?;
        for hook in self.after_hooks {
            engine.add_after_hook(hook);
        }
        Ok(engine)
    }
}

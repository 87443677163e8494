//! The navigation engine.
//!
//! Every attempt gets a transition id and a cancellation token. Starting a
//! new attempt cancels the token of the one still pending, so only the latest
//! decision can ever commit. Guard calls are serialized: attempt N+1 waits
//! for the serial lock until attempt N has settled.

use super::components::ComponentCache;
use super::history::PathHistory;
use super::matcher::{MAX_REDIRECTS, RouteMatcher, RouteRecord};
use async_trait::async_trait;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use waypost_api::{
    AfterNavigationHook, ComponentLoader, GuardDecision, LoadedComponent, Location,
    NavigationError, NavigationGuard, NavigationResult, NavigationService, NavigationTransition,
    ResolvedRoute,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Initial,
    Push,
    Replace,
    Back,
}

#[derive(Debug, Clone, Default)]
pub struct EngineOptions {
    /// Normalized base path, empty for the site root.
    pub base_path: String,
}

pub struct NavigationEngine {
    matcher: RouteMatcher,
    components: ComponentCache,
    guard: OnceLock<Arc<dyn NavigationGuard>>,
    after_hooks: RwLock<Vec<Arc<dyn AfterNavigationHook>>>,
    history: Mutex<PathHistory>,
    started: AtomicBool,
    next_id: AtomicU64,
    serial: tokio::sync::Mutex<()>,
    pending: Mutex<Option<(u64, CancellationToken)>>,
    route_tx: watch::Sender<ResolvedRoute>,
}

impl NavigationEngine {
    pub fn new(
        matcher: RouteMatcher,
        loader: Arc<dyn ComponentLoader>,
        options: EngineOptions,
    ) -> Self {
        let (route_tx, _) = watch::channel(ResolvedRoute::start());
        Self {
            matcher,
            components: ComponentCache::new(loader),
            guard: OnceLock::new(),
            after_hooks: RwLock::new(Vec::new()),
            history: Mutex::new(PathHistory::new(options.base_path)),
            started: AtomicBool::new(false),
            next_id: AtomicU64::new(0),
            serial: tokio::sync::Mutex::new(()),
            pending: Mutex::new(None),
            route_tx,
        }
    }

    /// Install the global pre-navigation guard. Only one guard is allowed and
    /// only before the initial navigation.
    pub fn install_guard(&self, guard: Arc<dyn NavigationGuard>) -> NavigationResult<()> {
        if self.is_started() {
            return Err(NavigationError::AlreadyStarted);
        }
        self.guard
            .set(guard)
            .map_err(|_| NavigationError::GuardAlreadyInstalled)
    }

    pub fn has_guard(&self) -> bool {
        self.guard.get().is_some()
    }

    pub fn add_after_hook(&self, hook: Arc<dyn AfterNavigationHook>) {
        self.after_hooks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(hook);
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Records in match priority order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteRecord> {
        self.matcher.records()
    }

    pub fn subscribe_route(&self) -> watch::Receiver<ResolvedRoute> {
        self.route_tx.subscribe()
    }

    pub fn base_path(&self) -> String {
        self.history().base().to_string()
    }

    pub fn url_for(&self, route: &ResolvedRoute) -> String {
        self.history().url_for(&route.full_path)
    }

    pub fn history_entries(&self) -> Vec<String> {
        self.history().entries().to_vec()
    }

    /// Loaded view of the innermost matched component of the current route.
    pub fn current_view(&self) -> Option<LoadedComponent> {
        let route = self.current_route();
        route.component().and_then(|c| self.components.cached(c))
    }

    fn history(&self) -> MutexGuard<'_, PathHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn navigate(
        &self,
        location: Location,
        mode: HistoryMode,
    ) -> NavigationResult<ResolvedRoute> {
        let (target, hops) = self.matcher.resolve_counted(&location, 0)?;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let token = CancellationToken::new();
        {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some((previous, stale)) = pending.replace((id, token.clone())) {
                debug!("Navigation {} superseded by {}", previous, id);
                stale.cancel();
            }
        }

        let mut transition = NavigationTransition {
            id,
            from: self.current_route(),
            to: target,
        };
        let serial = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            lock = self.serial.lock() => Some(lock),
        };
        let outcome = if serial.is_some() {
            // The route may have moved while this attempt was queued.
            transition.from = self.current_route();
            self.run(&mut transition, hops, mode, &token).await
        } else {
            Err(superseded(&transition))
        };

        {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            if matches!(pending.as_ref(), Some((current, _)) if *current == id) {
                pending.take();
            }
        }

        // Hooks run before the next queued attempt can reach its guard.
        self.run_after_hooks(&transition, outcome.as_ref().err());
        drop(serial);
        outcome
    }

    async fn run(
        &self,
        transition: &mut NavigationTransition,
        mut hops: usize,
        mode: HistoryMode,
        token: &CancellationToken,
    ) -> NavigationResult<ResolvedRoute> {
        // Static and guard redirects share one hop budget.
        loop {
            if !transition.is_initial() && transition.to.same_location(&transition.from) {
                return Err(NavigationError::Duplicated {
                    to: transition.to.full_path.clone(),
                });
            }

            let decision = tokio::select! {
                biased;
                _ = token.cancelled() => return Err(superseded(transition)),
                decision = self.run_guard(transition) => decision,
            };

            match decision {
                Err(reason) => {
                    warn!(
                        "Navigation guard failed for {}: {}",
                        transition.to.full_path, reason
                    );
                    return Err(NavigationError::GuardFailed {
                        to: transition.to.full_path.clone(),
                        reason,
                    });
                }
                Ok(GuardDecision::Abort) => {
                    debug!("Navigation to {} aborted", transition.to.full_path);
                    return Err(NavigationError::Aborted {
                        to: transition.to.full_path.clone(),
                    });
                }
                Ok(GuardDecision::Redirect(path)) => {
                    let origin = transition
                        .to
                        .redirected_from
                        .clone()
                        .unwrap_or_else(|| transition.to.full_path.clone());
                    if hops >= MAX_REDIRECTS {
                        return Err(NavigationError::RedirectLoop { from: origin });
                    }
                    debug!("Navigation {} redirected to {}", transition.id, path);
                    let (mut next, taken) =
                        self.matcher.resolve_counted(&Location::Path(path), hops + 1)?;
                    next.redirected_from = Some(origin);
                    hops = taken;
                    transition.to = next;
                }
                Ok(GuardDecision::Proceed) => break,
            }
        }

        tokio::select! {
            biased;
            _ = token.cancelled() => return Err(superseded(transition)),
            loaded = self.load_components(&transition.to) => loaded?,
        };

        if token.is_cancelled() {
            return Err(superseded(transition));
        }
        let route = transition.to.clone();
        self.commit(route.clone(), mode);
        Ok(route)
    }

    async fn run_guard(&self, transition: &NavigationTransition) -> Result<GuardDecision, String> {
        let Some(guard) = self.guard.get() else {
            return Ok(GuardDecision::Proceed);
        };
        match AssertUnwindSafe(guard.before_each(transition))
            .catch_unwind()
            .await
        {
            Ok(Ok(decision)) => Ok(decision),
            Ok(Err(err)) => Err(err.to_string()),
            Err(panic) => Err(format!("guard panicked: {}", panic_message(&*panic))),
        }
    }

    async fn load_components(&self, route: &ResolvedRoute) -> NavigationResult<()> {
        for component in route.matched.iter().filter_map(|r| r.component.as_ref()) {
            self.components.load(component).await.map_err(|e| {
                NavigationError::ComponentLoad {
                    component: component.to_string(),
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(())
    }

    fn commit(&self, route: ResolvedRoute, mode: HistoryMode) {
        {
            let mut history = self.history();
            let entry = route.full_path.clone();
            match mode {
                HistoryMode::Initial | HistoryMode::Replace => history.replace(entry),
                HistoryMode::Push => history.push(entry),
                HistoryMode::Back => history.back(entry),
            }
        }
        info!("Navigated to {}", route.full_path);
        self.route_tx.send_replace(route);
    }

    fn run_after_hooks(&self, transition: &NavigationTransition, failure: Option<&NavigationError>) {
        let hooks = self
            .after_hooks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for hook in hooks {
            hook.after_each(transition, failure);
        }
    }

    fn ensure_started(&self) -> NavigationResult<()> {
        if self.is_started() {
            Ok(())
        } else {
            Err(NavigationError::NotStarted)
        }
    }
}

fn superseded(transition: &NavigationTransition) -> NavigationError {
    NavigationError::Superseded {
        to: transition.to.full_path.clone(),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[async_trait]
impl NavigationService for NavigationEngine {
    async fn start(&self, url: &str) -> NavigationResult<ResolvedRoute> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(NavigationError::AlreadyStarted);
        }
        let path = self.history().strip_base(url);
        self.navigate(Location::Path(path), HistoryMode::Initial)
            .await
    }

    async fn push(&self, location: Location) -> NavigationResult<ResolvedRoute> {
        self.ensure_started()?;
        self.navigate(location, HistoryMode::Push).await
    }

    async fn replace(&self, location: Location) -> NavigationResult<ResolvedRoute> {
        self.ensure_started()?;
        self.navigate(location, HistoryMode::Replace).await
    }

    async fn back(&self) -> NavigationResult<ResolvedRoute> {
        self.ensure_started()?;
        let previous = self
            .history()
            .previous()
            .map(str::to_string)
            .ok_or(NavigationError::NoHistory)?;
        self.navigate(Location::Path(previous), HistoryMode::Back)
            .await
    }

    fn resolve(&self, location: &Location) -> NavigationResult<ResolvedRoute> {
        self.matcher.resolve(location)
    }

    fn current_route(&self) -> ResolvedRoute {
        self.route_tx.borrow().clone()
    }
}

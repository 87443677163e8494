use crate::error::NavigationResult;
use crate::models::{Location, ResolvedRoute};
use async_trait::async_trait;

/// Navigation surface shared by the engine and anything wrapping it.
///
/// Every method that moves the current route runs the global guard first and
/// only commits once it resolved to `Proceed`.
#[async_trait]
pub trait NavigationService: Send + Sync {
    /// Run the initial navigation for `url` (base path included).
    async fn start(&self, url: &str) -> NavigationResult<ResolvedRoute>;

    /// Navigate and add a history entry.
    async fn push(&self, location: Location) -> NavigationResult<ResolvedRoute>;

    /// Navigate and replace the current history entry.
    async fn replace(&self, location: Location) -> NavigationResult<ResolvedRoute>;

    /// Navigate to the previous history entry.
    async fn back(&self) -> NavigationResult<ResolvedRoute>;

    /// Resolve a location against the route table without navigating.
    fn resolve(&self, location: &Location) -> NavigationResult<ResolvedRoute>;

    fn current_route(&self) -> ResolvedRoute;
}

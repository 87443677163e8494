use crate::error::{BoxError, NavigationError};
use crate::models::{GuardDecision, NavigationTransition};
use async_trait::async_trait;

/// Hook run before every route transition, the initial one included.
///
/// The engine awaits the returned future before committing anything. An `Err`
/// (or a panic) is treated as [`GuardDecision::Abort`]; the previous route
/// stays current.
#[async_trait]
pub trait NavigationGuard: Send + Sync {
    async fn before_each(&self, transition: &NavigationTransition)
    -> Result<GuardDecision, BoxError>;
}

/// Hook run once a navigation attempt settles, whatever the outcome.
pub trait AfterNavigationHook: Send + Sync {
    fn after_each(&self, transition: &NavigationTransition, failure: Option<&NavigationError>);
}

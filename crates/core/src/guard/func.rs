use async_trait::async_trait;
use std::future::Future;
use waypost_api::{BoxError, GuardDecision, NavigationGuard, NavigationTransition};

/// Adapts an async closure into a [`NavigationGuard`]. The closure receives
/// an owned copy of the transition so its future can be `'static`.
pub struct FnGuard<F> {
    f: F,
}

impl<F, Fut> FnGuard<F>
where
    F: Fn(NavigationTransition) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GuardDecision, BoxError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> NavigationGuard for FnGuard<F>
where
    F: Fn(NavigationTransition) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<GuardDecision, BoxError>> + Send + 'static,
{
    async fn before_each(
        &self,
        transition: &NavigationTransition,
    ) -> Result<GuardDecision, BoxError> {
        (self.f)(transition.clone()).await
    }
}

/// Lets every navigation through.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllowAll;

#[async_trait]
impl NavigationGuard for AllowAll {
    async fn before_each(
        &self,
        _transition: &NavigationTransition,
    ) -> Result<GuardDecision, BoxError> {
        Ok(GuardDecision::Proceed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypost_api::ResolvedRoute;

    #[tokio::test]
    async fn test_fn_guard_sees_transition() {
        let guard = FnGuard::new(|t: NavigationTransition| async move {
            if t.id % 2 == 0 {
                Ok::<_, BoxError>(GuardDecision::Abort)
            } else {
                Ok(GuardDecision::Proceed)
            }
        });
        let mut transition = NavigationTransition {
            id: 1,
            from: ResolvedRoute::start(),
            to: ResolvedRoute::start(),
        };
        assert_eq!(
            guard.before_each(&transition).await.unwrap(),
            GuardDecision::Proceed
        );
        transition.id = 2;
        assert_eq!(
            guard.before_each(&transition).await.unwrap(),
            GuardDecision::Abort
        );
    }
}

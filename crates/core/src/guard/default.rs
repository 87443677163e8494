use crate::config::AuthConfig;
use crate::store::StateContainer;
use crate::store::global::{GLOBAL_SLICE, SET_LOADING};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};
use waypost_api::{BoxError, GuardDecision, NavigationGuard, NavigationTransition, StoreError};

/// The guard installed when the app does not bring its own.
///
/// Raises the global loading flag for every attempt and sends anonymous users
/// away from protected routes to the login page. Protection is a meta flag on
/// any matched record, so nested routes inherit it from their parents.
pub struct DefaultGuard {
    store: Arc<StateContainer>,
    auth: AuthConfig,
}

impl DefaultGuard {
    pub fn new(store: Arc<StateContainer>, auth: AuthConfig) -> Self {
        Self { store, auth }
    }

    /// A missing auth slice counts as signed out.
    fn is_authenticated(&self) -> Result<bool, StoreError> {
        let path = format!("{}/{}", self.auth.slice, self.auth.accessor);
        match self.store.get_as::<bool>(&path) {
            Ok(value) => Ok(value),
            Err(StoreError::UnknownSlice(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    fn login_location(&self, target: &str) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("redirect", target)
            .finish();
        format!("{}?{}", self.auth.login_path, query)
    }
}

#[async_trait]
impl NavigationGuard for DefaultGuard {
    async fn before_each(
        &self,
        transition: &NavigationTransition,
    ) -> Result<GuardDecision, BoxError> {
        if let Err(err) = self
            .store
            .commit(&format!("{GLOBAL_SLICE}/{SET_LOADING}"), true)
        {
            warn!("Could not raise the loading flag: {}", err);
        }

        let to = &transition.to;
        if !to.meta_flag(&self.auth.meta_key) || to.path == self.auth.login_path {
            return Ok(GuardDecision::Proceed);
        }
        if self.is_authenticated()? {
            return Ok(GuardDecision::Proceed);
        }

        debug!("{} requires authentication, redirecting to login", to.full_path);
        Ok(GuardDecision::Redirect(self.login_location(&to.full_path)))
    }
}

use super::resolved::ResolvedRoute;
use serde::{Deserialize, Serialize};

/// One navigation attempt, handed to the guard and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationTransition {
    /// Monotonic per engine. Redirect hops keep the id of the attempt that
    /// started them.
    pub id: u64,
    pub from: ResolvedRoute,
    pub to: ResolvedRoute,
}

impl NavigationTransition {
    pub fn is_initial(&self) -> bool {
        self.from.is_start()
    }
}

/// What the global guard wants done with a transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuardDecision {
    Proceed,
    Redirect(String),
    Abort,
}

use crate::error::BoxError;
use crate::models::ComponentRef;
use async_trait::async_trait;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A view component after its lazy load completed.
#[derive(Clone)]
pub struct LoadedComponent {
    pub id: ComponentRef,
    pub view: Arc<dyn Any + Send + Sync>,
}

impl LoadedComponent {
    pub fn new(id: ComponentRef, view: Arc<dyn Any + Send + Sync>) -> Self {
        Self { id, view }
    }

    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.view.downcast_ref::<T>()
    }
}

impl fmt::Debug for LoadedComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedComponent")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}

/// Resolves a [`ComponentRef`] into something renderable.
#[async_trait]
pub trait ComponentLoader: Send + Sync {
    async fn load(&self, component: &ComponentRef) -> Result<LoadedComponent, BoxError>;
}

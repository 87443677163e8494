//! Lazy view components.

use async_trait::async_trait;
use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::debug;
use waypost_api::{BoxError, ComponentLoader, ComponentRef, LoadedComponent};

/// Memoizes a loader so each component is loaded at most once per engine.
pub struct ComponentCache {
    loader: Arc<dyn ComponentLoader>,
    loaded: Mutex<HashMap<ComponentRef, LoadedComponent>>,
}

impl ComponentCache {
    pub fn new(loader: Arc<dyn ComponentLoader>) -> Self {
        Self {
            loader,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub async fn load(&self, component: &ComponentRef) -> Result<LoadedComponent, BoxError> {
        if let Some(hit) = self.cached(component) {
            return Ok(hit);
        }

        let loaded = self.loader.load(component).await?;
        debug!("Loaded component {}", component);
        self.entries()
            .entry(component.clone())
            .or_insert_with(|| loaded.clone());
        Ok(loaded)
    }

    pub fn cached(&self, component: &ComponentRef) -> Option<LoadedComponent> {
        self.entries().get(component).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<ComponentRef, LoadedComponent>> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Loader that hands back the component id as its view. Useful where only
/// the route table matters (CLI, tests).
#[derive(Debug, Default, Clone, Copy)]
pub struct ImmediateLoader;

#[async_trait]
impl ComponentLoader for ImmediateLoader {
    async fn load(&self, component: &ComponentRef) -> Result<LoadedComponent, BoxError> {
        Ok(LoadedComponent::new(
            component.clone(),
            Arc::new(component.to_string()),
        ))
    }
}

/// Strict loader over a fixed set of views. Unknown ids fail the navigation.
#[derive(Default, Clone)]
pub struct ComponentRegistry {
    views: HashMap<ComponentRef, Arc<dyn Any + Send + Sync>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<T: Any + Send + Sync>(mut self, id: impl Into<ComponentRef>, view: T) -> Self {
        self.views.insert(id.into(), Arc::new(view));
        self
    }

    pub fn contains(&self, id: &ComponentRef) -> bool {
        self.views.contains_key(id)
    }
}

#[async_trait]
impl ComponentLoader for ComponentRegistry {
    async fn load(&self, component: &ComponentRef) -> Result<LoadedComponent, BoxError> {
        let view = self
            .views
            .get(component)
            .cloned()
            .ok_or_else(|| format!("component '{component}' is not registered"))?;
        Ok(LoadedComponent::new(component.clone(), view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLoader(AtomicUsize);

    #[async_trait]
    impl ComponentLoader for CountingLoader {
        async fn load(&self, component: &ComponentRef) -> Result<LoadedComponent, BoxError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            ImmediateLoader.load(component).await
        }
    }

    #[tokio::test]
    async fn test_cache_loads_once() {
        let loader = Arc::new(CountingLoader(AtomicUsize::new(0)));
        let cache = ComponentCache::new(loader.clone());
        let id = ComponentRef::new("Home");

        cache.load(&id).await.unwrap();
        let second = cache.load(&id).await.unwrap();
        assert_eq!(loader.0.load(Ordering::SeqCst), 1);
        assert_eq!(second.downcast::<String>().map(String::as_str), Some("Home"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_survives_poisoned_lock() {
        let cache = Arc::new(ComponentCache::new(Arc::new(ImmediateLoader)));
        let id = ComponentRef::new("Home");
        cache.load(&id).await.unwrap();

        let poisoner = cache.clone();
        let _ = std::thread::spawn(move || {
            let _held = poisoner.loaded.lock().unwrap();
            panic!("poison the component map");
        })
        .join();

        assert!(cache.loaded.is_poisoned());
        assert!(cache.cached(&id).is_some());
        cache.load(&ComponentRef::new("About")).await.unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_registry_is_strict() {
        let registry = ComponentRegistry::new().with("Home", 42u32);
        let home = registry.load(&ComponentRef::new("Home")).await.unwrap();
        assert_eq!(home.downcast::<u32>(), Some(&42));
        assert!(registry.load(&ComponentRef::new("Missing")).await.is_err());
    }
}

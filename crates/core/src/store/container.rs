//! Process-wide state container.
//!
//! Slices are registered once at bootstrap and live until the process
//! exits. The container holds the only shared mutable state in the app;
//! every read goes through an accessor and every write through a mutation.

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info};
use waypost_api::{StoreError, StoreResult};
use waypost_plugin::{DynSlice, MutationObserver, MutationRecord, SliceDefinition, SliceHandle};

const EVENT_CAPACITY: usize = 256;

/// Forwards slice commits to the container's broadcast channel.
struct BroadcastObserver {
    tx: broadcast::Sender<MutationRecord>,
}

impl MutationObserver for BroadcastObserver {
    fn on_commit(&self, record: &MutationRecord) {
        // No subscribers is fine.
        let _ = self.tx.send(record.clone());
    }
}

pub struct StateContainer {
    slices: RwLock<IndexMap<String, Arc<dyn DynSlice>>>,
    observer: Arc<BroadcastObserver>,
}

impl Default for StateContainer {
    fn default() -> Self {
        Self::new()
    }
}

impl StateContainer {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            slices: RwLock::new(IndexMap::new()),
            observer: Arc::new(BroadcastObserver { tx }),
        }
    }

    /// Register a slice under its own name. A second slice with the same name
    /// is rejected and the first one stays registered unchanged.
    pub fn register(&self, slice: Arc<dyn DynSlice>) -> StoreResult<()> {
        let name = slice.name().to_string();
        {
            let mut slices = self.slices.write().unwrap_or_else(PoisonError::into_inner);
            if slices.contains_key(&name) {
                return Err(StoreError::DuplicateSlice(name));
            }
            slices.insert(name.clone(), Arc::clone(&slice));
        }
        slice.attach_observer(self.observer.clone());
        info!(
            "Registered state slice '{}' (mutations: {:?}, accessors: {:?})",
            name,
            slice.mutations(),
            slice.accessors()
        );
        Ok(())
    }

    /// Build and register a slice definition, returning its typed handle.
    pub fn register_definition<S>(&self, definition: SliceDefinition<S>) -> StoreResult<SliceHandle<S>>
    where
        S: Clone + Serialize + Send + Sync + 'static,
    {
        let handle = SliceHandle::new(Arc::new(definition.build()));
        self.register(handle.as_dyn())?;
        Ok(handle)
    }

    pub fn get_slice(&self, name: &str) -> StoreResult<Arc<dyn DynSlice>> {
        self.slices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
            .ok_or_else(|| StoreError::UnknownSlice(name.to_string()))
    }

    pub fn handle<S>(&self, name: &str) -> StoreResult<SliceHandle<S>>
    where
        S: Clone + Serialize + Send + Sync + 'static,
    {
        SliceHandle::downcast(self.get_slice(name)?)
    }

    /// Run a namespaced mutation, e.g. `commit("global/setLoading", true)`.
    pub fn commit<P: Serialize>(&self, path: &str, payload: P) -> StoreResult<()> {
        let (slice, mutation) = split_path(path)?;
        let payload = serde_json::to_value(payload).map_err(|e| StoreError::Payload {
            slice: slice.to_string(),
            entry: mutation.to_string(),
            reason: e.to_string(),
        })?;
        debug!("commit {}", path);
        self.get_slice(slice)?.commit(mutation, payload)
    }

    /// Evaluate a namespaced accessor, e.g. `get("global/getLoading")`.
    pub fn get(&self, path: &str) -> StoreResult<Value> {
        let (slice, accessor) = split_path(path)?;
        self.get_slice(slice)?.get(accessor)
    }

    pub fn get_as<T: DeserializeOwned>(&self, path: &str) -> StoreResult<T> {
        let (slice, accessor) = split_path(path)?;
        let value = self.get(path)?;
        serde_json::from_value(value).map_err(|e| StoreError::Payload {
            slice: slice.to_string(),
            entry: accessor.to_string(),
            reason: e.to_string(),
        })
    }

    /// Commit notifications from every registered slice.
    pub fn subscribe(&self) -> broadcast::Receiver<MutationRecord> {
        self.observer.tx.subscribe()
    }

    /// Every slice's fields keyed by slice name, in registration order.
    pub fn snapshot(&self) -> Value {
        let slices = self.slices.read().unwrap_or_else(PoisonError::into_inner);
        let map = slices
            .iter()
            .map(|(name, slice)| (name.clone(), slice.snapshot()))
            .collect::<serde_json::Map<_, _>>();
        Value::Object(map)
    }

    pub fn names(&self) -> Vec<String> {
        self.slices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slices
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.slices.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn split_path(path: &str) -> StoreResult<(&str, &str)> {
    match path.split_once('/') {
        Some((slice, entry)) if !slice.is_empty() && !entry.is_empty() && !entry.contains('/') => {
            Ok((slice, entry))
        }
        _ => Err(StoreError::InvalidPath(path.to_string())),
    }
}

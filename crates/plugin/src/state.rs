//! Declarative state slices.
//!
//! A slice is declared once with its initial fields, its mutation entry points
//! and its accessors, then handed to the state container. Fields are private
//! to the slice: the only way in is a mutation, the only way out an accessor.

use indexmap::IndexMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use waypost_api::{BoxError, StoreError, StoreResult};

type MutationFn<S> = Arc<dyn Fn(&mut S, Value) -> Result<(), MutationFailure> + Send + Sync>;
type AccessorFn<S> = Arc<dyn Fn(&S) -> Result<Value, String> + Send + Sync>;

enum MutationFailure {
    Payload(String),
    Rejected(String),
}

/// Emitted after every successful commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MutationRecord {
    pub slice: String,
    pub mutation: String,
    pub payload: Value,
}

/// Receives commit notifications from every slice it is attached to.
pub trait MutationObserver: Send + Sync {
    fn on_commit(&self, record: &MutationRecord);
}

/// Builder for a named slice over state type `S`.
pub struct SliceDefinition<S> {
    name: String,
    initial: S,
    mutations: IndexMap<String, MutationFn<S>>,
    accessors: IndexMap<String, AccessorFn<S>>,
}

impl<S> SliceDefinition<S>
where
    S: Clone + Serialize + Send + Sync + 'static,
{
    pub fn new(name: impl Into<String>, initial: S) -> Self {
        Self {
            name: name.into(),
            initial,
            mutations: IndexMap::new(),
            accessors: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare an infallible mutation taking a payload of type `P`.
    pub fn mutation<P, F>(self, name: impl Into<String>, apply: F) -> Self
    where
        P: DeserializeOwned + 'static,
        F: Fn(&mut S, P) + Send + Sync + 'static,
    {
        self.try_mutation(name, move |state: &mut S, payload: P| {
            apply(state, payload);
            Ok(())
        })
    }

    /// Declare a mutation that may reject its payload. A rejected mutation
    /// leaves the committed fields untouched.
    pub fn try_mutation<P, F>(mut self, name: impl Into<String>, apply: F) -> Self
    where
        P: DeserializeOwned + 'static,
        F: Fn(&mut S, P) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        let wrapped: MutationFn<S> = Arc::new(move |state: &mut S, payload: Value| {
            let payload: P = serde_json::from_value(payload)
                .map_err(|e| MutationFailure::Payload(e.to_string()))?;
            apply(state, payload).map_err(|e| MutationFailure::Rejected(e.to_string()))
        });
        self.mutations.insert(name.into(), wrapped);
        self
    }

    /// Declare a derived read-only accessor.
    pub fn accessor<T, F>(mut self, name: impl Into<String>, read: F) -> Self
    where
        T: Serialize,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        let wrapped: AccessorFn<S> =
            Arc::new(move |state: &S| serde_json::to_value(read(state)).map_err(|e| e.to_string()));
        self.accessors.insert(name.into(), wrapped);
        self
    }

    pub fn build(self) -> Slice<S> {
        Slice {
            name: self.name,
            state: RwLock::new(self.initial),
            mutations: self.mutations,
            accessors: self.accessors,
            observer: OnceLock::new(),
        }
    }
}

/// A built slice. Shared behind `Arc` once registered.
pub struct Slice<S> {
    name: String,
    state: RwLock<S>,
    mutations: IndexMap<String, MutationFn<S>>,
    accessors: IndexMap<String, AccessorFn<S>>,
    observer: OnceLock<Arc<dyn MutationObserver>>,
}

impl<S> Slice<S>
where
    S: Clone + Serialize + Send + Sync + 'static,
{
    fn apply(&self, mutation: &str, payload: Value) -> StoreResult<()> {
        let apply = self
            .mutations
            .get(mutation)
            .ok_or_else(|| StoreError::UnknownMutation {
                slice: self.name.clone(),
                mutation: mutation.to_string(),
            })?;

        let record_payload = payload.clone();
        {
            // Readers wait on the lock; the committed value is swapped only
            // once the mutation succeeded on a copy.
            let mut committed = self.state.write().unwrap_or_else(PoisonError::into_inner);
            let mut next = committed.clone();
            apply(&mut next, payload).map_err(|failure| match failure {
                MutationFailure::Payload(reason) => StoreError::Payload {
                    slice: self.name.clone(),
                    entry: mutation.to_string(),
                    reason,
                },
                MutationFailure::Rejected(reason) => StoreError::MutationFailed {
                    slice: self.name.clone(),
                    mutation: mutation.to_string(),
                    reason,
                },
            })?;
            *committed = next;
        }

        if let Some(observer) = self.observer.get() {
            observer.on_commit(&MutationRecord {
                slice: self.name.clone(),
                mutation: mutation.to_string(),
                payload: record_payload,
            });
        }
        Ok(())
    }

    fn read(&self, accessor: &str) -> StoreResult<Value> {
        let read = self
            .accessors
            .get(accessor)
            .ok_or_else(|| StoreError::UnknownAccessor {
                slice: self.name.clone(),
                accessor: accessor.to_string(),
            })?;
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        read(&state).map_err(|reason| StoreError::Payload {
            slice: self.name.clone(),
            entry: accessor.to_string(),
            reason,
        })
    }
}

/// Type-erased view of a slice, as stored by the container.
pub trait DynSlice: Send + Sync {
    fn name(&self) -> &str;

    /// Run a mutation entry point with a JSON payload.
    fn commit(&self, mutation: &str, payload: Value) -> StoreResult<()>;

    /// Evaluate an accessor against the latest committed fields.
    fn get(&self, accessor: &str) -> StoreResult<Value>;

    fn mutations(&self) -> Vec<&str>;

    fn accessors(&self) -> Vec<&str>;

    /// Serialized fields, for diagnostic tooling only.
    fn snapshot(&self) -> Value;

    /// Attach the commit observer. Only the first attachment takes effect.
    fn attach_observer(&self, observer: Arc<dyn MutationObserver>);

    fn state_type(&self) -> &'static str;

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<S> DynSlice for Slice<S>
where
    S: Clone + Serialize + Send + Sync + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn commit(&self, mutation: &str, payload: Value) -> StoreResult<()> {
        self.apply(mutation, payload)
    }

    fn get(&self, accessor: &str) -> StoreResult<Value> {
        self.read(accessor)
    }

    fn mutations(&self) -> Vec<&str> {
        self.mutations.keys().map(String::as_str).collect()
    }

    fn accessors(&self) -> Vec<&str> {
        self.accessors.keys().map(String::as_str).collect()
    }

    fn snapshot(&self) -> Value {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_value(&*state).unwrap_or(Value::Null)
    }

    fn attach_observer(&self, observer: Arc<dyn MutationObserver>) {
        let _ = self.observer.set(observer);
    }

    fn state_type(&self) -> &'static str {
        std::any::type_name::<S>()
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Typed handle to a registered slice, exported by the module that declared it.
pub struct SliceHandle<S> {
    inner: Arc<Slice<S>>,
    _marker: PhantomData<fn() -> S>,
}

impl<S> Clone for SliceHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            _marker: PhantomData,
        }
    }
}

impl<S> SliceHandle<S>
where
    S: Clone + Serialize + Send + Sync + 'static,
{
    pub fn new(inner: Arc<Slice<S>>) -> Self {
        Self {
            inner,
            _marker: PhantomData,
        }
    }

    /// Recover a typed handle from an erased slice.
    pub fn downcast(slice: Arc<dyn DynSlice>) -> StoreResult<Self> {
        let name = slice.name().to_string();
        slice
            .into_any()
            .downcast::<Slice<S>>()
            .map(Self::new)
            .map_err(|_| StoreError::TypeMismatch {
                slice: name,
                expected: std::any::type_name::<S>(),
            })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn commit<P: Serialize>(&self, mutation: &str, payload: P) -> StoreResult<()> {
        let payload = serde_json::to_value(payload).map_err(|e| StoreError::Payload {
            slice: self.inner.name.clone(),
            entry: mutation.to_string(),
            reason: e.to_string(),
        })?;
        self.inner.apply(mutation, payload)
    }

    pub fn get<T: DeserializeOwned>(&self, accessor: &str) -> StoreResult<T> {
        let value = self.inner.read(accessor)?;
        serde_json::from_value(value).map_err(|e| StoreError::Payload {
            slice: self.inner.name.clone(),
            entry: accessor.to_string(),
            reason: e.to_string(),
        })
    }

    pub fn as_dyn(&self) -> Arc<dyn DynSlice> {
        self.inner.clone()
    }
}

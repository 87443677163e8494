//! The built-in `global` slice: app-wide UI flags.

use super::container::StateContainer;
use serde::{Deserialize, Serialize};
use waypost_api::StoreResult;
use waypost_plugin::{SliceDefinition, SliceHandle};

pub const GLOBAL_SLICE: &str = "global";
pub const SET_LOADING: &str = "setLoading";
pub const GET_LOADING: &str = "getLoading";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalState {
    pub loading: bool,
}

pub fn global_slice() -> SliceDefinition<GlobalState> {
    SliceDefinition::new(GLOBAL_SLICE, GlobalState::default())
        .mutation(SET_LOADING, |state: &mut GlobalState, loading: bool| {
            state.loading = loading
        })
        .accessor(GET_LOADING, |state: &GlobalState| state.loading)
}

/// Typed access to the `global` slice.
#[derive(Clone)]
pub struct GlobalModule {
    handle: SliceHandle<GlobalState>,
}

impl GlobalModule {
    pub fn register(container: &StateContainer) -> StoreResult<Self> {
        let handle = container.register_definition(global_slice())?;
        Ok(Self { handle })
    }

    /// Look up the slice another module already registered.
    pub fn from_container(container: &StateContainer) -> StoreResult<Self> {
        let handle = container.handle::<GlobalState>(GLOBAL_SLICE)?;
        Ok(Self { handle })
    }

    pub fn set_loading(&self, loading: bool) -> StoreResult<()> {
        self.handle.commit(SET_LOADING, loading)
    }

    pub fn is_loading(&self) -> StoreResult<bool> {
        self.handle.get(GET_LOADING)
    }

    pub fn handle(&self) -> &SliceHandle<GlobalState> {
        &self.handle
    }
}

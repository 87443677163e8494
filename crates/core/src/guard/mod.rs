//! Built-in navigation guards and after-navigation hooks.

pub mod default;
pub mod func;
pub mod loading;

pub use default::DefaultGuard;
pub use func::{AllowAll, FnGuard};
pub use loading::LoadingIndicatorHook;

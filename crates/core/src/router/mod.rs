pub mod assembler;
pub mod components;
pub mod engine;
pub mod history;
pub mod matcher;
pub mod pattern;
pub mod table;

pub use assembler::RouterAssembler;
pub use components::{ComponentCache, ComponentRegistry, ImmediateLoader};
pub use engine::{EngineOptions, NavigationEngine};
pub use history::PathHistory;
pub use matcher::{MAX_REDIRECTS, RouteMatcher, RouteRecord};
pub use pattern::PathPattern;
pub use table::{RouteSource, RouteTable, TableEntry};

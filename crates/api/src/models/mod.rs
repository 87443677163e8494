pub mod location;
pub mod resolved;
pub mod route;
pub mod transition;

pub use location::*;
pub use resolved::*;
pub use route::*;
pub use transition::*;

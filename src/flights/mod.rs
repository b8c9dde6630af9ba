pub mod registry;
pub mod route;

pub use registry::*;
pub use route::*;

pub mod lifecycle;
pub mod registry;

pub use lifecycle::CacheLifecycle;
pub use registry::CacheRegistry;

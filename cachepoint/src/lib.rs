pub mod domain;
pub mod planes;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

pub use domain::{ReadResponse, ReadThroughPolicy};
pub use planes::control::{CacheLifecycle, CacheRegistry};
pub use planes::data::ReadThroughService;
pub use ports::{BackendFactory, CacheBackend};

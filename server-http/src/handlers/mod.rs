pub mod cache;

pub use cache::health::health_check;
pub use cache::read_through::read_or_populate;

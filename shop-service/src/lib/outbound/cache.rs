//! Product listing cache stores.
//!
//! Redis when a cache URL is configured, otherwise a process-local map.

pub mod in_memory;
pub mod redis_cache;

pub use in_memory::InMemoryProductCache;
pub use redis_cache::RedisProductCache;

//! Signature token index adapters.
//!
//! - `InMemoryTokenIndex` - In-memory with lazy eviction, for tests and single-server
//! - `RedisTokenIndex` - Redis-backed with native key expiry

mod in_memory;
mod redis_index;

pub use in_memory::InMemoryTokenIndex;
pub use redis_index::RedisTokenIndex;

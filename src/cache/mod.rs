//! Response cache: key derivation and store adapters.

pub mod keys;
pub mod store;

pub use keys::CacheKey;
pub use store::{CacheStore, MemoryStore, RedisStore};

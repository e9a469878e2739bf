//! Cache store adapters.
//!
//! The store is an availability optimization, never a dependency: every
//! adapter maps connectivity failures to a miss so an unreachable store
//! degrades the cache, not the service.

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use metrics::counter;
use redis::{AsyncCommands, aio::ConnectionManager};
use tokio::{
    sync::{OnceCell, RwLock},
    time::Instant,
};
use tracing::warn;

use super::keys::CacheKey;

#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Returns the stored value, or absent if the key was never stored, has
    /// expired, or the store is unreachable.
    async fn lookup(&self, key: &CacheKey) -> Option<String>;

    /// Persist `value` under `key`, overwriting any previous value and
    /// expiring it after `ttl`.
    async fn store(&self, key: &CacheKey, value: &str, ttl: Duration);
}

/// Redis-backed store using GET/SETEX.
///
/// The connection is established lazily so a store that is down at process
/// start does not block serving; every failed attempt is retried on the
/// next operation.
pub struct RedisStore {
    client: redis::Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisStore {
    pub fn connect(host: &str, port: u16) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(format!("redis://{host}:{port}/"))?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, redis::RedisError> {
        self.connection
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await
            .cloned()
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn lookup(&self, key: &CacheKey) -> Option<String> {
        let mut connection = match self.connection().await {
            Ok(connection) => connection,
            Err(err) => {
                warn!(error = %err, "cache store unreachable, treating lookup as a miss");
                counter!("temblor_cache_store_error_total").increment(1);
                return None;
            }
        };

        match connection.get::<_, Option<String>>(key.as_str()).await {
            Ok(value) => value,
            Err(err) => {
                warn!(key = %key, error = %err, "cache lookup failed, treating as a miss");
                counter!("temblor_cache_store_error_total").increment(1);
                None
            }
        }
    }

    async fn store(&self, key: &CacheKey, value: &str, ttl: Duration) {
        let mut connection = match self.connection().await {
            Ok(connection) => connection,
            Err(err) => {
                warn!(error = %err, "cache store unreachable, dropping write");
                counter!("temblor_cache_store_error_total").increment(1);
                return;
            }
        };

        if let Err(err) = connection
            .set_ex::<_, _, ()>(key.as_str(), value, ttl.as_secs())
            .await
        {
            warn!(key = %key, error = %err, "cache write failed, dropping write");
            counter!("temblor_cache_store_error_total").increment(1);
        }
    }
}

/// In-process TTL store.
///
/// Used by tests and by deployments that run without a Redis instance;
/// mirrors the adapter contract exactly.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, MemoryEntry>>,
}

struct MemoryEntry {
    value: String,
    expires_at: Instant,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn lookup(&self, key: &CacheKey) -> Option<String> {
        let expired = {
            let guard = self.entries.read().await;
            match guard.get(key.as_str()) {
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.entries.write().await.remove(key.as_str());
        }
        None
    }

    async fn store(&self, key: &CacheKey, value: &str, ttl: Duration) {
        let entry = MemoryEntry {
            value: value.to_string(),
            expires_at: Instant::now() + ttl,
        };
        self.entries
            .write()
            .await
            .insert(key.as_str().to_string(), entry);
    }
}

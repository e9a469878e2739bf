//! Cache-aside retrieval of upstream earthquake data.

use std::{sync::Arc, time::Duration};

use metrics::counter;
use thiserror::Error;
use tracing::{info, warn};

use crate::cache::{CacheStore, keys};
use crate::domain::quakes::FeatureCollection;
use crate::domain::query::UpstreamQuery;
use crate::infra::upstream::{EventSource, UpstreamError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("upstream payload could not be decoded: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Fetches event collections, consulting the response cache first.
///
/// Lookup path: derive the key, probe the store, and only on a miss issue
/// the upstream query; the raw body of a successful fetch is stored under
/// the key for the configured lifetime. Identical queries inside that
/// window never reach upstream.
pub struct QuakeService {
    source: Arc<dyn EventSource>,
    cache: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl QuakeService {
    pub fn new(source: Arc<dyn EventSource>, cache: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { source, cache, ttl }
    }

    pub async fn fetch(&self, query: &UpstreamQuery) -> Result<FeatureCollection, FetchError> {
        let key = keys::derive(query);

        if let Some(body) = self.cache.lookup(&key).await {
            match serde_json::from_str(&body) {
                Ok(collection) => {
                    info!(key = %key, "cache hit");
                    counter!("temblor_cache_hit_total").increment(1);
                    return Ok(collection);
                }
                Err(err) => {
                    // A poisoned entry expires on its own; refetch instead.
                    warn!(key = %key, error = %err, "cached entry undecodable, refetching");
                }
            }
        }

        info!(key = %key, "cache miss");
        counter!("temblor_cache_miss_total").increment(1);

        let body = self.source.query(query).await.inspect_err(|_| {
            counter!("temblor_upstream_error_total").increment(1);
        })?;
        let collection = serde_json::from_str(&body)?;
        self.cache.store(&key, &body, self.ttl).await;

        Ok(collection)
    }
}

//! Cache key derivation.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::domain::query::UpstreamQuery;

/// Opaque lookup handle for a cached upstream response.
///
/// A SHA-256 digest of the query's canonical form, rendered as 64 hex
/// characters. Never decoded back into parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the cache key for a parameter set.
///
/// Deterministic: equal key/value pairs produce equal keys regardless of
/// insertion order.
pub fn derive(query: &UpstreamQuery) -> CacheKey {
    let digest = Sha256::digest(query.canonical().as_bytes());
    CacheKey(hex::encode(digest))
}

//! Cache access for trees and resolved values

use lexis_cache::CacheStore;
use lexis_log::{debug, trace, warn};
use serde::{Serialize, de::DeserializeOwned};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// A cache backend together with the TTL entries are written with.
///
/// Reads and writes never fail: backend and decoding errors are logged and
/// treated as misses.
#[derive(Clone)]
pub struct CacheLayer {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl CacheLayer {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn store(&self) -> &Arc<dyn CacheStore> {
        &self.store
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match lexis_cache::get(self.store.as_ref(), key).await {
            Ok(Some(value)) => {
                trace!("Cache hit: {}", key);
                Some(value)
            }
            Ok(None) => {
                trace!("Cache miss: {}", key);
                None
            }
            Err(e) => {
                debug!("Cache read failed for {}: {}", key, e);
                None
            }
        }
    }

    pub async fn put<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = lexis_cache::set(self.store.as_ref(), key, value, Some(self.ttl)).await {
            warn!("Cache write failed for {}: {}", key, e);
        }
    }
}

impl fmt::Debug for CacheLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheLayer").field("ttl", &self.ttl).finish_non_exhaustive()
    }
}

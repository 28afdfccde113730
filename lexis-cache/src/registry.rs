//! Named cache backends.
//!
//! Profiles refer to a cache backend by name; the registry resolves that
//! name to a shared store instance.

use crate::error::{CacheError, CacheResult};
use crate::memory::InMemoryCache;
use crate::traits::CacheStore;
use std::collections::HashMap;
use std::sync::Arc;

/// Name under which [`CacheRegistry::with_defaults`] registers an
/// [`InMemoryCache`].
pub const MEMORY_BACKEND: &str = "memory";

/// Registry of cache stores keyed by backend name.
#[derive(Clone, Default)]
pub struct CacheRegistry {
    stores: HashMap<String, Arc<dyn CacheStore>>,
}

impl CacheRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with an in-memory store named `"memory"`.
    pub fn with_defaults() -> Self {
        Self::new().with_store(MEMORY_BACKEND, Arc::new(InMemoryCache::new()))
    }

    /// Register a store, replacing any store with the same name.
    pub fn with_store(mut self, name: impl Into<String>, store: Arc<dyn CacheStore>) -> Self {
        self.register(name, store);
        self
    }

    /// Register a store in place.
    pub fn register(&mut self, name: impl Into<String>, store: Arc<dyn CacheStore>) {
        self.stores.insert(name.into(), store);
    }

    /// Look up a store by name.
    pub fn get(&self, name: &str) -> CacheResult<Arc<dyn CacheStore>> {
        self.stores
            .get(name)
            .cloned()
            .ok_or_else(|| CacheError::UnknownBackend(name.to_string()))
    }

    /// Whether a store with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.stores.contains_key(name)
    }

    /// Registered backend names.
    pub fn names(&self) -> Vec<&str> {
        self.stores.keys().map(String::as_str).collect()
    }
}

impl std::fmt::Debug for CacheRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheRegistry")
            .field("backends", &self.names())
            .finish()
    }
}

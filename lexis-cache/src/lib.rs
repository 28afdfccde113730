//! Cache backends for Lexis.
//!
//! Provides the [`CacheStore`] interface the translator writes whole
//! language trees and resolved values through, an in-process
//! [`InMemoryCache`] with per-entry TTL, and a [`CacheRegistry`] that maps
//! backend names from profile configuration to store instances.
//!
//! # Examples
//!
//! ```no_run
//! use lexis_cache::*;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CacheError> {
//!     let cache = InMemoryCache::new();
//!     cache.set_json("greeting", "\"hi\"".to_string(), Some(Duration::from_secs(60))).await?;
//!
//!     let greeting: Option<String> = get(&cache, "greeting").await?;
//!     assert_eq!(greeting.as_deref(), Some("hi"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod helpers;
pub mod memory;
pub mod registry;
pub mod traits;

pub use error::{CacheError, CacheResult};
pub use helpers::*;
pub use memory::InMemoryCache;
pub use registry::{CacheRegistry, MEMORY_BACKEND};
pub use traits::CacheStore;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{CacheError, CacheResult};
    pub use crate::memory::InMemoryCache;
    pub use crate::registry::CacheRegistry;
    pub use crate::traits::CacheStore;
}

// Lexis - a localization engine for Rust
//
// Resolves hierarchical translation keys against per-language resource
// trees with language fallback, numeric plural selection, placeholder
// interpolation and write-through caching.

// Re-export the engine
pub use lexis_i18n::*;

// Re-export supporting crates
pub use lexis_cache;
pub use lexis_config;
pub use lexis_log;

pub use lexis_cache::{CacheRegistry, CacheStore, InMemoryCache};
pub use lexis_config::{ProfileConfig, ProfileSource};

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        CacheRegistry, CacheStore, I18nError, InMemoryCache, LanguageList, PluralSet,
        ProfileConfig, ProfileSource, Result, Substitutions, Translation, Translator, interpolate,
    };
}

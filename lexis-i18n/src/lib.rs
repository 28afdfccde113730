//! Translation Resolution for Lexis
//!
//! Resolves hierarchical keys such as `menu:file:open` against per-language
//! resource trees, falling back through an ordered language list:
//!
//! - **Resource trees**: nested JSON documents, one per language
//! - **Language fallback**: the first language holding the key wins
//! - **Pluralization**: numeric-threshold plural sets
//! - **Interpolation**: `%name%` placeholders
//! - **Caching**: trees and resolved values written through to a cache backend
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lexis_i18n::{Substitutions, Translator};
//! use lexis_config::ProfileSource;
//!
//! let source = ProfileSource::builder().add_file_auto("lexis.toml").load_env().build()?;
//! let translator = Translator::builder().profiles(source).build()?;
//!
//! // i18n/en.json: {"greeting": "Hello %name%", "cart": {"items": {"0": "empty", "1": "one", "2": "%number% items"}}}
//! let hello = translator.tr("greeting", Some(&Substitutions::new().with("name", "Ann")), None).await;
//! let items = translator.tn("cart:items", 5, None).await;  // "5 items"
//! ```
//!
//! # Accept-Language Parsing
//!
//! ```
//! use lexis_i18n::LanguageList;
//!
//! let languages = LanguageList::from_accept_language("en-US,en;q=0.9,fr;q=0.8");
//! assert_eq!(languages.to_string(), "en-us,en,fr");
//! ```

mod cache;
mod error;
mod format;
mod key;
mod language;
mod loader;
mod plural;
mod resolver;
mod store;
mod translator;
mod tree;

pub use cache::CacheLayer;
pub use error::I18nError;
pub use format::{Substitutions, interpolate};
pub use key::{CACHE_NAMESPACE, KEY_DELIMITER, Key, tree_cache_key, value_cache_key};
pub use language::{LanguageCode, LanguageList};
pub use loader::{FileLoader, LanguageLoader, MemoryLoader};
pub use plural::PluralSet;
pub use resolver::{CachedValue, ResolutionEngine, ResolutionEngineBuilder};
pub use store::LanguageStore;
pub use translator::{LoaderFactory, Translation, Translator, TranslatorBuilder};
pub use tree::ResourceTree;

/// Result type for i18n operations
pub type Result<T> = std::result::Result<T, I18nError>;

/// Prelude for common imports
pub mod prelude {
    pub use crate::{
        I18nError, LanguageList, PluralSet, Result, Substitutions, Translation, Translator,
        interpolate,
    };
}

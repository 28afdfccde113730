//! Key Resolution
//!
//! Walks a key through each language of a preference list until one
//! language yields a value of the requested kind.

use crate::cache::CacheLayer;
use crate::key::value_cache_key;
use crate::{Key, LanguageList, LanguageLoader, LanguageStore, PluralSet, ResourceTree};
use lexis_log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A resolved value as stored in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum CachedValue {
    Scalar(String),
    Set(PluralSet),
}

/// A kind of value a key can resolve to.
pub(crate) trait Resolvable: Sized + Send {
    fn extract(leaf: &ResourceTree) -> Option<Self>;
    fn from_cached(value: CachedValue) -> Option<Self>;
    fn to_cached(&self) -> CachedValue;
}

impl Resolvable for String {
    fn extract(leaf: &ResourceTree) -> Option<Self> {
        leaf.as_scalar().map(str::to_string)
    }

    fn from_cached(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Scalar(s) => Some(s),
            CachedValue::Set(_) => None,
        }
    }

    fn to_cached(&self) -> CachedValue {
        CachedValue::Scalar(self.clone())
    }
}

impl Resolvable for PluralSet {
    fn extract(leaf: &ResourceTree) -> Option<Self> {
        PluralSet::from_tree(leaf)
    }

    fn from_cached(value: CachedValue) -> Option<Self> {
        match value {
            CachedValue::Set(set) => Some(set),
            CachedValue::Scalar(_) => None,
        }
    }

    fn to_cached(&self) -> CachedValue {
        CachedValue::Set(self.clone())
    }
}

/// Resolves keys against a profile's languages.
///
/// ```
/// use lexis_i18n::{LanguageList, MemoryLoader, ResolutionEngine};
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let loader = MemoryLoader::new()
///     .with_json("en", r#"{"menu": {"file": "File"}}"#)
///     .unwrap();
/// let engine = ResolutionEngine::builder("default", Arc::new(loader))
///     .default_languages(LanguageList::parse("en"))
///     .build();
///
/// assert_eq!(engine.resolve_scalar("menu:file", None).await.as_deref(), Some("File"));
/// # }
/// ```
#[derive(Debug)]
pub struct ResolutionEngine {
    profile: String,
    defaults: LanguageList,
    store: Arc<LanguageStore>,
    cache: Option<CacheLayer>,
}

impl ResolutionEngine {
    pub fn builder(
        profile: impl Into<String>,
        loader: Arc<dyn LanguageLoader>,
    ) -> ResolutionEngineBuilder {
        ResolutionEngineBuilder::new(profile, loader)
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Languages tried when a caller passes none.
    pub fn default_languages(&self) -> &LanguageList {
        &self.defaults
    }

    pub fn store(&self) -> &Arc<LanguageStore> {
        &self.store
    }

    /// The list a lookup will try: the caller's, else the profile default.
    /// `None` when that list is empty.
    pub fn effective_languages<'a>(
        &'a self,
        languages: Option<&'a LanguageList>,
    ) -> Option<&'a LanguageList> {
        let list = languages.unwrap_or(&self.defaults);
        (!list.is_empty()).then_some(list)
    }

    /// Resolve a key to a single string.
    pub async fn resolve_scalar(&self, key: &str, languages: Option<&LanguageList>) -> Option<String> {
        self.resolve(key, languages).await
    }

    /// Resolve a key to a plural set.
    pub async fn resolve_set(&self, key: &str, languages: Option<&LanguageList>) -> Option<PluralSet> {
        self.resolve(key, languages).await
    }

    async fn resolve<T: Resolvable>(
        &self,
        key: &str,
        languages: Option<&LanguageList>,
    ) -> Option<T> {
        let key = Key::parse(key).ok()?;
        let languages = self.effective_languages(languages)?;

        for language in languages.iter() {
            let cache_key = value_cache_key(&self.profile, language.as_str(), &key);

            if let Some(cache) = &self.cache {
                if let Some(value) = cache.get::<CachedValue>(&cache_key).await.and_then(T::from_cached) {
                    return Some(value);
                }
            }

            let Some(tree) = self.store.tree(language).await else {
                continue;
            };

            let Some(value) = tree.walk(key.segments()).and_then(T::extract) else {
                trace!("Key {} not found in {}", key, language);
                continue;
            };

            if let Some(cache) = &self.cache {
                cache.put(&cache_key, &value.to_cached()).await;
            }
            return Some(value);
        }

        debug!("Key {} not resolved for [{}]", key, languages);
        None
    }
}

/// Builder for [`ResolutionEngine`].
pub struct ResolutionEngineBuilder {
    profile: String,
    loader: Arc<dyn LanguageLoader>,
    defaults: LanguageList,
    cache: Option<CacheLayer>,
}

impl ResolutionEngineBuilder {
    pub fn new(profile: impl Into<String>, loader: Arc<dyn LanguageLoader>) -> Self {
        Self {
            profile: profile.into(),
            loader,
            defaults: LanguageList::new(),
            cache: None,
        }
    }

    pub fn default_languages(mut self, languages: LanguageList) -> Self {
        self.defaults = languages;
        self
    }

    /// Cache trees and resolved values in `cache`.
    pub fn cache(mut self, cache: CacheLayer) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> ResolutionEngine {
        let mut store = LanguageStore::new(self.profile.clone(), self.loader);
        if let Some(cache) = &self.cache {
            store = store.with_cache(cache.clone());
        }

        ResolutionEngine {
            profile: self.profile,
            defaults: self.defaults,
            store: Arc::new(store),
            cache: self.cache,
        }
    }
}

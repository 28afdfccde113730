//! Per-profile Language Store
//!
//! Holds the resource trees loaded for one profile. A tree is looked for in
//! memory, then in the cache, then asked of the loader; whatever is found
//! stays in memory for the life of the store.

use crate::cache::CacheLayer;
use crate::key::tree_cache_key;
use crate::{I18nError, LanguageCode, LanguageLoader, ResourceTree, Result};
use lexis_log::{debug, trace};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Loaded resource trees for one profile.
pub struct LanguageStore {
    profile: String,
    loader: Arc<dyn LanguageLoader>,
    cache: Option<CacheLayer>,
    trees: RwLock<HashMap<String, Arc<ResourceTree>>>,
    load_lock: Mutex<()>,
}

impl LanguageStore {
    pub fn new(profile: impl Into<String>, loader: Arc<dyn LanguageLoader>) -> Self {
        Self {
            profile: profile.into(),
            loader,
            cache: None,
            trees: RwLock::new(HashMap::new()),
            load_lock: Mutex::new(()),
        }
    }

    /// Read trees from, and write them through to, a cache.
    pub fn with_cache(mut self, cache: CacheLayer) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    /// Make a language's tree available.
    ///
    /// Returns `false` when the language has no usable resource; the
    /// reason is logged, never returned.
    pub async fn ensure(&self, language: &LanguageCode) -> bool {
        self.tree(language).await.is_some()
    }

    /// The tree for a language, loading it if needed.
    pub async fn tree(&self, language: &LanguageCode) -> Option<Arc<ResourceTree>> {
        if let Some(tree) = self.loaded(language) {
            return Some(tree);
        }

        // Loads are serialized so concurrent callers load a language once
        let _guard = self.load_lock.lock().await;
        if let Some(tree) = self.loaded(language) {
            return Some(tree);
        }

        let cache_key = tree_cache_key(&self.profile, language.as_str());

        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get::<ResourceTree>(&cache_key).await {
                match usable(language, cached) {
                    Ok(tree) => {
                        debug!("Language {} for profile {} restored from cache", language, self.profile);
                        return Some(self.store(language, tree));
                    }
                    Err(e) => {
                        debug!("Ignoring cached entry {}: {}", cache_key, e);
                    }
                }
            }
        }

        let loaded = self.loader.load(language).await;
        let tree = match loaded.and_then(|tree| usable(language, tree)) {
            Ok(tree) => tree,
            Err(e) => {
                debug!("Language {} unavailable for profile {}: {}", language, self.profile, e);
                return None;
            }
        };

        if let Some(cache) = &self.cache {
            cache.put(&cache_key, &tree).await;
        }

        debug!("Language {} loaded for profile {}", language, self.profile);
        Some(self.store(language, tree))
    }

    /// Preload a tree, replacing any tree already held for the language.
    pub fn insert(&self, language: &LanguageCode, tree: ResourceTree) {
        self.store(language, tree);
    }

    /// Check whether a language is in memory, without loading it.
    pub fn is_loaded(&self, language: &str) -> bool {
        self.trees.read().contains_key(language)
    }

    /// Languages held in memory, sorted.
    pub fn loaded_languages(&self) -> Vec<String> {
        let mut languages: Vec<String> = self.trees.read().keys().cloned().collect();
        languages.sort();
        languages
    }

    pub fn len(&self) -> usize {
        self.trees.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.read().is_empty()
    }

    fn loaded(&self, language: &LanguageCode) -> Option<Arc<ResourceTree>> {
        let tree = self.trees.read().get(language.as_str()).cloned();
        if tree.is_some() {
            trace!("Language {} already in memory", language);
        }
        tree
    }

    fn store(&self, language: &LanguageCode, tree: ResourceTree) -> Arc<ResourceTree> {
        let tree = Arc::new(tree);
        self.trees
            .write()
            .insert(language.as_str().to_string(), Arc::clone(&tree));
        tree
    }
}

/// A language tree must be a node with at least one child.
fn usable(language: &LanguageCode, tree: ResourceTree) -> Result<ResourceTree> {
    match tree {
        ResourceTree::Node(ref children) if children.is_empty() => {
            Err(I18nError::EmptyResource(language.to_string()))
        }
        ResourceTree::Node(_) => Ok(tree),
        ResourceTree::Scalar(_) => Err(I18nError::ParseError(format!(
            "resource for language {language} is a string, not a tree"
        ))),
    }
}

impl fmt::Debug for LanguageStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageStore")
            .field("profile", &self.profile)
            .field("languages", &self.loaded_languages())
            .field("cache", &self.cache)
            .finish()
    }
}

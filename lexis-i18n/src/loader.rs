//! Language Resource Loaders
//!
//! A loader turns a language code into that language's [`ResourceTree`].
//! Loaders are only asked for languages that are neither in memory nor in
//! the cache.

use crate::{I18nError, LanguageCode, ResourceTree, Result};
use async_trait::async_trait;
use lexis_log::{debug, trace};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Source of language resource trees.
#[async_trait]
pub trait LanguageLoader: Send + Sync {
    /// Load the full tree for one language.
    ///
    /// Returns [`I18nError::LanguageNotFound`] when no resource exists.
    async fn load(&self, language: &LanguageCode) -> Result<ResourceTree>;
}

/// Loads `<root>/<location>/<language>.json` files.
///
/// Roots are searched in order and the first existing file wins, so an
/// application can override a library's resources by putting its own root
/// first.
///
/// ```
/// use lexis_i18n::FileLoader;
///
/// let loader = FileLoader::new("i18n")
///     .with_root("/srv/app")
///     .with_root("/usr/share/app");
/// assert_eq!(loader.roots().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct FileLoader {
    roots: Vec<PathBuf>,
    location: PathBuf,
    extension: String,
}

impl FileLoader {
    /// Loader for `location`, resolved against the working directory until
    /// roots are added.
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            roots: Vec::new(),
            location: location.into(),
            extension: "json".to_string(),
        }
    }

    /// Append a search root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Append several search roots, in order.
    pub fn with_roots<I, P>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.roots.extend(roots.into_iter().map(Into::into));
        self
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    /// Candidate paths for a language, in search order.
    pub fn candidates(&self, language: &LanguageCode) -> Vec<PathBuf> {
        let file = format!("{}.{}", language.as_str(), self.extension);
        if self.roots.is_empty() {
            return vec![self.location.join(file)];
        }
        self.roots
            .iter()
            .map(|root| root.join(&self.location).join(&file))
            .collect()
    }

    /// First existing resource file for a language.
    pub async fn find(&self, language: &LanguageCode) -> Option<PathBuf> {
        if !is_safe_file_stem(language.as_str()) {
            debug!("Refusing language code {:?} as a file name", language.as_str());
            return None;
        }

        for path in self.candidates(language) {
            match tokio::fs::metadata(&path).await {
                Ok(meta) if meta.is_file() => return Some(path),
                _ => {
                    trace!("No resource at {}", path.display());
                }
            }
        }
        None
    }
}

#[async_trait]
impl LanguageLoader for FileLoader {
    async fn load(&self, language: &LanguageCode) -> Result<ResourceTree> {
        let path = self
            .find(language)
            .await
            .ok_or_else(|| I18nError::LanguageNotFound(language.to_string()))?;

        let content = tokio::fs::read_to_string(&path).await?;
        let tree = ResourceTree::from_json(&content)?;

        debug!("Loaded {} from {}", language, path.display());
        Ok(tree)
    }
}

// Codes come from callers (often request headers) and become file names.
fn is_safe_file_stem(code: &str) -> bool {
    !code.starts_with('.') && !code.contains(['/', '\\', '\0'])
}

/// Serves fixed trees held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    trees: HashMap<String, ResourceTree>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, language: impl Into<String>, tree: ResourceTree) {
        self.trees.insert(language.into(), tree);
    }

    pub fn with_language(mut self, language: impl Into<String>, tree: ResourceTree) -> Self {
        self.insert(language, tree);
        self
    }

    /// Add a language from a JSON document.
    pub fn with_json(mut self, language: impl Into<String>, json: &str) -> Result<Self> {
        self.insert(language, ResourceTree::from_json(json)?);
        Ok(self)
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.trees.keys().map(String::as_str)
    }
}

#[async_trait]
impl LanguageLoader for MemoryLoader {
    async fn load(&self, language: &LanguageCode) -> Result<ResourceTree> {
        self.trees
            .get(language.as_str())
            .cloned()
            .ok_or_else(|| I18nError::LanguageNotFound(language.to_string()))
    }
}

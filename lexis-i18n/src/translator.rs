//! Translator
//!
//! The entry point applications call. A translator owns its profile
//! configuration, its cache backends and one resolution engine per
//! profile that has been set up.

use crate::cache::CacheLayer;
use crate::{
    FileLoader, Key, LanguageList, LanguageLoader, ResolutionEngine, Result, Substitutions,
    interpolate,
};
use lexis_cache::{CacheRegistry, CacheStore};
use lexis_config::{DEFAULT_PROFILE, ProfileConfig, ProfileSource};
use lexis_log::{debug, info, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

/// Builds the loader for a profile from its name and configuration.
pub type LoaderFactory = Arc<dyn Fn(&str, &ProfileConfig) -> Arc<dyn LanguageLoader> + Send + Sync>;

/// A translated string, or the placeholder returned for a missing key when
/// the profile is in debug mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Translation {
    text: String,
    placeholder: bool,
}

impl Translation {
    pub fn found(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            placeholder: false,
        }
    }

    /// The debug placeholder for an unresolved key.
    pub fn placeholder(key: &str) -> Self {
        Self {
            text: format!("/!\\ UNTRANSLATED KEY: \"{}\" /!\\", key),
            placeholder: true,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl Deref for Translation {
    type Target = str;

    fn deref(&self) -> &str {
        &self.text
    }
}

impl AsRef<str> for Translation {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Translation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl PartialEq<str> for Translation {
    fn eq(&self, other: &str) -> bool {
        self.text == other
    }
}

impl PartialEq<&str> for Translation {
    fn eq(&self, other: &&str) -> bool {
        self.text == *other
    }
}

impl From<Translation> for String {
    fn from(t: Translation) -> Self {
        t.text
    }
}

struct ProfileState {
    engine: Arc<ResolutionEngine>,
    debug: bool,
}

/// Resolves translation keys for the active profile.
///
/// ```no_run
/// use lexis_config::{ProfileConfig, ProfileSource};
/// use lexis_i18n::{LanguageList, Substitutions, Translator};
///
/// # async fn run() -> lexis_i18n::Result<()> {
/// let source = ProfileSource::new()
///     .with_profile("default", &ProfileConfig::new("i18n").with_default_language("en"))?;
/// let translator = Translator::builder().profiles(source).search_root("/srv/app").build()?;
///
/// let subs = Substitutions::new().with("name", "Ann");
/// let hello = translator.tr("greeting", Some(&subs), None).await;
///
/// let fr = LanguageList::parse("fr,en");
/// let items = translator.tn("cart:items", 3, Some(&fr)).await;
/// # Ok(())
/// # }
/// ```
pub struct Translator {
    source: ProfileSource,
    caches: CacheRegistry,
    loaders: LoaderFactory,
    active: RwLock<String>,
    profiles: RwLock<HashMap<String, Arc<ProfileState>>>,
}

impl Translator {
    /// Translator over `source`, loading resources from files relative to
    /// the working directory and offering the `"memory"` cache backend.
    pub fn new(source: ProfileSource) -> Self {
        Self {
            source,
            caches: CacheRegistry::with_defaults(),
            loaders: file_loaders(Vec::new()),
            active: RwLock::new(DEFAULT_PROFILE.to_string()),
            profiles: RwLock::new(HashMap::new()),
        }
    }

    pub fn builder() -> TranslatorBuilder {
        TranslatorBuilder::new()
    }

    /// Set up a profile and make it active.
    ///
    /// Each call builds fresh state for the profile, dropping any trees
    /// loaded before. Returns `false`, leaving the active profile as it
    /// was, when the profile is unknown or invalid.
    pub fn setup(&self, profile: &str) -> bool {
        let Some(state) = self.build_state(profile) else {
            return false;
        };

        self.profiles.write().insert(profile.to_string(), state);
        *self.active.write() = profile.to_string();
        true
    }

    /// Translate a key to a string.
    ///
    /// `languages` overrides the profile's default language list. When no
    /// language has the key, returns `None`, or the debug placeholder if the
    /// profile is in debug mode. An invalid key or an empty language list
    /// always returns `None`.
    pub async fn tr(
        &self,
        key: &str,
        substitutions: Option<&Substitutions>,
        languages: Option<&LanguageList>,
    ) -> Option<Translation> {
        let state = self.active_state()?;
        if !is_valid_request(&state, key, languages) {
            return None;
        }

        match state.engine.resolve_scalar(key, languages).await {
            Some(text) => Some(Translation::found(match substitutions {
                Some(subs) => interpolate(&text, subs),
                None => text,
            })),
            None => unresolved(&state, key),
        }
    }

    /// Translate a key to the plural form for `number`, with `%number%`
    /// replaced by its decimal value.
    ///
    /// Missing keys behave as in [`Translator::tr`].
    pub async fn tn(
        &self,
        key: &str,
        number: i64,
        languages: Option<&LanguageList>,
    ) -> Option<Translation> {
        let state = self.active_state()?;
        if !is_valid_request(&state, key, languages) {
            return None;
        }

        let selected = state
            .engine
            .resolve_set(key, languages)
            .await
            .and_then(|set| {
                set.select(number).map(|form| {
                    interpolate(form, &Substitutions::new().with("number", number))
                })
            });

        match selected {
            Some(text) => Some(Translation::found(text)),
            None => unresolved(&state, key),
        }
    }

    /// Name of the active profile.
    pub fn active_profile(&self) -> String {
        self.active.read().clone()
    }

    /// Check whether a profile has been set up.
    pub fn is_initialized(&self, profile: &str) -> bool {
        self.profiles.read().contains_key(profile)
    }

    /// Debug mode of the active profile, setting it up if needed.
    pub fn is_debug(&self) -> bool {
        self.active_state().is_some_and(|state| state.debug)
    }

    /// Resolution engine of the active profile, setting it up if needed.
    pub fn engine(&self) -> Option<Arc<ResolutionEngine>> {
        self.active_state().map(|state| Arc::clone(&state.engine))
    }

    /// The profile configuration this translator reads from.
    pub fn profile_source(&self) -> &ProfileSource {
        &self.source
    }

    fn active_state(&self) -> Option<Arc<ProfileState>> {
        let name = self.active_profile();
        if let Some(state) = self.profiles.read().get(&name) {
            return Some(Arc::clone(state));
        }

        // Built outside the lock; the loader factory may call back in
        let state = self.build_state(&name)?;
        let mut profiles = self.profiles.write();
        Some(Arc::clone(profiles.entry(name).or_insert(state)))
    }

    fn build_state(&self, profile: &str) -> Option<Arc<ProfileState>> {
        let config = match self.source.profile(profile) {
            Ok(config) => config,
            Err(e) => {
                warn!("Cannot set up profile {}: {}", profile, e);
                return None;
            }
        };

        let mut engine = ResolutionEngine::builder(profile, (self.loaders)(profile, &config))
            .default_languages(LanguageList::parse(
                config.default_language.as_deref().unwrap_or_default(),
            ));

        if let Some(backend) = config.cache.as_deref() {
            match self.caches.get(backend) {
                Ok(store) => engine = engine.cache(CacheLayer::new(store, config.cache_ttl())),
                Err(e) => {
                    warn!("Profile {} runs without cache: {}", profile, e);
                }
            }
        }

        info!(
            "Profile {} set up (location: {}, debug: {})",
            profile, config.location, config.debug
        );

        Some(Arc::new(ProfileState {
            engine: Arc::new(engine.build()),
            debug: config.debug,
        }))
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut initialized: Vec<String> = self.profiles.read().keys().cloned().collect();
        initialized.sort();
        f.debug_struct("Translator")
            .field("active", &self.active_profile())
            .field("profiles", &self.source.names())
            .field("initialized", &initialized)
            .finish_non_exhaustive()
    }
}

fn is_valid_request(state: &ProfileState, key: &str, languages: Option<&LanguageList>) -> bool {
    Key::parse(key).is_ok() && state.engine.effective_languages(languages).is_some()
}

fn unresolved(state: &ProfileState, key: &str) -> Option<Translation> {
    if state.debug {
        debug!("Returning placeholder for untranslated key {}", key);
        return Some(Translation::placeholder(key));
    }
    None
}

fn file_loaders(roots: Vec<PathBuf>) -> LoaderFactory {
    Arc::new(move |_profile: &str, config: &ProfileConfig| -> Arc<dyn LanguageLoader> {
        Arc::new(FileLoader::new(&config.location).with_roots(roots.iter().cloned()))
    })
}

/// Builder for [`Translator`].
pub struct TranslatorBuilder {
    source: ProfileSource,
    profiles: Vec<(String, ProfileConfig)>,
    caches: CacheRegistry,
    roots: Vec<PathBuf>,
    loaders: Option<LoaderFactory>,
    active: String,
}

impl Default for TranslatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TranslatorBuilder {
    pub fn new() -> Self {
        Self {
            source: ProfileSource::new(),
            profiles: Vec::new(),
            caches: CacheRegistry::with_defaults(),
            roots: Vec::new(),
            loaders: None,
            active: DEFAULT_PROFILE.to_string(),
        }
    }

    /// Read profiles from `source`.
    pub fn profiles(mut self, source: ProfileSource) -> Self {
        self.source = source;
        self
    }

    /// Define a profile, overriding any definition in the source.
    pub fn profile(mut self, name: impl Into<String>, config: ProfileConfig) -> Self {
        self.profiles.push((name.into(), config));
        self
    }

    /// Replace the cache backend registry.
    pub fn caches(mut self, caches: CacheRegistry) -> Self {
        self.caches = caches;
        self
    }

    /// Register a cache backend under the name profiles refer to it by.
    pub fn cache_backend(mut self, name: impl Into<String>, store: Arc<dyn CacheStore>) -> Self {
        self.caches.register(name, store);
        self
    }

    /// Append a directory searched for profile resource locations.
    pub fn search_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Use one loader for every profile instead of resource files.
    pub fn loader(self, loader: Arc<dyn LanguageLoader>) -> Self {
        self.loader_factory(move |_, _| Arc::clone(&loader))
    }

    /// Build each profile's loader with `factory`.
    pub fn loader_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str, &ProfileConfig) -> Arc<dyn LanguageLoader> + Send + Sync + 'static,
    {
        self.loaders = Some(Arc::new(factory));
        self
    }

    /// Profile that is active until [`Translator::setup`] picks another.
    pub fn active_profile(mut self, name: impl Into<String>) -> Self {
        self.active = name.into();
        self
    }

    pub fn build(self) -> Result<Translator> {
        let mut source = self.source;
        for (name, config) in &self.profiles {
            source.insert(name.clone(), config)?;
        }

        let loaders = self.loaders.unwrap_or_else(|| file_loaders(self.roots));

        Ok(Translator {
            source,
            caches: self.caches,
            loaders,
            active: RwLock::new(self.active),
            profiles: RwLock::new(HashMap::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryLoader;
    use lexis_cache::InMemoryCache;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{OnceLock, Weak};

    fn loader() -> Arc<MemoryLoader> {
        Arc::new(
            MemoryLoader::new()
                .with_json(
                    "en",
                    r#"{
                        "greeting": "Hello %name%",
                        "cart": {"items": {"0": "no items", "1": "one item", "2": "%number% items"}}
                    }"#,
                )
                .unwrap()
                .with_json("fr", r#"{"greeting": "Bonjour %name%"}"#)
                .unwrap(),
        )
    }

    fn translator(debug: bool) -> Translator {
        Translator::builder()
            .profile(
                "default",
                ProfileConfig::new("i18n")
                    .with_default_language("en")
                    .with_debug(debug),
            )
            .profile("french", ProfileConfig::new("i18n").with_default_language("fr,en"))
            .loader(loader())
            .build()
            .unwrap()
    }

    #[test]
    fn test_translation_placeholder() {
        let t = Translation::placeholder("a:b");
        assert_eq!(t, "/!\\ UNTRANSLATED KEY: \"a:b\" /!\\");
        assert!(t.is_placeholder());
        assert!(!Translation::found("x").is_placeholder());
    }

    #[tokio::test]
    async fn test_tr_with_substitutions() {
        let translator = translator(false);
        let subs = Substitutions::new().with("name", "Ann");

        let hello = translator.tr("greeting", Some(&subs), None).await.unwrap();
        assert_eq!(hello, "Hello Ann");
        assert!(!hello.is_placeholder());

        let raw = translator.tr("greeting", None, None).await.unwrap();
        assert_eq!(raw, "Hello %name%");
    }

    #[tokio::test]
    async fn test_tn_selects_and_fills_number() {
        let translator = translator(false);

        assert_eq!(translator.tn("cart:items", 0, None).await.unwrap(), "no items");
        assert_eq!(translator.tn("cart:items", 1, None).await.unwrap(), "one item");
        assert_eq!(translator.tn("cart:items", 7, None).await.unwrap(), "7 items");
        assert_eq!(translator.tn("cart:items", -3, None).await.unwrap(), "no items");
    }

    #[tokio::test]
    async fn test_missing_key_without_debug() {
        let translator = translator(false);
        assert_eq!(translator.tr("nope", None, None).await, None);
        assert_eq!(translator.tn("nope", 1, None).await, None);
    }

    #[tokio::test]
    async fn test_missing_key_with_debug() {
        let translator = translator(true);

        let tr = translator.tr("nope", None, None).await.unwrap();
        assert!(tr.is_placeholder());
        assert!(tr.contains("nope"));

        let tn = translator.tn("greeting", 2, None).await.unwrap();
        assert!(tn.is_placeholder());
        assert!(tn.contains("greeting"));
    }

    #[tokio::test]
    async fn test_validation_failures_ignore_debug() {
        let translator = translator(true);
        let none = LanguageList::new();

        assert_eq!(translator.tr("", None, None).await, None);
        assert_eq!(translator.tr("a::b", None, None).await, None);
        assert_eq!(translator.tr("greeting", None, Some(&none)).await, None);
    }

    #[tokio::test]
    async fn test_setup_switches_profile() {
        let translator = translator(false);
        assert_eq!(translator.active_profile(), "default");
        assert!(!translator.is_initialized("default"));

        let subs = Substitutions::new().with("name", "Ann");
        assert_eq!(translator.tr("greeting", Some(&subs), None).await.unwrap(), "Hello Ann");
        assert!(translator.is_initialized("default"));

        assert!(translator.setup("french"));
        assert_eq!(translator.active_profile(), "french");
        assert_eq!(translator.tr("greeting", Some(&subs), None).await.unwrap(), "Bonjour Ann");
        assert_eq!(translator.tn("cart:items", 1, None).await.unwrap(), "one item");
    }

    #[tokio::test]
    async fn test_setup_unknown_profile_keeps_active() {
        let translator = translator(false);
        assert!(translator.setup("default"));
        assert!(!translator.setup("missing"));
        assert_eq!(translator.active_profile(), "default");
        assert!(!translator.is_initialized("missing"));
    }

    #[tokio::test]
    async fn test_unknown_active_profile_returns_nothing() {
        let translator = Translator::builder()
            .active_profile("ghost")
            .loader(loader())
            .build()
            .unwrap();

        assert_eq!(translator.tr("greeting", None, None).await, None);
        assert!(!translator.is_debug());
        assert!(translator.engine().is_none());
    }

    #[tokio::test]
    async fn test_profile_cache_backend() {
        let cache = Arc::new(InMemoryCache::new());
        let translator = Translator::builder()
            .profile(
                "default",
                ProfileConfig::new("i18n").with_default_language("en").with_cache("shared"),
            )
            .cache_backend("shared", cache.clone())
            .loader(loader())
            .build()
            .unwrap();

        translator.tr("greeting", None, None).await.unwrap();
        assert!(cache.exists("lexis.default.en").await.unwrap());
        assert!(cache.exists("lexis.default.en.greeting").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_cache_backend_is_ignored() {
        let translator = Translator::builder()
            .profile(
                "default",
                ProfileConfig::new("i18n").with_default_language("en").with_cache("redis"),
            )
            .loader(loader())
            .build()
            .unwrap();

        assert!(translator.tr("greeting", None, None).await.is_some());
    }

    #[tokio::test]
    async fn test_loader_factory_receives_profile() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let translator = Translator::builder()
            .profile("default", ProfileConfig::new("custom").with_default_language("en"))
            .loader_factory(move |profile, config| {
                assert_eq!(profile, "default");
                assert_eq!(config.location, "custom");
                seen.fetch_add(1, Ordering::SeqCst);
                loader() as Arc<dyn LanguageLoader>
            })
            .build()
            .unwrap();

        assert!(translator.tr("greeting", None, None).await.is_some());
        assert!(translator.tr("greeting", None, None).await.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_loader_factory_may_query_translator() {
        let cell: Arc<OnceLock<Weak<Translator>>> = Arc::new(OnceLock::new());
        let factory_cell = Arc::clone(&cell);
        let translator = Arc::new(
            Translator::builder()
                .profile("default", ProfileConfig::new("i18n").with_default_language("en"))
                .loader_factory(move |profile, _config| {
                    if let Some(translator) = factory_cell.get().and_then(Weak::upgrade) {
                        assert!(!translator.is_initialized(profile));
                    }
                    loader() as Arc<dyn LanguageLoader>
                })
                .build()
                .unwrap(),
        );
        cell.set(Arc::downgrade(&translator)).unwrap();

        assert_eq!(translator.tr("greeting", None, None).await.unwrap(), "Hello %name%");
        assert!(translator.is_initialized("default"));
    }
}

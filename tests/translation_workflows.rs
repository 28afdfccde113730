//! Integration tests for common Lexis workflows.
//!
//! These tests drive the translator end to end: resource files on disk,
//! profile configuration, language fallback and caching.

use async_trait::async_trait;
use lexis::prelude::*;
use lexis::{CachedValue, LanguageCode, LanguageLoader, MemoryLoader, ResourceTree};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

// =============================================================================
// Fixtures
// =============================================================================

struct CountingLoader {
    inner: MemoryLoader,
    calls: AtomicUsize,
}

#[async_trait]
impl LanguageLoader for CountingLoader {
    async fn load(&self, language: &LanguageCode) -> Result<ResourceTree> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.load(language).await
    }
}

fn counting_loader() -> Arc<CountingLoader> {
    let inner = MemoryLoader::new()
        .with_json(
            "en",
            r#"{
                "a": {"b": "hello"},
                "greeting": "Hello %name%, you have %count% items",
                "only_en": "English only",
                "items": {"0": "no items", "1": "one item", "5": "many items"}
            }"#,
        )
        .unwrap()
        .with_json("fr", r#"{"greeting": "Bonjour %name%"}"#)
        .unwrap();

    Arc::new(CountingLoader {
        inner,
        calls: AtomicUsize::new(0),
    })
}

fn write_resource(root: &Path, location: &str, language: &str, json: &str) {
    let dir = root.join(location);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{language}.json")), json).unwrap();
}

fn translator_with(loader: Arc<CountingLoader>, profile: ProfileConfig) -> Translator {
    Translator::builder()
        .profile("default", profile)
        .loader(loader)
        .build()
        .unwrap()
}

// =============================================================================
// Resolution
// =============================================================================

#[tokio::test]
async fn test_absent_languages_everywhere() {
    let quiet = translator_with(
        counting_loader(),
        ProfileConfig::new("i18n").with_default_language("xx,yy"),
    );
    assert_eq!(quiet.tr("a:b", None, None).await, None);
    assert_eq!(quiet.tn("items", 1, None).await, None);

    let debug = translator_with(
        counting_loader(),
        ProfileConfig::new("i18n").with_default_language("xx,yy").with_debug(true),
    );
    let placeholder = debug.tr("a:b", None, None).await.unwrap();
    assert!(placeholder.is_placeholder());
    assert_eq!(placeholder, "/!\\ UNTRANSLATED KEY: \"a:b\" /!\\");
}

#[tokio::test]
async fn test_repeated_lookups_load_each_language_once() {
    let loader = counting_loader();
    let translator = translator_with(
        loader.clone(),
        ProfileConfig::new("i18n").with_default_language("fr,en"),
    );

    let first = translator.tr("only_en", None, None).await;
    for _ in 0..5 {
        assert_eq!(translator.tr("only_en", None, None).await, first);
    }

    assert_eq!(first.unwrap(), "English only");
    assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_fallback_order() {
    let translator = translator_with(
        counting_loader(),
        ProfileConfig::new("i18n").with_default_language("en"),
    );
    let fr_en = LanguageList::parse("fr,en");
    let en_fr = LanguageList::parse("en,fr");
    let subs = Substitutions::new().with("name", "Ann").with("count", 3);

    assert_eq!(
        translator.tr("only_en", None, Some(&fr_en)).await.unwrap(),
        "English only"
    );
    assert_eq!(
        translator.tr("greeting", Some(&subs), Some(&fr_en)).await.unwrap(),
        "Bonjour Ann"
    );
    assert_eq!(
        translator.tr("greeting", Some(&subs), Some(&en_fr)).await.unwrap(),
        "Hello Ann, you have 3 items"
    );
}

#[tokio::test]
async fn test_hierarchical_keys() {
    let translator = translator_with(
        counting_loader(),
        ProfileConfig::new("i18n").with_default_language("en"),
    );

    assert_eq!(translator.tr("a:b", None, None).await.unwrap(), "hello");
    assert_eq!(translator.tr("a:c", None, None).await, None);
    assert_eq!(translator.tr("a", None, None).await, None);

    let engine = translator.engine().unwrap();
    assert_eq!(engine.resolve_set("a", None).await, None);
}

#[tokio::test]
async fn test_plural_selection() {
    let translator = translator_with(
        counting_loader(),
        ProfileConfig::new("i18n").with_default_language("en"),
    );

    for (number, expected) in [
        (0, "no items"),
        (1, "one item"),
        (3, "one item"),
        (5, "many items"),
        (100, "many items"),
        (-1, "no items"),
    ] {
        assert_eq!(
            translator.tn("items", number, None).await.unwrap(),
            expected,
            "number {number}"
        );
    }
}

// =============================================================================
// Caching
// =============================================================================

#[tokio::test]
async fn test_cache_write_through() {
    let cache = Arc::new(InMemoryCache::new());
    let translator = Translator::builder()
        .profile(
            "default",
            ProfileConfig::new("i18n").with_default_language("en").with_cache("shared"),
        )
        .cache_backend("shared", cache.clone())
        .loader(counting_loader())
        .build()
        .unwrap();

    translator.tr("a:b", None, None).await.unwrap();
    translator.tn("items", 2, None).await.unwrap();

    let scalar: Option<CachedValue> =
        lexis::lexis_cache::get(cache.as_ref(), "lexis.default.en.a:b").await.unwrap();
    assert_eq!(scalar, Some(CachedValue::Scalar("hello".to_string())));

    let set: Option<CachedValue> =
        lexis::lexis_cache::get(cache.as_ref(), "lexis.default.en.items").await.unwrap();
    match set {
        Some(CachedValue::Set(set)) => assert_eq!(set.select(2), Some("one item")),
        other => panic!("expected a cached plural set, got {other:?}"),
    }

    let tree: Option<ResourceTree> =
        lexis::lexis_cache::get(cache.as_ref(), "lexis.default.en").await.unwrap();
    let tree = tree.unwrap();
    assert_eq!(tree.walk(["a", "b"]).and_then(ResourceTree::as_scalar), Some("hello"));
    assert_eq!(tree.leaf_count(), 6);
}

#[tokio::test]
async fn test_shared_cache_spares_second_translator_the_loader() {
    let cache = Arc::new(InMemoryCache::new());
    let profile = ProfileConfig::new("i18n")
        .with_default_language("en")
        .with_cache("shared");

    let first_loader = counting_loader();
    let first = Translator::builder()
        .profile("default", profile.clone())
        .cache_backend("shared", cache.clone())
        .loader(first_loader.clone())
        .build()
        .unwrap();
    first.tr("a:b", None, None).await.unwrap();

    let second_loader = counting_loader();
    let second = Translator::builder()
        .profile("default", profile)
        .cache_backend("shared", cache.clone())
        .loader(second_loader.clone())
        .build()
        .unwrap();

    assert_eq!(second.tr("a:b", None, None).await.unwrap(), "hello");
    assert_eq!(second.tr("only_en", None, None).await.unwrap(), "English only");
    assert_eq!(first_loader.calls.load(Ordering::SeqCst), 1);
    assert_eq!(second_loader.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_cached_string_in_place_of_tree_is_reloaded() {
    let cache = Arc::new(InMemoryCache::new());
    cache
        .set_json("lexis.default.en", "\"junk\"".to_string(), None)
        .await
        .unwrap();

    let loader = counting_loader();
    let translator = Translator::builder()
        .profile(
            "default",
            ProfileConfig::new("i18n").with_default_language("en").with_cache("shared"),
        )
        .cache_backend("shared", cache.clone())
        .loader(loader.clone())
        .build()
        .unwrap();

    assert_eq!(translator.tr("a:b", None, None).await.unwrap(), "hello");
    assert_eq!(loader.calls.load(Ordering::SeqCst), 1);

    let tree: Option<ResourceTree> =
        lexis::lexis_cache::get(cache.as_ref(), "lexis.default.en").await.unwrap();
    assert!(tree.is_some_and(|tree| tree.as_node().is_some()));
}

// =============================================================================
// Files and configuration
// =============================================================================

#[tokio::test]
async fn test_file_resources_with_cascading_roots() {
    let app = tempfile::tempdir().unwrap();
    let vendor = tempfile::tempdir().unwrap();
    write_resource(app.path(), "i18n", "en", r#"{"title": "App title"}"#);
    write_resource(
        vendor.path(),
        "i18n",
        "en",
        r#"{"title": "Vendor title", "footer": "Vendor footer"}"#,
    );
    write_resource(vendor.path(), "i18n", "de", r#"{"title": "Titel"}"#);

    let translator = Translator::builder()
        .profile("default", ProfileConfig::new("i18n").with_default_language("de,en"))
        .search_root(app.path())
        .search_root(vendor.path())
        .build()
        .unwrap();

    let en = LanguageList::parse("en");
    assert_eq!(translator.tr("title", None, None).await.unwrap(), "Titel");
    assert_eq!(translator.tr("title", None, Some(&en)).await.unwrap(), "App title");
    // The app's en.json shadows the vendor's entirely
    assert_eq!(translator.tr("footer", None, Some(&en)).await, None);
}

#[tokio::test]
async fn test_profiles_from_toml_file() {
    let root = tempfile::tempdir().unwrap();
    write_resource(root.path(), "site", "en", r#"{"title": "Site"}"#);
    write_resource(root.path(), "admin", "en", r#"{"title": "Admin"}"#);

    let config = root.path().join("lexis.toml");
    fs::write(
        &config,
        r#"
        [default]
        location = "site"
        default_language = "en"

        [admin]
        location = "admin"
        default_language = "en"
        debug = true
        cache = "memory"
        "#,
    )
    .unwrap();

    let source = ProfileSource::builder()
        .add_file_auto(config.to_string_lossy())
        .build()
        .unwrap();
    let translator = Translator::builder()
        .profiles(source)
        .search_root(root.path())
        .build()
        .unwrap();

    assert_eq!(translator.tr("title", None, None).await.unwrap(), "Site");
    assert!(!translator.is_debug());

    assert!(translator.setup("admin"));
    assert_eq!(translator.active_profile(), "admin");
    assert_eq!(translator.tr("title", None, None).await.unwrap(), "Admin");
    assert!(translator.is_debug());
    assert!(translator.tr("missing", None, None).await.unwrap().is_placeholder());

    assert!(!translator.setup("nonexistent"));
    assert_eq!(translator.active_profile(), "admin");
}

#[tokio::test]
async fn test_accept_language_drives_fallback() {
    let translator = translator_with(
        counting_loader(),
        ProfileConfig::new("i18n").with_default_language("en"),
    );
    let languages = LanguageList::from_accept_language("de-DE, fr;q=0.9, en;q=0.5");
    let subs = Substitutions::new().with("name", "Zoé");

    assert_eq!(
        translator.tr("greeting", Some(&subs), Some(&languages)).await.unwrap(),
        "Bonjour Zoé"
    );
}

#[tokio::test]
async fn test_concurrent_translations_share_one_load() {
    let loader = counting_loader();
    let translator = Arc::new(translator_with(
        loader.clone(),
        ProfileConfig::new("i18n").with_default_language("en"),
    ));

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let translator = Arc::clone(&translator);
            tokio::spawn(async move { translator.tn("items", i, None).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_some());
    }
    assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
}

//! Translation keys and cache key construction

use crate::{I18nError, Result};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Separator between key segments.
pub const KEY_DELIMITER: char = ':';

/// Namespace prepended to every cache key.
pub const CACHE_NAMESPACE: &str = "lexis";

/// A validated translation key such as `menu:file:open`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(String);

impl Key {
    /// Validate a key.
    ///
    /// Fails when the key is empty or any of its segments is empty
    /// (`"a::b"`, `":a"`, `"a:"`).
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() || raw.split(KEY_DELIMITER).any(str::is_empty) {
            return Err(I18nError::InvalidKey(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Path segments, outermost first.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(KEY_DELIMITER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Key {
    type Err = I18nError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Cache key for a whole language tree: `lexis.<profile>.<language>`.
pub fn tree_cache_key(profile: &str, language: &str) -> String {
    format!("{}.{}.{}", CACHE_NAMESPACE, escape(profile), escape(language))
}

/// Cache key for one resolved value: `lexis.<profile>.<language>.<key>`.
pub fn value_cache_key(profile: &str, language: &str, key: &Key) -> String {
    format!(
        "{}.{}.{}.{}",
        CACHE_NAMESPACE,
        escape(profile),
        escape(language),
        escape(key.as_str())
    )
}

// Components are joined with '.', so a '.' inside one of them must not be
// able to produce the same key as a different triple.
fn escape(component: &str) -> Cow<'_, str> {
    if !component.contains(['%', '.']) {
        return Cow::Borrowed(component);
    }
    Cow::Owned(component.replace('%', "%25").replace('.', "%2E"))
}

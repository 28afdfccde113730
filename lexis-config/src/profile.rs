// Profile configuration snapshot

use crate::{ConfigError, ConfigValidator, Result, Validate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Name of the profile used when none is selected.
pub const DEFAULT_PROFILE: &str = "default";

/// Resource directory used when a profile does not name one.
pub const DEFAULT_LOCATION: &str = "i18n";

/// Cache lifetime for trees and resolved values, in seconds.
pub const DEFAULT_CACHE_TTL_SECS: u64 = 3600;

/// Field names accepted in profile configuration, longest first so that
/// suffix matching on flattened keys picks `cache_ttl_secs` over `cache`.
pub(crate) const FIELDS: [&str; 5] = [
    "default_language",
    "cache_ttl_secs",
    "location",
    "debug",
    "cache",
];

/// Configuration for one named profile.
///
/// ```
/// use lexis_config::ProfileConfig;
///
/// let profile = ProfileConfig::new("locales")
///     .with_default_language("en-us,en")
///     .with_debug(true);
///
/// assert_eq!(profile.location, "locales");
/// assert!(profile.debug);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Resource directory, relative to the loader's search roots
    pub location: String,
    /// Comma-delimited language preference list used when callers pass none
    pub default_language: Option<String>,
    /// Return diagnostic placeholders instead of absence for missing keys
    pub debug: bool,
    /// Name of the cache backend to use, if any
    pub cache: Option<String>,
    /// Lifetime of cache entries written for this profile
    pub cache_ttl_secs: u64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            default_language: None,
            debug: false,
            cache: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl ProfileConfig {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Self::default()
        }
    }

    pub fn with_default_language(mut self, languages: impl Into<String>) -> Self {
        self.default_language = Some(languages.into());
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_cache(mut self, backend: impl Into<String>) -> Self {
        self.cache = Some(backend.into());
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl_secs = ttl.as_secs();
        self
    }

    /// Cache entry lifetime.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Deserialize and validate a profile from a JSON object.
    pub fn from_value(value: Value) -> Result<Self> {
        let profile: Self = serde_json::from_value(value)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        profile.validate()?;
        Ok(profile)
    }
}

impl Validate for ProfileConfig {
    fn validate(&self) -> Result<()> {
        ConfigValidator::not_empty(&self.location, "location")?;
        if let Some(ref languages) = self.default_language {
            if languages.split(',').all(|code| code.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    field: "default_language".to_string(),
                    value: languages.clone(),
                });
            }
        }
        if let Some(ref cache) = self.cache {
            ConfigValidator::not_empty(cache, "cache")?;
        }
        ConfigValidator::in_range(self.cache_ttl_secs, 1, u64::MAX, "cache_ttl_secs")?;
        Ok(())
    }
}

/// Convert a raw string (from `.env` files or the environment) to the JSON
/// type the named field expects.
pub(crate) fn coerce_field(field: &str, raw: &str) -> Result<Value> {
    let invalid = || ConfigError::InvalidValue {
        field: field.to_string(),
        value: raw.to_string(),
    };

    match field {
        "debug" => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Value::Bool(true)),
            "0" | "false" | "no" | "off" | "" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        "cache_ttl_secs" => raw
            .trim()
            .parse::<u64>()
            .map(Value::from)
            .map_err(|_| invalid()),
        "cache" | "default_language" if raw.trim().is_empty() => Ok(Value::Null),
        _ => Ok(Value::String(raw.to_string())),
    }
}

/// Split a flattened `<profile>_<field>` key into its parts.
pub(crate) fn split_flat_key(key: &str) -> Option<(&str, &'static str)> {
    FIELDS.iter().find_map(|field| {
        key.strip_suffix(field)
            .and_then(|rest| rest.strip_suffix('_'))
            .filter(|profile| !profile.is_empty())
            .map(|profile| (profile, *field))
    })
}

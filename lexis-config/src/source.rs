// ProfileSource - named profile configurations

use crate::loader::{ConfigLoader, FileFormat};
use crate::profile::{ProfileConfig, coerce_field, split_flat_key};
use crate::{ConfigError, EnvLoader, Result};
use lexis_log::{debug, warn};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;

/// All known profiles, keyed by name.
///
/// Profiles are kept as raw JSON objects so later sources (files, then the
/// environment) can override single fields; they are deserialized and
/// validated when requested.
#[derive(Debug, Clone, Default)]
pub struct ProfileSource {
    profiles: HashMap<String, Map<String, Value>>,
}

impl ProfileSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder for a source assembled from files and the environment.
    pub fn builder() -> ProfileSourceBuilder {
        ProfileSourceBuilder::new()
    }

    /// Register a fully-formed profile, replacing any previous definition.
    pub fn insert(&mut self, name: impl Into<String>, profile: &ProfileConfig) -> Result<()> {
        let value = serde_json::to_value(profile)
            .map_err(|e| ConfigError::DeserializationError(e.to_string()))?;
        if let Value::Object(map) = value {
            self.profiles.insert(name.into(), map);
        }
        Ok(())
    }

    /// Builder-style [`ProfileSource::insert`].
    pub fn with_profile(mut self, name: impl Into<String>, profile: &ProfileConfig) -> Result<Self> {
        self.insert(name, profile)?;
        Ok(self)
    }

    /// Merge a configuration file into the source.
    ///
    /// JSON and TOML files map profile names to tables of fields; `.env`
    /// files use flattened `<PREFIX>_<PROFILE>_<FIELD>=value` lines.
    pub fn load_file(&mut self, path: impl AsRef<Path>, format: FileFormat) -> Result<()> {
        let path = path.as_ref();
        let data = ConfigLoader::new(format).load_file(path)?;

        match format {
            FileFormat::Env => {
                let pairs = match data {
                    Value::Object(map) => map
                        .into_iter()
                        .filter_map(|(k, v)| v.as_str().map(|s| (k, s.to_string())))
                        .collect::<Vec<_>>(),
                    _ => Vec::new(),
                };
                let flat = EnvLoader::default().filter(pairs);
                self.merge_flat(flat)?;
            }
            FileFormat::Json | FileFormat::Toml => self.merge_nested(data)?,
        }

        debug!("Loaded profile configuration from {}", path.display());
        Ok(())
    }

    /// Merge `LEXIS_<PROFILE>_<FIELD>` variables from the process
    /// environment.
    pub fn load_env(&mut self) -> Result<()> {
        self.merge_flat(EnvLoader::default().load())
    }

    /// Merge a nested `{profile: {field: value}}` document.
    pub fn merge_nested(&mut self, data: Value) -> Result<()> {
        let Value::Object(root) = data else {
            return Err(ConfigError::ParseError(
                "profile configuration must be a table of profiles".to_string(),
            ));
        };

        for (name, fields) in root {
            match fields {
                Value::Object(fields) => {
                    self.profiles.entry(name).or_default().extend(fields);
                }
                _ => {
                    warn!("Ignoring profile {}: expected a table of fields", name);
                }
            }
        }

        Ok(())
    }

    /// Merge flattened `<profile>_<field>` keys (already lowercased and
    /// stripped of their prefix).
    pub fn merge_flat(&mut self, flat: HashMap<String, String>) -> Result<()> {
        for (key, raw) in flat {
            let Some((profile, field)) = split_flat_key(&key) else {
                continue;
            };
            let value = coerce_field(field, &raw)?;
            self.profiles
                .entry(profile.to_string())
                .or_default()
                .insert(field.to_string(), value);
        }
        Ok(())
    }

    /// Resolve and validate a profile by name.
    pub fn profile(&self, name: &str) -> Result<ProfileConfig> {
        let fields = self
            .profiles
            .get(name)
            .ok_or_else(|| ConfigError::ProfileNotFound(name.to_string()))?;

        ProfileConfig::from_value(Value::Object(fields.clone()))
    }

    /// Check if a profile is defined
    pub fn has(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Defined profile names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        names
    }
}

/// Builder for [`ProfileSource`].
///
/// Sources are applied in order: `.env` file, configuration files, then
/// the process environment, so environment variables win.
#[derive(Default)]
pub struct ProfileSourceBuilder {
    source: ProfileSource,
    load_env: bool,
    load_dotenv: bool,
    dotenv_path: Option<String>,
    config_files: Vec<(String, Option<FileFormat>)>,
}

impl ProfileSourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing set of profiles.
    pub fn with_source(mut self, source: ProfileSource) -> Self {
        self.source = source;
        self
    }

    /// Enable loading from environment variables
    pub fn load_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Enable loading a `.env` file into the process environment
    pub fn load_dotenv(mut self, path: Option<String>) -> Self {
        self.load_dotenv = true;
        self.dotenv_path = path;
        self
    }

    /// Add configuration file to load
    pub fn add_file(mut self, path: impl Into<String>, format: FileFormat) -> Self {
        self.config_files.push((path.into(), Some(format)));
        self
    }

    /// Add configuration file, detecting the format from its name
    pub fn add_file_auto(mut self, path: impl Into<String>) -> Self {
        self.config_files.push((path.into(), None));
        self
    }

    /// Build the profile source
    pub fn build(self) -> Result<ProfileSource> {
        let mut source = self.source;

        if self.load_dotenv {
            let loaded = match self.dotenv_path.as_deref() {
                Some(path) => dotenvy::from_path(path).map(|_| ()),
                None => dotenvy::dotenv().map(|_| ()),
            };
            if let Err(e) = loaded {
                debug!("No .env file loaded: {}", e);
            }
        }

        for (path, format) in self.config_files {
            let format = match format {
                Some(format) => format,
                None => ConfigLoader::auto(&path)?.format(),
            };
            source.load_file(&path, format)?;
        }

        if self.load_env {
            source.load_env()?;
        }

        Ok(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_insert_and_resolve() {
        let source = ProfileSource::new()
            .with_profile("default", &ProfileConfig::new("lang").with_debug(true))
            .unwrap();

        let profile = source.profile("default").unwrap();
        assert_eq!(profile.location, "lang");
        assert!(profile.debug);
        assert!(source.has("default"));
        assert!(matches!(
            source.profile("missing"),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_later_sources_override_fields() {
        let mut source = ProfileSource::new();
        source
            .merge_nested(json!({"default": {"location": "a", "default_language": "en"}}))
            .unwrap();

        let mut flat = HashMap::new();
        flat.insert("default_location".to_string(), "b".to_string());
        flat.insert("admin_debug".to_string(), "true".to_string());
        source.merge_flat(flat).unwrap();

        let default = source.profile("default").unwrap();
        assert_eq!(default.location, "b");
        assert_eq!(default.default_language.as_deref(), Some("en"));

        let admin = source.profile("admin").unwrap();
        assert!(admin.debug);
        assert_eq!(admin.location, "i18n");
        assert_eq!(source.names(), vec!["admin".to_string(), "default".to_string()]);
    }

    #[test]
    fn test_non_table_root_is_rejected() {
        let mut source = ProfileSource::new();
        assert!(source.merge_nested(json!(["default"])).is_err());
    }

    #[test]
    fn test_load_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
            [default]
            location = "i18n"
            default_language = "en"

            [shop]
            location = "shop/i18n"
            default_language = "de,en"
            cache = "memory"
            cache_ttl_secs = 120
            "#
        )
        .unwrap();

        let source = ProfileSource::builder()
            .add_file_auto(file.path().to_string_lossy())
            .build()
            .unwrap();

        let shop = source.profile("shop").unwrap();
        assert_eq!(shop.location, "shop/i18n");
        assert_eq!(shop.cache.as_deref(), Some("memory"));
        assert_eq!(shop.cache_ttl_secs, 120);
    }

    #[test]
    fn test_load_env_file() {
        let mut file = tempfile::Builder::new().suffix(".env").tempfile().unwrap();
        writeln!(file, "LEXIS_DEFAULT_LOCATION=lang").unwrap();
        writeln!(file, "LEXIS_DEFAULT_DEBUG=1").unwrap();
        writeln!(file, "UNRELATED=1").unwrap();

        let mut source = ProfileSource::new();
        source.load_file(file.path(), FileFormat::Env).unwrap();

        let profile = source.profile("default").unwrap();
        assert_eq!(profile.location, "lang");
        assert!(profile.debug);
    }

    #[test]
    fn test_invalid_flat_value_is_reported() {
        let mut flat = HashMap::new();
        flat.insert("default_cache_ttl_secs".to_string(), "forever".to_string());

        let mut source = ProfileSource::new();
        assert!(matches!(
            source.merge_flat(flat),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}

//! Error types for i18n operations

use thiserror::Error;

/// Errors that can occur while loading or resolving translations.
///
/// None of these reach callers of [`Translator::tr`](crate::Translator::tr)
/// or [`Translator::tn`](crate::Translator::tn); they are logged and the
/// lookup moves on to the next language.
#[derive(Debug, Error)]
pub enum I18nError {
    /// Key is empty or has an empty segment
    #[error("Invalid key: {0:?}")]
    InvalidKey(String),

    /// Language code is empty
    #[error("Invalid language code: {0:?}")]
    InvalidLanguage(String),

    /// No resource exists for the language
    #[error("No resource for language: {0}")]
    LanguageNotFound(String),

    /// Resource exists but holds no translations
    #[error("Resource for language {0} is empty")]
    EmptyResource(String),

    /// Resource is not a tree of strings
    #[error("Failed to parse resource: {0}")]
    ParseError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parse error
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Profile configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] lexis_config::ConfigError),
}

// Profile configuration for Lexis
//
// A profile names a resource location, a default language preference list,
// a debug flag, and an optional cache backend. Profiles come from JSON,
// TOML or .env files and can be overridden through LEXIS_* environment
// variables.

pub mod env;
pub mod error;
pub mod loader;
pub mod profile;
pub mod source;
pub mod validation;

pub use env::{ENV_PREFIX, EnvLoader};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat};
pub use profile::{DEFAULT_CACHE_TTL_SECS, DEFAULT_LOCATION, DEFAULT_PROFILE, ProfileConfig};
pub use source::{ProfileSource, ProfileSourceBuilder};
pub use validation::{ConfigValidator, Validate};

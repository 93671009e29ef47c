//! confmerge: layered configuration loading and merging
//!
//! Loads configuration files (JSON, INI, TOML, YAML), folds them into one
//! mapping under a merge policy, and layers environment variables and explicit
//! overrides on top with a fixed precedence (Explicit > Env > Files > Defaults).

pub mod env;
pub mod error;
pub mod merge;
pub mod settings;
pub mod source;

pub use env::{collect_env, EnvSettings};
pub use error::{ConfigError, Result};
pub use merge::{combine, fold, MergePolicy};
pub use settings::{
    resolve, resolve_with_env, ConfigFileSpec, ResolvedConfig, Schema, SettingsOptions,
};
pub use source::{
    load_sources, ConfigSource, LoadOutcome, LoadStatus, LoadedSource, SourceFormat,
};

/// A decoded configuration value.
pub use serde_json::Value;

/// A decoded mapping from setting name to value.
pub type Mapping = serde_json::Map<String, Value>;

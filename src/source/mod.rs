//! Configuration sources (files) and their loading

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub mod decode;
pub mod loader;

pub use loader::{load_sources, LoadOutcome, LoadStatus, LoadedSource};

/// File format of a configuration source, inferred from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Json,
    Ini,
    Toml,
    Yaml,
}

impl SourceFormat {
    /// Map a file extension (without the dot, any case) to a format.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "ini" | "cfg" => Some(Self::Ini),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::from_extension(ext).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
            extension: ext.to_string(),
        })
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "JSON",
            Self::Ini => "INI",
            Self::Toml => "TOML",
            Self::Yaml => "YAML",
        };
        f.pad(name)
    }
}

/// One configuration file to load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub format: SourceFormat,
    /// Absence is fatal when set.
    pub required: bool,
}

impl ConfigSource {
    /// Build a source, inferring its format from the extension. No I/O.
    pub fn new(path: impl Into<PathBuf>, required: bool) -> Result<Self> {
        let path = path.into();
        let format = SourceFormat::from_path(&path)?;
        Ok(Self { path, format, required })
    }

    pub fn optional(path: impl Into<PathBuf>) -> Result<Self> {
        Self::new(path, false)
    }

    pub fn required(path: impl Into<PathBuf>) -> Result<Self> {
        Self::new(path, true)
    }
}

//! Error types for configuration resolution

use crate::source::SourceFormat;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while resolving configuration. Every variant aborts the
/// whole resolution; there is no partial result.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required source does not exist.
    #[error("Config file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// A source exists but its content cannot be decoded.
    #[error("Failed to parse {format} config file {}: {message}", path.display())]
    Parse { path: PathBuf, format: SourceFormat, message: String },

    /// A source's extension maps to no known decoder.
    #[error("Unsupported config extension '.{extension}' for file {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// The options themselves are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Failed reading config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read env file {}: {message}", path.display())]
    EnvFile { path: PathBuf, message: String },

    /// The resolved mapping does not fit the requested type.
    #[error("Failed to extract settings: {0}")]
    Extract(String),
}

impl ConfigError {
    /// Path of the file this error originates from, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            ConfigError::FileNotFound { path }
            | ConfigError::Parse { path, .. }
            | ConfigError::UnsupportedFormat { path, .. }
            | ConfigError::Io { path, .. }
            | ConfigError::EnvFile { path, .. } => Some(path),
            ConfigError::InvalidConfiguration(_) | ConfigError::Extract(_) => None,
        }
    }
}

//! Recognized options on a settings declaration

use crate::env::EnvSettings;
use crate::error::{ConfigError, Result};
use crate::merge::MergePolicy;
use crate::source::ConfigSource;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// The `config_file` option: one path or an ordered list (last wins).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ConfigFileSpec {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl ConfigFileSpec {
    /// Normalized path list; a single path is a one-element list.
    pub fn paths(&self) -> Vec<&Path> {
        match self {
            ConfigFileSpec::One(path) => vec![path.as_path()],
            ConfigFileSpec::Many(paths) => paths.iter().map(PathBuf::as_path).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ConfigFileSpec::Many(paths) if paths.is_empty())
    }
}

impl From<&str> for ConfigFileSpec {
    fn from(path: &str) -> Self {
        ConfigFileSpec::One(PathBuf::from(path))
    }
}

impl From<PathBuf> for ConfigFileSpec {
    fn from(path: PathBuf) -> Self {
        ConfigFileSpec::One(path)
    }
}

impl<P: Into<PathBuf>> From<Vec<P>> for ConfigFileSpec {
    fn from(paths: Vec<P>) -> Self {
        ConfigFileSpec::Many(paths.into_iter().map(Into::into).collect())
    }
}

/// Options controlling where settings come from and how files combine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SettingsOptions {
    pub config_file: Option<ConfigFileSpec>,
    /// Every listed source must exist; the list must be non-empty.
    pub config_file_required: bool,
    pub config_merge: bool,
    pub config_merge_unique: bool,
    pub env_prefix: String,
    pub env_nested_delimiter: Option<String>,
    pub env_file: Option<PathBuf>,
}

impl Default for SettingsOptions {
    fn default() -> Self {
        Self {
            config_file: None,
            config_file_required: false,
            config_merge: true,
            config_merge_unique: false,
            env_prefix: String::new(),
            env_nested_delimiter: None,
            env_file: None,
        }
    }
}

impl SettingsOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn config_file(mut self, spec: impl Into<ConfigFileSpec>) -> Self {
        self.config_file = Some(spec.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.config_file_required = required;
        self
    }

    pub fn merge(mut self, merge: bool) -> Self {
        self.config_merge = merge;
        self
    }

    pub fn merge_unique(mut self, unique: bool) -> Self {
        self.config_merge_unique = unique;
        self
    }

    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    pub fn env_nested_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.env_nested_delimiter = Some(delimiter.into());
        self
    }

    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Static consistency check; performs no I/O.
    pub fn validate(&self) -> Result<()> {
        let empty = self.config_file.as_ref().map_or(true, ConfigFileSpec::is_empty);
        if self.config_file_required && empty {
            return Err(ConfigError::InvalidConfiguration(
                "config_file_required is set but config_file is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Sources to load, in precedence order. Validates first, then checks
    /// every extension before any file is touched.
    pub fn sources(&self) -> Result<Vec<ConfigSource>> {
        self.validate()?;
        let Some(spec) = &self.config_file else {
            return Ok(Vec::new());
        };
        spec.paths()
            .into_iter()
            .map(|path| ConfigSource::new(path, self.config_file_required))
            .collect()
    }

    pub fn merge_policy(&self) -> MergePolicy {
        MergePolicy { merge: self.config_merge, merge_unique: self.config_merge_unique }
    }

    pub fn env_settings(&self) -> EnvSettings {
        EnvSettings {
            prefix: self.env_prefix.clone(),
            nested_delimiter: self.env_nested_delimiter.clone(),
            env_file: self.env_file.clone(),
        }
    }
}

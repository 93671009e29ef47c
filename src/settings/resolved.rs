//! Resolved configuration with source provenance

use crate::error::{ConfigError, Result};
use crate::source::LoadedSource;
use crate::{Mapping, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// The final mapping plus which files contributed to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedConfig {
    pub values: Mapping,
    /// Every configured source in precedence order, including skipped ones.
    pub sources: Vec<LoadedSource>,
}

impl ResolvedConfig {
    /// Get a value by dot-separated path.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.values.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(Value::as_str)
    }

    pub fn get_i64(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(Value::as_i64)
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(Value::as_bool)
    }

    /// Hand the mapping to a serde-based settings type.
    pub fn extract<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(Value::Object(self.values.clone()))
            .map_err(|e| ConfigError::Extract(e.to_string()))
    }

    pub fn into_values(self) -> Mapping {
        self.values
    }
}

//! Environment tier: process variables and dotenv files
//!
//! Only variables naming a declared field are picked up. Values arrive as
//! strings and are not coerced. Process variables override dotenv values;
//! nested mappings from both are deep-merged.

use crate::error::{ConfigError, Result};
use crate::{Mapping, Value};
use figment::providers::Env;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// How environment variables map onto setting names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EnvSettings {
    /// Stripped from variable names before matching (case-insensitive).
    pub prefix: String,
    /// Splits a variable name into nested keys, e.g. `__` turns
    /// `DB__HOST` into `{db: {host: ..}}`.
    pub nested_delimiter: Option<String>,
    /// Dotenv file read at the same tier as process variables.
    pub env_file: Option<PathBuf>,
}

impl EnvSettings {
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), ..Self::default() }
    }

    /// Key path for a variable name, or `None` if the variable is not a
    /// setting. Without declared fields, only prefixed variables qualify.
    fn key_path(&self, name: &str, fields: &[String]) -> Option<Vec<String>> {
        let lowered = name.to_lowercase();
        let stripped = lowered.strip_prefix(&self.prefix.to_lowercase())?;
        if stripped.is_empty() {
            return None;
        }

        let segments: Vec<String> = match &self.nested_delimiter {
            Some(delim) if !delim.is_empty() => {
                stripped.split(delim.to_lowercase().as_str()).map(str::to_string).collect()
            }
            _ => vec![stripped.to_string()],
        };
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        let accepted = if fields.is_empty() {
            !self.prefix.is_empty()
        } else {
            fields.iter().any(|f| f.eq_ignore_ascii_case(&segments[0]))
        };
        accepted.then_some(segments)
    }
}

/// Collect the environment tier mapping for the given declared fields.
pub fn collect_env(settings: &EnvSettings, fields: &[String]) -> Result<Mapping> {
    let mut result = match &settings.env_file {
        Some(path) => read_env_file(settings, path, fields)?,
        None => Mapping::new(),
    };
    deep_overlay(&mut result, process_env(settings, fields));
    Ok(result)
}

/// Variables from the process environment. Values are kept as raw strings
/// unless they hold a JSON array or object.
fn process_env(settings: &EnvSettings, fields: &[String]) -> Mapping {
    let mut result = Mapping::new();
    // `prefixed` strips the prefix case-insensitively; `key_path` expects it back
    for (key, raw) in Env::prefixed(&settings.prefix).iter() {
        let name = format!("{}{}", settings.prefix, key.as_str());
        if let Some(segments) = settings.key_path(&name, fields) {
            insert_path(&mut result, &segments, parse_env_value(&raw));
        }
    }
    result
}

fn read_env_file(settings: &EnvSettings, path: &Path, fields: &[String]) -> Result<Mapping> {
    if !path.is_file() {
        tracing::debug!("Skipping missing env file {}", path.display());
        return Ok(Mapping::new());
    }

    let env_error = |message: String| ConfigError::EnvFile { path: path.to_path_buf(), message };
    let entries = dotenvy::from_path_iter(path).map_err(|e| env_error(e.to_string()))?;

    let mut result = Mapping::new();
    let mut count = 0usize;
    for entry in entries {
        let (name, raw) = entry.map_err(|e| env_error(e.to_string()))?;
        let Some(segments) = settings.key_path(&name, fields) else {
            continue;
        };
        insert_path(&mut result, &segments, parse_env_value(&raw));
        count += 1;
    }
    tracing::debug!("Read {} settings from env file {}", count, path.display());
    Ok(result)
}

/// JSON arrays and objects are decoded; everything else stays a string.
fn parse_env_value(raw: &str) -> Value {
    let trimmed = raw.trim_start();
    if trimmed.starts_with('[') || trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str(raw) {
            return value;
        }
    }
    Value::String(raw.to_string())
}

/// A scalar sitting where a nested key needs a mapping is replaced.
fn insert_path(root: &mut Mapping, segments: &[String], value: Value) {
    let Some((last, parents)) = segments.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        let slot = current.entry(segment.clone()).or_insert_with(|| Value::Object(Mapping::new()));
        if !slot.is_object() {
            *slot = Value::Object(Mapping::new());
        }
        let Value::Object(map) = slot else {
            return;
        };
        current = map;
    }
    current.insert(last.clone(), value);
}

/// Mappings merge by key; anything else in `overlay` replaces `base`.
fn deep_overlay(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match value {
            Value::Object(incoming) => match base.get_mut(&key) {
                Some(Value::Object(existing)) => deep_overlay(existing, incoming),
                _ => {
                    base.insert(key, Value::Object(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use serde_json::json;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_key_path_matches_declared_fields() {
        let settings = EnvSettings::default();
        let declared = fields(&["log_level"]);

        assert_eq!(settings.key_path("LOG_LEVEL", &declared), Some(vec!["log_level".to_string()]));
        assert_eq!(settings.key_path("PATH", &declared), None);
    }

    #[test]
    fn test_key_path_strips_prefix_and_splits() {
        let settings = EnvSettings {
            prefix: "APP_".to_string(),
            nested_delimiter: Some("__".to_string()),
            env_file: None,
        };
        let declared = fields(&["db"]);

        assert_eq!(
            settings.key_path("APP_DB__HOST", &declared),
            Some(vec!["db".to_string(), "host".to_string()])
        );
        assert_eq!(settings.key_path("DB__HOST", &declared), None);
        assert_eq!(settings.key_path("APP_DB____HOST", &declared), None);
    }

    #[test]
    fn test_key_path_without_fields_needs_prefix() {
        assert_eq!(EnvSettings::default().key_path("HOME", &[]), None);
        assert_eq!(
            EnvSettings::with_prefix("APP_").key_path("APP_NAME", &[]),
            Some(vec!["name".to_string()])
        );
    }

    #[test]
    fn test_parse_env_value() {
        assert_eq!(parse_env_value("WARNING"), json!("WARNING"));
        assert_eq!(parse_env_value("[1, 2]"), json!([1, 2]));
        assert_eq!(parse_env_value("{\"a\": 1}"), json!({"a": 1}));
        assert_eq!(parse_env_value("[not json"), json!("[not json"));
    }

    fn map(value: Value) -> Mapping {
        match value {
            Value::Object(m) => m,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_deep_overlay_merges_mappings_only() {
        let mut base = map(json!({"db": {"host": "a", "port": 1}, "tags": ["x"], "mode": "x"}));
        let overlay = map(json!({"db": {"port": 2}, "tags": ["y"], "mode": {"now": "map"}}));

        deep_overlay(&mut base, overlay);

        assert_eq!(
            Value::Object(base),
            json!({"db": {"host": "a", "port": 2}, "tags": ["y"], "mode": {"now": "map"}})
        );
    }

    #[test]
    fn test_insert_path_replaces_scalar_parent() {
        let mut root = map(json!({"db": "flat"}));

        insert_path(&mut root, &fields(&["db", "host"]), json!("x"));

        assert_eq!(Value::Object(root), json!({"db": {"host": "x"}}));
    }

    #[test]
    fn test_process_env_picks_declared_fields() {
        Jail::expect_with(|jail| {
            jail.set_env("LOG_LEVEL", "WARNING");
            jail.set_env("UNRELATED_SETTING", "ignored");

            let env = collect_env(&EnvSettings::default(), &fields(&["log_level"]))
                .map_err(|e| e.to_string())?;

            assert_eq!(Value::Object(env), json!({"log_level": "WARNING"}));
            Ok(())
        });
    }

    #[test]
    fn test_process_env_prefix_and_nesting() {
        Jail::expect_with(|jail| {
            jail.set_env("APP_DB__HOST", "db.internal");
            jail.set_env("APP_DB__PORT", "6543");
            jail.set_env("DB__USER", "no-prefix");

            let settings = EnvSettings {
                prefix: "APP_".to_string(),
                nested_delimiter: Some("__".to_string()),
                env_file: None,
            };
            let env = collect_env(&settings, &fields(&["db"])).map_err(|e| e.to_string())?;

            assert_eq!(env["db"]["host"], "db.internal");
            assert_eq!(env["db"]["port"], "6543");
            assert!(env["db"].get("user").is_none());
            Ok(())
        });
    }

    #[test]
    fn test_dotenv_values_lose_to_process_env() {
        Jail::expect_with(|jail| {
            jail.create_file(".env", "LOG_LEVEL=DEBUG\nNAME=from-dotenv\nIGNORED=1\n")?;
            jail.set_env("LOG_LEVEL", "ERROR");

            let settings =
                EnvSettings { env_file: Some(PathBuf::from(".env")), ..EnvSettings::default() };
            let env = collect_env(&settings, &fields(&["log_level", "name"]))
                .map_err(|e| e.to_string())?;

            assert_eq!(env["log_level"], "ERROR");
            assert_eq!(env["name"], "from-dotenv");
            assert!(env.get("ignored").is_none());
            Ok(())
        });
    }

    #[test]
    fn test_dotenv_nested_keys_merge_with_process_env() {
        Jail::expect_with(|jail| {
            jail.create_file(".env", "DB__HOST=from-dotenv\nDB__NAME=app\n")?;
            jail.set_env("DB__HOST", "from-process");

            let settings = EnvSettings {
                nested_delimiter: Some("__".to_string()),
                env_file: Some(PathBuf::from(".env")),
                ..EnvSettings::default()
            };
            let env = collect_env(&settings, &fields(&["db"])).map_err(|e| e.to_string())?;

            assert_eq!(env["db"]["host"], "from-process");
            assert_eq!(env["db"]["name"], "app");
            Ok(())
        });
    }

    #[test]
    fn test_process_values_stay_raw_strings() {
        Jail::expect_with(|jail| {
            jail.create_file(".env", "PIN2=0123\n")?;
            jail.set_env("PIN", "0123");
            jail.set_env("VER", "1.10");
            jail.set_env("TAGS", "[\"a\", \"b\"]");

            let settings =
                EnvSettings { env_file: Some(PathBuf::from(".env")), ..EnvSettings::default() };
            let env = collect_env(&settings, &fields(&["pin", "pin2", "ver", "tags"]))
                .map_err(|e| e.to_string())?;

            assert_eq!(env["pin"], "0123");
            assert_eq!(env["pin2"], "0123");
            assert_eq!(env["ver"], "1.10");
            assert_eq!(env["tags"], json!(["a", "b"]));
            Ok(())
        });
    }

    #[test]
    fn test_missing_env_file_is_skipped() {
        Jail::expect_with(|_jail| {
            let settings = EnvSettings {
                prefix: "CONFMERGE_TEST_".to_string(),
                env_file: Some(PathBuf::from("does-not-exist.env")),
                ..EnvSettings::default()
            };
            let env = collect_env(&settings, &fields(&["x"])).map_err(|e| e.to_string())?;
            assert!(env.is_empty());
            Ok(())
        });
    }
}

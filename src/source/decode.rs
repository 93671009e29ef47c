//! Format-specific decoding into a common mapping
//!
//! Each decoder takes the full file content and produces a [`Mapping`].
//! The top level of every payload must be a mapping.

use super::SourceFormat;
use crate::error::{ConfigError, Result};
use crate::{Mapping, Value};
use std::path::Path;

/// Section holding INI keys that appear before any `[section]` header.
const INI_DEFAULT_SECTION: &str = "default";

pub fn decode(content: &str, format: SourceFormat, path: &Path) -> Result<Mapping> {
    let parse_error = |message: String| ConfigError::Parse {
        path: path.to_path_buf(),
        format,
        message,
    };

    let value = match format {
        SourceFormat::Json => decode_json(content),
        SourceFormat::Toml => decode_toml(content),
        SourceFormat::Yaml => decode_yaml(content),
        SourceFormat::Ini => return decode_ini(content).map_err(parse_error),
    }
    .map_err(parse_error)?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(parse_error(format!(
            "top-level value must be a mapping, found {}",
            kind_name(&other)
        ))),
    }
}

fn decode_json(content: &str) -> std::result::Result<Value, String> {
    serde_json::from_str(content).map_err(|e| e.to_string())
}

fn decode_yaml(content: &str) -> std::result::Result<Value, String> {
    if content.trim().is_empty() {
        return Ok(Value::Object(Mapping::new()));
    }
    let raw: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    // A document holding only comments or `~` decodes to null
    if raw.is_null() {
        return Ok(Value::Object(Mapping::new()));
    }
    serde_json::to_value(raw).map_err(|e| e.to_string())
}

fn decode_toml(content: &str) -> std::result::Result<Value, String> {
    let table: toml::Table = toml::from_str(content).map_err(|e| e.to_string())?;
    Ok(toml_to_json(toml::Value::Table(table)))
}

/// Convert a TOML value to the common value type. Datetimes become strings.
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => {
            serde_json::Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)
        }
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => {
            Value::Object(table.into_iter().map(|(k, v)| (k, toml_to_json(v))).collect())
        }
    }
}

/// Sections become nested mappings of strings; keys outside any section are
/// hoisted to the top level. A key without a value decodes to null.
fn decode_ini(content: &str) -> std::result::Result<Mapping, String> {
    let mut parser = configparser::ini::Ini::new();
    // Only whole-line comments; `#` and `;` are literal inside values
    parser.set_inline_comment_symbols(Some(&[]));
    let sections = parser.read(content.to_string())?;

    // HashMap iteration order is unspecified; sort for a stable payload
    let mut names: Vec<&String> = sections.keys().collect();
    names.sort();

    let mut result = Mapping::new();
    if let Some(defaults) = sections.get(INI_DEFAULT_SECTION) {
        result.extend(ini_section(defaults));
    }
    for name in names {
        if name == INI_DEFAULT_SECTION {
            continue;
        }
        result.insert(name.clone(), Value::Object(ini_section(&sections[name]).collect()));
    }
    Ok(result)
}

fn ini_section(
    section: &std::collections::HashMap<String, Option<String>>,
) -> impl Iterator<Item = (String, Value)> + '_ {
    let mut keys: Vec<&String> = section.keys().collect();
    keys.sort();
    keys.into_iter().map(move |key| {
        let value = match &section[key] {
            Some(v) => Value::String(v.clone()),
            None => Value::Null,
        };
        (key.clone(), value)
    })
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "sequence",
        Value::Object(_) => "mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn decode_ok(content: &str, format: SourceFormat) -> Value {
        Value::Object(decode(content, format, Path::new("test")).expect("decode"))
    }

    #[test]
    fn test_decode_json() {
        let value = decode_ok(r#"{"log_level": "INFO", "items": [1, 2]}"#, SourceFormat::Json);
        assert_eq!(value, json!({"log_level": "INFO", "items": [1, 2]}));
    }

    #[test]
    fn test_decode_json_rejects_non_mapping() {
        let err = decode("[1, 2]", SourceFormat::Json, Path::new("list.json")).unwrap_err();
        match err {
            ConfigError::Parse { format, message, .. } => {
                assert_eq!(format, SourceFormat::Json);
                assert!(message.contains("sequence"), "message: {message}");
            }
            other => panic!("expected Parse, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_toml_nested_tables() {
        let value = decode_ok(
            "name = \"svc\"\n[db]\nhost = \"localhost\"\nport = 5432\nratio = 0.5\n",
            SourceFormat::Toml,
        );
        assert_eq!(
            value,
            json!({"name": "svc", "db": {"host": "localhost", "port": 5432, "ratio": 0.5}})
        );
    }

    #[test]
    fn test_decode_toml_datetime_becomes_string() {
        let value = decode_ok("released = 1979-05-27T07:32:00Z\n", SourceFormat::Toml);
        assert_eq!(value["released"], "1979-05-27T07:32:00Z");
    }

    #[test]
    fn test_decode_toml_nan_becomes_null() {
        let value = decode_ok("x = nan\n", SourceFormat::Toml);
        assert!(value["x"].is_null());
    }

    #[test]
    fn test_decode_yaml() {
        let value = decode_ok("log_level: INFO\nitems:\n  - a\n  - b\n", SourceFormat::Yaml);
        assert_eq!(value, json!({"log_level": "INFO", "items": ["a", "b"]}));
    }

    #[test]
    fn test_decode_empty_yaml_is_empty_mapping() {
        assert_eq!(decode_ok("", SourceFormat::Yaml), json!({}));
        assert_eq!(decode_ok("  \n", SourceFormat::Yaml), json!({}));
    }

    #[test]
    fn test_decode_yaml_numeric_keys_become_strings() {
        assert_eq!(decode_ok("1: a\n", SourceFormat::Yaml), json!({"1": "a"}));
    }

    #[test]
    fn test_decode_yaml_scalar_top_level_fails() {
        let err = decode("just a string", SourceFormat::Yaml, Path::new("s.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_decode_ini_sections_and_defaults() {
        let value = decode_ok(
            "top = level\n\n[Server]\nHost = example.com\nport = 8080\n",
            SourceFormat::Ini,
        );
        assert_eq!(value["top"], "level");
        assert_eq!(value["server"]["host"], "example.com");
        assert_eq!(value["server"]["port"], "8080");
    }

    #[test]
    fn test_decode_ini_keeps_comment_chars_in_values() {
        let value = decode_ok(
            "# leading comment\n[a]\nurl = http://x/#frag\nquery = a;b\n",
            SourceFormat::Ini,
        );
        assert_eq!(value, json!({"a": {"query": "a;b", "url": "http://x/#frag"}}));
    }

    #[test]
    fn test_decode_malformed_toml_names_path() {
        let err =
            decode("key = = broken", SourceFormat::Toml, Path::new("broken.toml")).unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
        assert!(err.to_string().contains("TOML"));
    }
}

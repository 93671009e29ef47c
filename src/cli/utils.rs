//! Shared CLI arguments and parsing helpers.

use anyhow::{bail, Result};
use clap::Args;
use confmerge::{ConfigFileSpec, Mapping, Schema, SettingsOptions, Value};
use std::path::PathBuf;

/// Where settings come from and how files combine.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Config file to load; repeat for more (later files win)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Vec<PathBuf>,

    /// Fail if any config file is missing (at least one is then required)
    #[arg(long)]
    pub required: bool,

    /// Later files replace nested mappings and lists instead of merging them
    #[arg(long)]
    pub no_merge: bool,

    /// Skip list items already present when merging lists
    #[arg(long)]
    pub merge_unique: bool,

    /// Prefix stripped from environment variable names
    #[arg(long, value_name = "PREFIX", default_value = "")]
    pub env_prefix: String,

    /// Delimiter splitting environment variable names into nested keys
    #[arg(long, value_name = "DELIM")]
    pub env_delimiter: Option<String>,

    /// Dotenv file read alongside the process environment
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,
}

impl SourceArgs {
    pub fn to_options(&self) -> SettingsOptions {
        let mut options = SettingsOptions::new()
            .required(self.required)
            .merge(!self.no_merge)
            .merge_unique(self.merge_unique)
            .env_prefix(self.env_prefix.clone());
        if !self.config.is_empty() {
            options.config_file = Some(ConfigFileSpec::Many(self.config.clone()));
        }
        options.env_nested_delimiter = self.env_delimiter.clone();
        options.env_file = self.env_file.clone();
        options
    }
}

/// Decode a command-line value: JSON when it parses, a plain string otherwise.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Split `KEY=VALUE` on the first `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("Expected KEY=VALUE, got '{}'", raw);
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("Empty key in '{}'", raw);
    }
    Ok((key.to_string(), parse_value(value)))
}

pub fn parse_overrides(raw: &[String]) -> Result<Mapping> {
    raw.iter().map(|item| parse_assignment(item)).collect()
}

/// Build a schema from `NAME` or `NAME=DEFAULT` declarations.
pub fn parse_schema(raw: &[String]) -> Result<Schema> {
    let mut schema = Schema::new();
    for item in raw {
        schema = if item.contains('=') {
            let (name, default) = parse_assignment(item)?;
            schema.field_with_default(name, default)
        } else {
            let name = item.trim();
            if name.is_empty() {
                bail!("Empty field name");
            }
            schema.field(name)
        };
    }
    Ok(schema)
}

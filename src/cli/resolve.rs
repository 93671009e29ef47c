//! Resolve command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use confmerge::{resolve, Mapping, Value};

use super::utils::{parse_overrides, parse_schema, SourceArgs};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
}

#[derive(Args)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Declare a setting, optionally with a default (NAME or NAME=DEFAULT)
    #[arg(short = 'f', long = "field", value_name = "NAME[=DEFAULT]")]
    pub fields: Vec<String>,

    /// Explicit override, highest precedence (KEY=VALUE)
    #[arg(short = 's', long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    /// Output format
    #[arg(short = 'o', long, value_enum, default_value = "json")]
    pub output: OutputFormat,
}

pub fn run(args: ResolveArgs) -> Result<()> {
    let schema = parse_schema(&args.fields)?;
    let overrides = parse_overrides(&args.overrides)?;
    let options = args.sources.to_options();

    let resolved = resolve(&schema, &options, &overrides)?;
    tracing::debug!("Resolved {} settings", resolved.values.len());

    println!("{}", render(&resolved.values, args.output)?);
    Ok(())
}

fn render(values: &Mapping, format: OutputFormat) -> Result<String> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(values)?,
        OutputFormat::Yaml => serde_yaml::to_string(values)?,
        OutputFormat::Toml => toml::to_string_pretty(&strip_nulls(values))
            .context("Resolved settings cannot be represented as TOML")?,
    };
    Ok(rendered.trim_end().to_string())
}

/// TOML has no null; drop null entries before rendering.
fn strip_nulls(values: &Mapping) -> Mapping {
    values
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| {
            let v = match v {
                Value::Object(inner) => Value::Object(strip_nulls(inner)),
                other => other.clone(),
            };
            (k.clone(), v)
        })
        .collect()
}

//! confmerge: layered configuration loading and merging
//!
//! Resolves settings from JSON, INI, TOML and YAML files, environment
//! variables and explicit overrides, and prints the resolved mapping.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}

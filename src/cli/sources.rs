//! Sources command implementation

use anyhow::Result;
use clap::Args;
use confmerge::{load_sources, LoadStatus, LoadedSource};

use super::utils::SourceArgs;

#[derive(Args)]
pub struct SourcesArgs {
    #[command(flatten)]
    pub sources: SourceArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: SourcesArgs) -> Result<()> {
    let options = args.sources.to_options();
    let outcome = load_sources(&options.sources()?)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.sources)?);
        return Ok(());
    }

    if outcome.sources.is_empty() {
        println!("No config files configured.");
        return Ok(());
    }
    for source in &outcome.sources {
        println!("{}", describe(source));
    }
    Ok(())
}

fn describe(source: &LoadedSource) -> String {
    match source.status {
        LoadStatus::Loaded => format!(
            "loaded   {:<4} {} ({} keys, sha256:{})",
            source.format,
            source.path.display(),
            source.keys,
            source.digest.as_deref().map(|d| d.get(..12).unwrap_or(d)).unwrap_or("-")
        ),
        LoadStatus::Missing => {
            format!("missing  {:<4} {}", source.format, source.path.display())
        }
    }
}

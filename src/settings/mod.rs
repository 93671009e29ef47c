//! Settings resolution
//!
//! Loads config files, folds them under the merge policy, and layers the
//! result with proper precedence (Explicit > Env > Files > Defaults).

pub mod compose;
pub mod options;
pub mod resolved;
pub mod schema;

pub use compose::{compose, Tier};
pub use options::{ConfigFileSpec, SettingsOptions};
pub use resolved::ResolvedConfig;
pub use schema::{Field, Schema};

use crate::env::collect_env;
use crate::error::Result;
use crate::merge::fold;
use crate::source::{load_sources, LoadedSource};
use crate::Mapping;

/// Resolve settings from files, the process environment (plus `env_file`)
/// and explicit overrides.
pub fn resolve(
    schema: &Schema,
    options: &SettingsOptions,
    overrides: &Mapping,
) -> Result<ResolvedConfig> {
    let (files, sources) = load_files(options)?;
    let env = collect_env(&options.env_settings(), &schema.field_names())?;
    Ok(layer(schema, files, &env, overrides, sources))
}

/// Like [`resolve`], with the environment tier supplied by the caller.
pub fn resolve_with_env(
    schema: &Schema,
    options: &SettingsOptions,
    env: &Mapping,
    overrides: &Mapping,
) -> Result<ResolvedConfig> {
    let (files, sources) = load_files(options)?;
    Ok(layer(schema, files, env, overrides, sources))
}

/// File tier: every configured source folded under the merge policy.
fn load_files(options: &SettingsOptions) -> Result<(Mapping, Vec<LoadedSource>)> {
    let sources = options.sources()?;
    let outcome = load_sources(&sources)?;
    let files = fold(&outcome.payloads, options.merge_policy());
    tracing::debug!(
        "Merged {} of {} config files into {} keys",
        outcome.payloads.len(),
        sources.len(),
        files.len()
    );
    Ok((files, outcome.sources))
}

fn layer(
    schema: &Schema,
    files: Mapping,
    env: &Mapping,
    overrides: &Mapping,
    sources: Vec<LoadedSource>,
) -> ResolvedConfig {
    let defaults = schema.defaults();
    let values = compose(&[
        (Tier::Defaults, &defaults),
        (Tier::Files, &files),
        (Tier::Environment, env),
        (Tier::Overrides, overrides),
    ]);
    ResolvedConfig { values, sources }
}

//! Config file loading

use super::{decode::decode, ConfigSource, SourceFormat};
use crate::error::{ConfigError, Result};
use crate::Mapping;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs;
use std::io;
use std::path::PathBuf;

/// What happened to one source during loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loaded,
    /// Optional source that does not exist; contributed nothing.
    Missing,
}

/// Provenance for one configured source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadedSource {
    pub path: PathBuf,
    pub format: SourceFormat,
    pub status: LoadStatus,
    /// SHA-256 of the raw file bytes (loaded sources only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    /// Number of top-level keys in the decoded payload
    pub keys: usize,
}

/// Result of loading a list of sources.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    /// Decoded payloads, in source order, one per existing source.
    pub payloads: Vec<Mapping>,
    /// Every configured source, including skipped ones.
    pub sources: Vec<LoadedSource>,
}

/// Load sources in order. A missing optional source is skipped; a missing
/// required source or a malformed file aborts the whole load.
pub fn load_sources(sources: &[ConfigSource]) -> Result<LoadOutcome> {
    let mut outcome = LoadOutcome::default();

    for source in sources {
        let Some(bytes) = read_source(source)? else {
            tracing::debug!("Skipping missing optional config file {}", source.path.display());
            outcome.sources.push(LoadedSource {
                path: source.path.clone(),
                format: source.format,
                status: LoadStatus::Missing,
                digest: None,
                keys: 0,
            });
            continue;
        };

        let content = std::str::from_utf8(&bytes).map_err(|e| ConfigError::Parse {
            path: source.path.clone(),
            format: source.format,
            message: format!("invalid UTF-8: {e}"),
        })?;
        let payload = decode(content, source.format, &source.path)?;

        tracing::debug!(
            "Loaded {} config file {} ({} top-level keys)",
            source.format,
            source.path.display(),
            payload.len()
        );
        outcome.sources.push(LoadedSource {
            path: source.path.clone(),
            format: source.format,
            status: LoadStatus::Loaded,
            digest: Some(digest(&bytes)),
            keys: payload.len(),
        });
        outcome.payloads.push(payload);
    }

    Ok(outcome)
}

/// Read the whole file. `Ok(None)` means an optional source is absent.
fn read_source(source: &ConfigSource) -> Result<Option<Vec<u8>>> {
    match fs::read(&source.path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if source.required {
                Err(ConfigError::FileNotFound { path: source.path.clone() })
            } else {
                Ok(None)
            }
        }
        Err(e) => Err(ConfigError::Io { path: source.path.clone(), source: e }),
    }
}

fn digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

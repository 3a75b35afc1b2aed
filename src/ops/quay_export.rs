//! Implementation of `quay export`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{Recipe, RecipeError, SourcePin};
use crate::util::fs::{read_to_string, write_string};

/// On-disk form of `sources.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesFile {
    pub sources: SourcePin,
}

impl SourcesFile {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path)?;
        toml::from_str(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("failed to serialize source pin")?;
        write_string(path, &contents)
    }
}

/// Result of an export.
#[derive(Debug, Clone)]
pub struct ExportResult {
    pub pin: SourcePin,
    pub path: PathBuf,
    /// False when an identical pin was already recorded
    pub created: bool,
}

/// Record the recipe's source pin in `sources_file`.
///
/// Pins are immutable: exporting the same pin again is a no-op, a different
/// pin for the same version is a configuration error.
pub fn export(recipe: &Recipe, sources_file: &Path) -> Result<ExportResult> {
    let pin = recipe.pin()?;

    if let Some(recorded) = recorded_pin(sources_file)? {
        if recorded != pin {
            return Err(RecipeError::configuration(format!(
                "{} {} was exported with {}@{}, recipe now pins {}@{}\n\
                 hint: run `quay clean --all` to drop the recorded pin",
                recipe.name(),
                recipe.package.version,
                recorded.url,
                recorded.commit,
                pin.url,
                pin.commit
            ))
            .into());
        }

        tracing::debug!("pin already recorded in {}", sources_file.display());
        return Ok(ExportResult {
            pin,
            path: sources_file.to_path_buf(),
            created: false,
        });
    }

    SourcesFile {
        sources: pin.clone(),
    }
    .save(sources_file)?;
    tracing::debug!("recorded {}@{}", pin.url, pin.commit);

    Ok(ExportResult {
        pin,
        path: sources_file.to_path_buf(),
        created: true,
    })
}

/// The pin recorded by a previous export, if any.
pub fn recorded_pin(sources_file: &Path) -> Result<Option<SourcePin>> {
    if !sources_file.exists() {
        return Ok(None);
    }
    Ok(Some(SourcesFile::load(sources_file)?.sources))
}

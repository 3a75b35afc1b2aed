//! Implementation of `quay clean`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::ops::request::BuildRequest;
use crate::util::fs::remove_dir_all_if_exists;

/// Project config lives in the default work root and survives `clean --all`.
const KEEP: &[&str] = &["config.toml"];

/// What to remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanScope {
    /// The work dir of one request, keeping the exported pin
    Request,
    /// Everything under the work root, exported pins included
    All,
}

/// Remove build state. Returns the paths removed.
pub fn clean(req: &BuildRequest, work_root: &Path, scope: CleanScope) -> Result<Vec<PathBuf>> {
    let targets = match scope {
        CleanScope::Request => vec![req.layout.work_dir.clone()],
        CleanScope::All => work_root_entries(work_root)?,
    };

    let mut removed = Vec::new();
    for target in targets {
        if !target.exists() {
            continue;
        }
        tracing::debug!("removing {}", target.display());
        if target.is_dir() {
            remove_dir_all_if_exists(&target)?;
        } else {
            std::fs::remove_file(&target)
                .with_context(|| format!("failed to remove {}", target.display()))?;
        }
        removed.push(target);
    }

    Ok(removed)
}

fn work_root_entries(work_root: &Path) -> Result<Vec<PathBuf>> {
    if !work_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in std::fs::read_dir(work_root)
        .with_context(|| format!("failed to read {}", work_root.display()))?
    {
        let entry = entry?;
        if KEEP.iter().any(|k| entry.file_name() == *k) {
            continue;
        }
        entries.push(entry.path());
    }
    entries.sort();
    Ok(entries)
}

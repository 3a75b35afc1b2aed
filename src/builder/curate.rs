//! Artifact curation.
//!
//! The install step produces both static and dynamic artifacts whenever the
//! upstream build does. Curation makes the package advertise exactly one
//! linkage, the one the `shared` option selected.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::builder::backend::{BuildBackend, BuildOutput};
use crate::core::{ArtifactSet, BuildStep, Platform, RecipeError};
use crate::util::fs::{glob_in_dir, move_file};

/// Package subdirectory an action applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PackageDir {
    Lib,
    Bin,
}

impl PackageDir {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageDir::Lib => "lib",
            PackageDir::Bin => "bin",
        }
    }

    fn path(&self, package_root: &Path) -> PathBuf {
        package_root.join(self.as_str())
    }
}

/// What curation does for one (platform, shared) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CurationAction {
    /// Delete files matching `pattern` directly inside `dir`
    Delete { dir: PackageDir, pattern: &'static str },
    /// Move files matching `pattern` from one directory to another
    Relocate {
        from: PackageDir,
        to: PackageDir,
        pattern: &'static str,
    },
    /// Leave the package as installed
    Keep,
}

/// The curation policy, keyed by (platform, shared).
pub const CURATION_TABLE: &[(Platform, bool, CurationAction)] = &[
    (
        Platform::Linux,
        true,
        CurationAction::Delete {
            dir: PackageDir::Lib,
            pattern: "*.a",
        },
    ),
    (
        Platform::Linux,
        false,
        CurationAction::Delete {
            dir: PackageDir::Lib,
            pattern: "*.so",
        },
    ),
    (
        Platform::Macos,
        true,
        CurationAction::Delete {
            dir: PackageDir::Lib,
            pattern: "*.a",
        },
    ),
    (
        Platform::Macos,
        false,
        CurationAction::Delete {
            dir: PackageDir::Lib,
            pattern: "*.dylib",
        },
    ),
    (
        Platform::Windows,
        true,
        CurationAction::Relocate {
            from: PackageDir::Lib,
            to: PackageDir::Bin,
            pattern: "*.dll",
        },
    ),
    (
        Platform::Windows,
        false,
        CurationAction::Delete {
            dir: PackageDir::Bin,
            pattern: "*.dll",
        },
    ),
];

/// Look up the action for a platform and linkage.
pub fn curation_action(platform: Platform, shared: bool) -> CurationAction {
    CURATION_TABLE
        .iter()
        .find(|(p, s, _)| *p == platform && *s == shared)
        .map(|(_, _, action)| *action)
        .unwrap_or(CurationAction::Keep)
}

/// A non-fatal problem found during curation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurationWarning {
    pub message: String,
}

/// Result of curating a package root.
#[derive(Debug, Clone, Serialize)]
pub struct CurationReport {
    pub action: CurationAction,
    /// Files removed, relative to the package root
    pub removed: Vec<PathBuf>,
    /// Files moved, (from, to) relative to the package root
    pub relocated: Vec<(PathBuf, PathBuf)>,
    pub artifacts: ArtifactSet,
    pub warnings: Vec<CurationWarning>,
}

/// Install the build into `package_root` and curate the result.
pub fn curate(
    backend: &dyn BuildBackend,
    output: &BuildOutput,
    package_root: &Path,
    platform: Platform,
    shared: bool,
) -> Result<CurationReport, RecipeError> {
    tracing::debug!("installing into {}", package_root.display());
    backend.install(output, package_root)?;

    curate_installed(package_root, platform, shared).map_err(|e| {
        RecipeError::build(BuildStep::Install, format!("curation failed: {:#}", e))
    })
}

/// Apply the curation table to an already-installed package root.
pub fn curate_installed(
    package_root: &Path,
    platform: Platform,
    shared: bool,
) -> Result<CurationReport> {
    let action = curation_action(platform, shared);
    tracing::debug!("curation for {} shared={}: {:?}", platform, shared, action);

    let mut removed = Vec::new();
    let mut relocated = Vec::new();

    match action {
        CurationAction::Delete { dir, pattern } => {
            for path in glob_in_dir(&dir.path(package_root), pattern)? {
                tracing::debug!("removing {}", path.display());
                std::fs::remove_file(&path)?;
                removed.push(relative(package_root, &path));
            }
        }
        CurationAction::Relocate { from, to, pattern } => {
            let dest_dir = to.path(package_root);
            for path in glob_in_dir(&from.path(package_root), pattern)? {
                let Some(name) = path.file_name() else {
                    continue;
                };
                let dest = dest_dir.join(name);
                tracing::debug!("moving {} to {}", path.display(), dest.display());
                move_file(&path, &dest)?;
                relocated.push((relative(package_root, &path), relative(package_root, &dest)));
            }
        }
        CurationAction::Keep => {}
    }

    let artifacts = ArtifactSet::scan(package_root, shared)?;

    let mut warnings = Vec::new();
    if !artifacts.has_linkage(platform, shared) {
        let warning = CurationWarning {
            message: format!(
                "no {} libraries found in {} after curation; consumers will fail to link",
                if shared { "shared" } else { "static" },
                package_root.display()
            ),
        };
        tracing::warn!("{}", warning.message);
        warnings.push(warning);
    }

    Ok(CurationReport {
        action,
        removed,
        relocated,
        artifacts,
        warnings,
    })
}

fn relative(root: &Path, path: &Path) -> PathBuf {
    crate::util::fs::relative_path(root, path)
}

//! Installed package artifacts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;
use walkdir::WalkDir;

use crate::core::settings::Platform;
use crate::util::fs::relative_path;

/// Kind of an installed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    /// `*.a`, or `*.lib` in a static Windows package
    StaticArchive,
    /// `*.so`, `*.so.<N>`
    SharedObject,
    /// `*.dylib`
    DynamicLibrary,
    /// `*.lib` next to a DLL in a shared Windows package
    ImportLibrary,
    /// `*.dll`
    RuntimeLibrary,
    Header,
    Other,
}

impl ArtifactKind {
    /// Classify a file by name.
    ///
    /// `.lib` is ambiguous on Windows; `shared` decides between an import
    /// library and a static archive.
    pub fn classify(path: &Path, shared: bool) -> Self {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "a" => ArtifactKind::StaticArchive,
            "so" => ArtifactKind::SharedObject,
            "dylib" => ArtifactKind::DynamicLibrary,
            "dll" => ArtifactKind::RuntimeLibrary,
            "lib" if shared => ArtifactKind::ImportLibrary,
            "lib" => ArtifactKind::StaticArchive,
            "h" | "hh" | "hpp" | "hxx" | "inl" => ArtifactKind::Header,
            _ if name.contains(".so.") => ArtifactKind::SharedObject,
            _ => ArtifactKind::Other,
        }
    }
}

/// A file under the package root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    /// Path relative to the package root
    pub path: PathBuf,
    pub kind: ArtifactKind,
}

/// Every file under a package root, classified.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArtifactSet {
    pub root: PathBuf,
    pub artifacts: Vec<Artifact>,
}

impl ArtifactSet {
    /// Scan a package root. A missing root yields an empty set.
    pub fn scan(root: &Path, shared: bool) -> Result<Self> {
        let mut artifacts = Vec::new();

        if root.exists() {
            for entry in WalkDir::new(root).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("failed to scan package: {}", root.display()))?;
                if !entry.file_type().is_file() {
                    continue;
                }

                let path = relative_path(root, entry.path());
                let kind = ArtifactKind::classify(&path, shared);
                artifacts.push(Artifact { path, kind });
            }
        }

        Ok(ArtifactSet {
            root: root.to_path_buf(),
            artifacts,
        })
    }

    pub fn of_kind(&self, kind: ArtifactKind) -> impl Iterator<Item = &Artifact> {
        self.artifacts.iter().filter(move |a| a.kind == kind)
    }

    pub fn count(&self, kind: ArtifactKind) -> usize {
        self.of_kind(kind).count()
    }

    /// Artifacts whose path starts with the given relative directory.
    pub fn in_dir<'a>(&'a self, dir: &'a str) -> impl Iterator<Item = &'a Artifact> {
        self.artifacts
            .iter()
            .filter(move |a| a.path.parent().map(|p| p == Path::new(dir)).unwrap_or(false))
    }

    /// Whether at least one library of the selected linkage is present.
    pub fn has_linkage(&self, platform: Platform, shared: bool) -> bool {
        let wanted: &[ArtifactKind] = match (platform, shared) {
            (_, false) => &[ArtifactKind::StaticArchive],
            (Platform::Linux, true) => &[ArtifactKind::SharedObject],
            (Platform::Macos, true) => &[ArtifactKind::DynamicLibrary],
            (Platform::Windows, true) => &[ArtifactKind::RuntimeLibrary],
            (Platform::Other, true) => &[
                ArtifactKind::SharedObject,
                ArtifactKind::DynamicLibrary,
                ArtifactKind::RuntimeLibrary,
            ],
        };

        self.artifacts.iter().any(|a| wanted.contains(&a.kind))
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

//! Consumer-facing package descriptor.
//!
//! The descriptor is what downstream build systems read: which libraries to
//! link, in which order, and where the headers are.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::artifact::ArtifactSet;
use crate::core::recipe::Recipe;

/// Descriptor file written at the package root.
pub const DESCRIPTOR_FILE: &str = "quay_package.json";

/// Link and include information for a curated package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
    /// Libraries in link order
    pub libs: Vec<String>,
    /// Include directories relative to the package root
    pub include_dirs: Vec<String>,
    pub lib_dirs: Vec<String>,
    pub bin_dirs: Vec<String>,
    /// Whether the package advertises shared linkage
    pub shared: bool,
}

/// Describe a curated package.
///
/// The library list is the recipe's declared order; the artifacts are not
/// inspected beyond their root, the curator already settled what's there.
pub fn describe(
    artifacts: &ArtifactSet,
    recipe: &Recipe,
    version: &semver::Version,
    shared: bool,
) -> PackageDescriptor {
    tracing::debug!(
        "describing {} {} ({} artifacts under {})",
        recipe.name(),
        version,
        artifacts.len(),
        artifacts.root.display()
    );

    PackageDescriptor {
        name: recipe.name().to_string(),
        version: version.to_string(),
        libs: recipe.package_info.libs.clone(),
        include_dirs: vec![
            "include".to_string(),
            versioned_include_dir(&recipe.package_info.include_family, version),
        ],
        lib_dirs: vec!["lib".to_string()],
        bin_dirs: vec!["bin".to_string()],
        shared,
    }
}

/// `include/<family>/v<version>`, so major versions can be installed side by side.
pub fn versioned_include_dir(family: &str, version: &semver::Version) -> String {
    format!("include/{}/v{}", family, version)
}

impl PackageDescriptor {
    /// Write the descriptor as JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("failed to serialize package descriptor")?;
        crate::util::fs::write_string(path, &json)
    }

    /// Read a descriptor written by [`PackageDescriptor::save`].
    pub fn load(path: &Path) -> Result<Self> {
        let contents = crate::util::fs::read_to_string(path)?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse package descriptor: {}", path.display()))
    }

    /// Render a pkg-config file for a package installed at `prefix`.
    pub fn to_pkg_config(&self, prefix: &Path, description: Option<&str>) -> String {
        let mut out = String::new();
        out.push_str(&format!("prefix={}\n", prefix.display()));
        out.push_str(&format!("libdir=${{prefix}}/{}\n", self.lib_dirs[0]));
        out.push_str("includedir=${prefix}/include\n\n");

        out.push_str(&format!("Name: {}\n", self.name));
        out.push_str(&format!(
            "Description: {}\n",
            description.unwrap_or(self.name.as_str())
        ));
        out.push_str(&format!("Version: {}\n", self.version));

        let libs: Vec<String> = self.libs.iter().map(|l| format!("-l{}", l)).collect();
        out.push_str(&format!("Libs: -L${{libdir}} {}\n", libs.join(" ")));

        let cflags: Vec<String> = self
            .include_dirs
            .iter()
            .map(|d| format!("-I${{prefix}}/{}", d))
            .collect();
        out.push_str(&format!("Cflags: {}\n", cflags.join(" ")));

        out
    }
}

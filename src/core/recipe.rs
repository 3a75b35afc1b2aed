//! Recipe.toml parsing and schema.
//!
//! A recipe describes one upstream package: where its source lives, which
//! options it accepts, how its CMake build is laid out and what it exposes to
//! consumers.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use semver::Version;
use serde::{Deserialize, Serialize};

use crate::core::error::RecipeError;
use crate::core::options::OptionValue;
use crate::core::source_pin::SourcePin;

/// Recipe file name.
pub const RECIPE_FILE: &str = "Recipe.toml";

/// The parsed Recipe.toml.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Recipe {
    pub package: PackageMetadata,

    pub source: SourceSpec,

    /// Declared options and their defaults
    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,

    #[serde(default)]
    pub cmake: CMakeSpec,

    #[serde(default)]
    pub patches: Vec<PatchSpec>,

    #[serde(rename = "package-info")]
    pub package_info: PackageInfoSpec,

    /// Directory containing the recipe file
    #[serde(skip)]
    pub recipe_dir: PathBuf,
}

/// `[package]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageMetadata {
    pub name: String,

    /// Package version (semver)
    pub version: String,

    #[serde(default)]
    pub license: Option<String>,

    #[serde(default)]
    pub author: Option<String>,

    /// Recipe homepage
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// `[source]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceSpec {
    pub url: String,

    /// Tag or commit hash; defaults to `v<version>`
    #[serde(default)]
    pub commit: Option<String>,
}

/// `[cmake]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct CMakeSpec {
    /// Source folder, relative to the work directory
    #[serde(default = "default_src_folder")]
    pub src_folder: String,

    /// Build folder, relative to the source folder
    #[serde(default = "default_build_folder")]
    pub build_folder: String,

    /// Variables always passed on the configure command line
    #[serde(default = "default_cache_variables")]
    pub cache_variables: BTreeMap<String, OptionValue>,

    /// CMake generator (e.g. "Ninja")
    #[serde(default)]
    pub generator: Option<String>,
}

fn default_src_folder() -> String {
    "src".to_string()
}

fn default_build_folder() -> String {
    "target/ff/cc/build".to_string()
}

fn default_cache_variables() -> BTreeMap<String, OptionValue> {
    let mut vars = BTreeMap::new();
    vars.insert("BUILD_CXX".to_string(), OptionValue::Bool(true));
    vars
}

impl Default for CMakeSpec {
    fn default() -> Self {
        CMakeSpec {
            src_folder: default_src_folder(),
            build_folder: default_build_folder(),
            cache_variables: default_cache_variables(),
            generator: None,
        }
    }
}

impl CMakeSpec {
    /// Names of the fixed cache variables, uppercased.
    pub fn reserved_names(&self) -> Vec<String> {
        self.cache_variables
            .keys()
            .map(|k| k.to_ascii_uppercase())
            .collect()
    }
}

/// A `[[patches]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatchSpec {
    /// Patch file, relative to the recipe directory
    pub file: String,

    #[serde(default)]
    pub description: Option<String>,
}

/// `[package-info]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct PackageInfoSpec {
    /// Libraries to link, in link order
    pub libs: Vec<String>,

    /// Header family; headers live under `include/<family>/v<version>`
    pub include_family: String,
}

impl Recipe {
    /// Load a recipe from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read recipe: {}", path.display()))?;

        let recipe_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Self::parse(&contents, recipe_dir)
            .with_context(|| format!("failed to parse recipe: {}", path.display()))
    }

    /// Parse a recipe from a string.
    pub fn parse(contents: &str, recipe_dir: PathBuf) -> Result<Self> {
        let mut recipe: Recipe = toml::from_str(contents)?;
        recipe.recipe_dir = recipe_dir;
        recipe.validate()?;
        Ok(recipe)
    }

    fn validate(&self) -> Result<(), RecipeError> {
        if self.package.name.trim().is_empty() {
            return Err(RecipeError::configuration("package name is empty"));
        }

        self.version()?;

        if self.package_info.libs.is_empty() {
            return Err(RecipeError::configuration(
                "`package-info.libs` must list at least one library",
            ));
        }

        let build_folder = Path::new(&self.cmake.build_folder);
        if build_folder.is_absolute() || self.cmake.build_folder.trim().is_empty() {
            return Err(RecipeError::configuration(format!(
                "`cmake.build-folder` must be a relative path, got `{}`",
                self.cmake.build_folder
            )));
        }

        self.pin()?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.package.name
    }

    /// The package version as semver.
    pub fn version(&self) -> Result<Version, RecipeError> {
        Version::parse(&self.package.version).map_err(|e| {
            RecipeError::configuration(format!(
                "invalid version `{}`: {}",
                self.package.version, e
            ))
        })
    }

    /// The source pin for this recipe's version.
    pub fn pin(&self) -> Result<SourcePin, RecipeError> {
        match &self.source.commit {
            Some(commit) => SourcePin::new(&self.source.url, commit),
            None => SourcePin::for_version(&self.source.url, &self.version()?),
        }
    }

    /// Absolute path of a patch file.
    pub fn patch_path(&self, patch: &PatchSpec) -> PathBuf {
        self.recipe_dir.join(&patch.file)
    }
}

#[cfg(test)]
pub(crate) const ICEORYX2_RECIPE: &str = r#"
[package]
name = "iceoryx2"
version = "0.8.0"
license = "Apache-2.0"
description = "Zero-copy inter-process communication"

[source]
url = "https://github.com/eclipse-iceoryx/iceoryx2.git"

[options]
shared = false
fPIC = true
build_examples = false
build_testing = false

[package-info]
libs = ["iceoryx2_ffi_c", "iceoryx2_cxx"]
include-family = "iceoryx2"
"#;

//! On-disk layout of one build request.
//!
//! ```text
//! <work_root>/<name>-<version>/
//! ├── sources.toml                       recorded source pin
//! └── <key>/                             work dir for one request
//!     ├── source.stamp                   written once source + patches are in place
//!     ├── build.stamp                    written once configure + build succeed
//!     ├── src/                           source root
//!     │   └── target/ff/cc/build/        build root (+ /<build_type> on Windows)
//!     │       └── generators/            generated toolchain file
//!     └── package/                       install prefix, curated
//!         ├── bin/
//!         ├── include/
//!         └── lib/
//! ```
//!
//! The build root sits inside the source tree under `target/<marker>/build` so
//! it never collides with the default location another build system sharing
//! the tree would pick.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::core::options::OptionSet;
use crate::core::recipe::Recipe;
use crate::core::settings::Settings;
use crate::util::hash::Fingerprint;

/// File the source pin is recorded in, inside the work directory.
pub const SOURCES_FILE: &str = "sources.toml";

/// Marker for a fully prepared source tree, inside the work directory.
pub const SOURCE_STAMP: &str = "source.stamp";

/// Marker for a completed build, inside the work directory.
pub const BUILD_STAMP: &str = "build.stamp";

/// Filesystem locations for one (version, options, settings) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildLayout {
    /// Per-version directory holding the exported pin
    pub export_dir: PathBuf,
    pub work_dir: PathBuf,
    pub source_root: PathBuf,
    pub build_root: PathBuf,
    pub generators_dir: PathBuf,
    pub package_root: PathBuf,
    pub build_key: String,
}

impl BuildLayout {
    /// Compute the layout for a request under `work_root`.
    pub fn new(work_root: &Path, recipe: &Recipe, options: &OptionSet, settings: &Settings) -> Self {
        let build_key = build_key(recipe, options, settings);
        let export_dir = work_root.join(format!("{}-{}", recipe.name(), recipe.package.version));
        let work_dir = export_dir.join(&build_key);

        let source_root = work_dir.join(&recipe.cmake.src_folder);

        let mut build_root = source_root.join(&recipe.cmake.build_folder);
        if settings.is_windows() {
            build_root = build_root.join(settings.build_type.as_str());
        }

        let generators_dir = build_root.join("generators");
        let package_root = work_dir.join("package");

        BuildLayout {
            export_dir,
            work_dir,
            source_root,
            build_root,
            generators_dir,
            package_root,
            build_key,
        }
    }

    pub fn sources_file(&self) -> PathBuf {
        self.export_dir.join(SOURCES_FILE)
    }

    pub fn source_stamp(&self) -> PathBuf {
        self.work_dir.join(SOURCE_STAMP)
    }

    pub fn build_stamp(&self) -> PathBuf {
        self.work_dir.join(BUILD_STAMP)
    }

    pub fn lib_dir(&self) -> PathBuf {
        self.package_root.join("lib")
    }
}

/// Short fingerprint of everything that affects the build output.
pub fn build_key(recipe: &Recipe, options: &OptionSet, settings: &Settings) -> String {
    let mut fp = Fingerprint::new();
    fp.update_str(recipe.name()).update_str(&recipe.package.version);

    fp.update_str(&recipe.source.url)
        .update_str(recipe.source.commit.as_deref().unwrap_or(""));

    let cmake = &recipe.cmake;
    fp.update_str(&cmake.src_folder)
        .update_str(&cmake.build_folder)
        .update_str(cmake.generator.as_deref().unwrap_or(""));
    for (name, value) in &cmake.cache_variables {
        fp.update_str(name).update_str(&value.to_string());
    }

    for (name, value) in options.iter() {
        fp.update_str(name).update_str(&value.to_string());
    }

    fp.update_str(&settings.os)
        .update_str(&settings.arch)
        .update_str(settings.build_type.as_str())
        .update_str(settings.compiler.as_deref().unwrap_or(""));

    fp.finish_short()
}

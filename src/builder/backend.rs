//! Build backend interface and the configure-then-build driver.

use std::path::{Path, PathBuf};

use crate::builder::toolchain_file::write_toolchain_file;
use crate::builder::translate::ToolchainConfig;
use crate::core::{BuildLayout, BuildStep, BuildType, RecipeError};
use crate::sources::SourceTree;
use crate::util::fs::{ensure_dir, write_string};

/// A completed build, ready to be installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutput {
    pub source_root: PathBuf,
    pub build_root: PathBuf,
    pub toolchain_file: PathBuf,
    pub build_type: BuildType,
    pub multi_config: bool,
}

/// An external build toolchain.
///
/// Every step either succeeds completely or fails with
/// [`RecipeError::Build`]; there is no partial success.
pub trait BuildBackend {
    /// Backend name for display.
    fn name(&self) -> &str;

    /// Generate the native build files in `build_root`.
    fn configure(
        &self,
        source_root: &Path,
        build_root: &Path,
        toolchain_file: &Path,
        package_root: &Path,
        config: &ToolchainConfig,
    ) -> Result<(), RecipeError>;

    /// Compile everything configured in `output.build_root`.
    fn build(&self, output: &BuildOutput) -> Result<(), RecipeError>;

    /// Install the build's products into `package_root`.
    fn install(&self, output: &BuildOutput, package_root: &Path) -> Result<(), RecipeError>;
}

/// Configure and build a source tree in the layout's build root.
///
/// The layout's build stamp is cleared first and only rewritten once the
/// build step succeeds, so a failed run never leaves a packageable build.
pub fn configure_and_build(
    backend: &dyn BuildBackend,
    tree: &SourceTree,
    config: &ToolchainConfig,
    layout: &BuildLayout,
    build_type: BuildType,
) -> Result<BuildOutput, RecipeError> {
    let io_err = |e: anyhow::Error| RecipeError::build(BuildStep::Configure, format!("{:#}", e));

    let stamp = layout.build_stamp();
    if stamp.exists() {
        std::fs::remove_file(&stamp).map_err(|e| {
            RecipeError::build(
                BuildStep::Configure,
                format!("failed to remove {}: {}", stamp.display(), e),
            )
        })?;
    }

    ensure_dir(&layout.build_root).map_err(io_err)?;
    let toolchain_file = write_toolchain_file(config, &layout.generators_dir).map_err(io_err)?;

    tracing::debug!(
        "configuring {} in {}",
        tree.root.display(),
        layout.build_root.display()
    );
    backend.configure(
        &tree.root,
        &layout.build_root,
        &toolchain_file,
        &layout.package_root,
        config,
    )?;

    let output = BuildOutput {
        source_root: tree.root.clone(),
        build_root: layout.build_root.clone(),
        toolchain_file,
        build_type,
        multi_config: config.multi_config,
    };

    tracing::debug!("building with {}", backend.name());
    backend.build(&output)?;

    write_string(&stamp, &format!("{}\n", layout.build_key))
        .map_err(|e| RecipeError::build(BuildStep::Build, format!("{:#}", e)))?;

    Ok(output)
}

/// Reconstruct the output of a previous build from the layout on disk.
pub fn existing_output(
    layout: &BuildLayout,
    config: &ToolchainConfig,
    build_type: BuildType,
) -> Result<BuildOutput, RecipeError> {
    let toolchain_file = layout
        .generators_dir
        .join(crate::builder::toolchain_file::TOOLCHAIN_FILE);

    if !layout.build_stamp().is_file() || !toolchain_file.is_file() {
        return Err(RecipeError::build(
            BuildStep::Install,
            format!(
                "no build found in {}; run `quay build` first",
                layout.build_root.display()
            ),
        ));
    }

    Ok(BuildOutput {
        source_root: layout.source_root.clone(),
        build_root: layout.build_root.clone(),
        toolchain_file,
        build_type,
        multi_config: config.multi_config,
    })
}

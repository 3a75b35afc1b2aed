//! Implementation of `quay build`.

use anyhow::Result;

use crate::builder::{configure_and_build, translate, BuildBackend, BuildOutput, ToolchainConfig};
use crate::ops::quay_source::{ensure_source, SourceResult};
use crate::ops::request::BuildRequest;
use crate::sources::SourceFetcher;

/// Options for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Re-fetch the source even if a prepared tree exists
    pub fresh_source: bool,
}

/// Result of a build.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub source: SourceResult,
    pub config: ToolchainConfig,
    pub output: BuildOutput,
}

/// The toolchain configuration a request translates to.
pub fn toolchain_config(req: &BuildRequest) -> ToolchainConfig {
    translate(&req.options, &req.settings, &req.recipe.cmake)
}

/// Prepare the source, then configure and build it.
pub fn build(
    req: &BuildRequest,
    fetcher: &dyn SourceFetcher,
    backend: &dyn BuildBackend,
    opts: &BuildOptions,
) -> Result<BuildResult> {
    let source = if opts.fresh_source {
        crate::ops::quay_source::source(req, fetcher)?
    } else {
        ensure_source(req, fetcher)?
    };

    let config = toolchain_config(req);
    for (name, value) in config.merged() {
        tracing::debug!("  {} = {}", name, value);
    }

    let output = configure_and_build(
        backend,
        &source.tree,
        &config,
        &req.layout,
        req.settings.build_type,
    )?;

    Ok(BuildResult {
        source,
        config,
        output,
    })
}

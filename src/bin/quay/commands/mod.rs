//! Command implementations

pub mod build;
pub mod clean;
pub mod completions;
pub mod create;
pub mod export;
pub mod info;
pub mod inspect;
pub mod package;
pub mod source;

use std::path::PathBuf;

use anyhow::Result;

use crate::cli::{GlobalArgs, RequestArgs};
use quay::builder::CMakeBackend;
use quay::core::{Recipe, Settings};
use quay::ops::BuildRequest;
use quay::util::{Config, GlobalContext, Shell};

/// Everything a command needs once the recipe is located.
pub struct Session {
    pub ctx: GlobalContext,
    pub shell: Shell,
    pub config: Config,
    pub recipe: Recipe,
    pub work_root: PathBuf,
}

impl Session {
    /// Locate and load the recipe, and merge configuration.
    pub fn open(global: &GlobalArgs) -> Result<Self> {
        let mut ctx = GlobalContext::new()?;
        ctx.set_verbose(global.verbose);
        let shell = Shell::from_flags(global.quiet, global.verbose, global.color);

        let recipe_path = ctx.recipe_path(global.recipe.as_deref())?;
        let mut recipe = Recipe::load(&recipe_path)?;
        tracing::debug!("using recipe {}", recipe_path.display());

        let config = ctx.config(&recipe.recipe_dir);
        if let Some(ref generator) = config.build.generator {
            recipe.cmake.generator = Some(generator.clone());
        }
        let work_root = ctx.work_root(&recipe.recipe_dir, &config);

        Ok(Session {
            ctx,
            shell,
            config,
            recipe,
            work_root,
        })
    }

    /// Resolve options and settings into a request.
    pub fn request(&self, args: &RequestArgs) -> Result<BuildRequest> {
        let mut settings = Settings::host();
        for assignment in &args.settings {
            settings.apply(assignment)?;
        }

        Ok(BuildRequest::new(
            self.recipe.clone(),
            &args.options,
            settings,
            &self.work_root,
        )?)
    }

    /// The CMake backend, with jobs from the CLI or config.
    pub fn backend(&self, jobs: Option<usize>) -> Result<CMakeBackend> {
        let backend = CMakeBackend::new(self.config.build.cmake.as_deref())?
            .jobs(jobs.or(self.config.build.jobs))
            .verbose(self.ctx.is_verbose());
        Ok(backend)
    }
}

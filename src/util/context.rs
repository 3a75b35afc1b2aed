//! Global context for quay operations.
//!
//! Provides centralized access to configuration, paths, and environment.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::core::recipe::RECIPE_FILE;
use crate::util::config::{global_config_path, load_config, Config};

/// Name of the per-recipe quay directory.
pub const QUAY_DIR: &str = ".quay";

/// Global context shared by every command.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Global config file (~/.quay/config.toml), if a home directory exists
    global_config: Option<PathBuf>,

    /// Whether to use verbose output
    verbose: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            global_config: global_config_path(),
            verbose: false,
        })
    }

    /// Create a GlobalContext rooted at a specific directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = cwd;
        Ok(ctx)
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Find Recipe.toml, starting from cwd and searching upward.
    pub fn find_recipe(&self) -> Result<PathBuf> {
        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(RECIPE_FILE);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                bail!(
                    "could not find `{}` in `{}` or any parent directory\n\
                     help: run quay from a recipe directory or pass --recipe",
                    RECIPE_FILE,
                    self.cwd.display()
                );
            }
        }
    }

    /// Resolve an explicit recipe path (file or directory), or search for one.
    pub fn recipe_path(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        match explicit {
            Some(path) => {
                let path = self.cwd.join(path);
                let path = if path.is_dir() {
                    path.join(RECIPE_FILE)
                } else {
                    path
                };
                if !path.is_file() {
                    bail!("recipe not found: {}", path.display());
                }
                Ok(path)
            }
            None => self.find_recipe(),
        }
    }

    /// The recipe-local quay directory.
    pub fn project_quay_dir(recipe_dir: &Path) -> PathBuf {
        recipe_dir.join(QUAY_DIR)
    }

    /// Load merged configuration for a recipe directory.
    pub fn config(&self, recipe_dir: &Path) -> Config {
        load_config(
            self.global_config.as_deref(),
            &Self::project_quay_dir(recipe_dir).join("config.toml"),
        )
    }

    /// Root directory for work directories: configured, or `<recipe dir>/.quay`.
    pub fn work_root(&self, recipe_dir: &Path, config: &Config) -> PathBuf {
        match &config.paths.work_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => recipe_dir.join(dir),
            None => Self::project_quay_dir(recipe_dir),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_recipe_searches_upward() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(RECIPE_FILE), "").unwrap();
        let nested = tmp.path().join("patches/old");
        std::fs::create_dir_all(&nested).unwrap();

        let ctx = GlobalContext::with_cwd(nested).unwrap();
        assert_eq!(ctx.find_recipe().unwrap(), tmp.path().join(RECIPE_FILE));
    }

    #[test]
    fn test_recipe_path_accepts_directory() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join(RECIPE_FILE), "").unwrap();

        let ctx = GlobalContext::with_cwd(PathBuf::from("/")).unwrap();
        assert_eq!(
            ctx.recipe_path(Some(tmp.path())).unwrap(),
            tmp.path().join(RECIPE_FILE)
        );
        assert!(ctx.recipe_path(Some(&tmp.path().join("missing"))).is_err());
    }

    #[test]
    fn test_work_root() {
        let ctx = GlobalContext::with_cwd(PathBuf::from("/")).unwrap();
        let recipe_dir = Path::new("/recipes/iceoryx2");

        let mut config = Config::default();
        assert_eq!(ctx.work_root(recipe_dir, &config), recipe_dir.join(".quay"));

        config.paths.work_dir = Some(PathBuf::from("build-cache"));
        assert_eq!(
            ctx.work_root(recipe_dir, &config),
            recipe_dir.join("build-cache")
        );
    }
}

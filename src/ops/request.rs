//! The inputs of one pipeline run.

use std::path::Path;

use semver::Version;

use crate::core::{BuildLayout, OptionOverride, OptionSet, Platform, Recipe, RecipeError, Settings};

/// A recipe plus the options and settings it is being built with.
///
/// Resolved once, then passed to every stage; no stage looks up defaults on
/// its own.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    pub recipe: Recipe,
    pub version: Version,
    pub options: OptionSet,
    pub settings: Settings,
    pub layout: BuildLayout,
}

impl BuildRequest {
    /// Resolve options against the recipe's defaults and compute the layout.
    pub fn new(
        recipe: Recipe,
        overrides: &[OptionOverride],
        settings: Settings,
        work_root: &Path,
    ) -> Result<Self, RecipeError> {
        let version = recipe.version()?;
        let options = OptionSet::resolve(
            &recipe.options,
            overrides,
            &recipe.cmake.reserved_names(),
        )?;
        let layout = BuildLayout::new(work_root, &recipe, &options, &settings);

        tracing::debug!(
            "request {} {} key={} options={}",
            recipe.name(),
            version,
            layout.build_key,
            options.len()
        );

        Ok(BuildRequest {
            recipe,
            version,
            options,
            settings,
            layout,
        })
    }

    pub fn name(&self) -> &str {
        self.recipe.name()
    }

    pub fn shared(&self) -> bool {
        self.options.shared()
    }

    pub fn platform(&self) -> Platform {
        self.settings.platform()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recipe::ICEORYX2_RECIPE;
    use crate::core::OptionValue;
    use std::path::PathBuf;

    fn recipe() -> Recipe {
        Recipe::parse(ICEORYX2_RECIPE, PathBuf::from("/r")).unwrap()
    }

    #[test]
    fn test_defaults_filled() {
        let req = BuildRequest::new(recipe(), &[], Settings::host(), Path::new("/w")).unwrap();
        assert_eq!(req.options.len(), 4);
        assert!(!req.shared());
        assert_eq!(req.version, Version::new(0, 8, 0));
    }

    #[test]
    fn test_overrides_change_key() {
        let defaults = BuildRequest::new(recipe(), &[], Settings::host(), Path::new("/w")).unwrap();
        let shared: OptionOverride = "shared=True".parse().unwrap();
        let req =
            BuildRequest::new(recipe(), &[shared], Settings::host(), Path::new("/w")).unwrap();

        assert!(req.shared());
        assert_eq!(req.options.get("shared"), Some(&OptionValue::Bool(true)));
        assert_ne!(req.layout.work_dir, defaults.layout.work_dir);
        assert_eq!(req.layout.export_dir, defaults.layout.export_dir);
    }

    #[test]
    fn test_reserved_override_rejected() {
        let bad: OptionOverride = "build_cxx=False".parse().unwrap();
        let err = BuildRequest::new(recipe(), &[bad], Settings::host(), Path::new("/w")).unwrap_err();
        assert!(matches!(err, RecipeError::Configuration { .. }));
    }
}

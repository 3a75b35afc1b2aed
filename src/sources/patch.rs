//! Recipe patches applied to a fetched source tree.

use git2::{ApplyLocation, ApplyOptions, Diff, Repository};

use crate::core::{Recipe, RecipeError};
use crate::sources::SourceTree;

/// Apply every `[[patches]]` entry of the recipe to the tree's working directory.
///
/// Each patch is checked before it is applied, so a patch that doesn't fit
/// leaves the tree as the previous patch left it. Returns the number applied.
pub fn apply_patches(recipe: &Recipe, tree: &SourceTree) -> Result<usize, RecipeError> {
    if recipe.patches.is_empty() {
        return Ok(0);
    }

    let repo = Repository::open(&tree.root).map_err(|e| RecipeError::Patch {
        patch: "*".to_string(),
        message: format!("cannot open source tree {}: {}", tree.root.display(), e.message()),
    })?;

    for entry in &recipe.patches {
        let path = recipe.patch_path(entry);
        let err = |message: String| RecipeError::Patch {
            patch: entry.file.clone(),
            message,
        };

        match &entry.description {
            Some(desc) => tracing::debug!("applying {}: {}", entry.file, desc),
            None => tracing::debug!("applying {}", entry.file),
        }

        let bytes = std::fs::read(&path)
            .map_err(|e| err(format!("cannot read {}: {}", path.display(), e)))?;
        let diff = Diff::from_buffer(&bytes).map_err(|e| err(e.message().to_string()))?;

        let mut check = ApplyOptions::new();
        check.check(true);
        repo.apply(&diff, ApplyLocation::WorkDir, Some(&mut check))
            .map_err(|e| err(format!("does not apply: {}", e.message())))?;

        repo.apply(&diff, ApplyLocation::WorkDir, None)
            .map_err(|e| err(e.message().to_string()))?;
    }

    Ok(recipe.patches.len())
}

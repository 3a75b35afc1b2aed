//! Implementation of `quay source`.

use anyhow::{Context, Result};

use crate::core::SourcePin;
use crate::ops::quay_export::export;
use crate::ops::request::BuildRequest;
use crate::sources::{apply_patches, SourceFetcher, SourceTree};
use crate::util::fs::{read_to_string, write_string};
use crate::util::hash::Fingerprint;

/// Result of preparing the source tree.
#[derive(Debug, Clone)]
pub struct SourceResult {
    pub tree: SourceTree,
    pub patches_applied: usize,
    /// False when an already prepared tree was reused
    pub fetched: bool,
}

/// Fetch the pinned source into the request's source root and patch it.
///
/// Always starts from a clean checkout; the pin is exported first if it
/// hasn't been already.
pub fn source(req: &BuildRequest, fetcher: &dyn SourceFetcher) -> Result<SourceResult> {
    let layout = &req.layout;
    let pin = export(&req.recipe, &layout.sources_file())?.pin;

    // Drop the stamps first so an interrupted fetch is never mistaken for a
    // prepared tree, and a re-fetched tree never for a finished build.
    for stamp in [layout.source_stamp(), layout.build_stamp()] {
        if stamp.exists() {
            std::fs::remove_file(&stamp)
                .with_context(|| format!("failed to remove {}", stamp.display()))?;
        }
    }

    tracing::debug!("fetching {} with {}", pin.url, fetcher.name());
    let tree = fetcher.fetch(&pin, &layout.source_root)?;
    let patches_applied = apply_patches(&req.recipe, &tree)?;

    write_string(
        &layout.source_stamp(),
        &format!("{}\n{}\n", source_fingerprint(req, &pin)?, tree.commit_id),
    )?;

    Ok(SourceResult {
        tree,
        patches_applied,
        fetched: true,
    })
}

/// Reuse a prepared source tree for the request, or prepare one.
pub fn ensure_source(req: &BuildRequest, fetcher: &dyn SourceFetcher) -> Result<SourceResult> {
    let layout = &req.layout;

    if layout.source_stamp().is_file() {
        let pin = export(&req.recipe, &layout.sources_file())?.pin;
        let stamp = read_to_string(&layout.source_stamp())?;
        let current = source_fingerprint(req, &pin)?;

        if stamp.lines().next() != Some(current.as_str()) {
            tracing::debug!("source inputs changed since the tree was prepared");
            return source(req, fetcher);
        }

        match fetcher.open(&pin, &layout.source_root) {
            Ok(tree) => {
                tracing::debug!("reusing source tree at {}", tree.root.display());
                return Ok(SourceResult {
                    tree,
                    patches_applied: req.recipe.patches.len(),
                    fetched: false,
                });
            }
            Err(e) => tracing::debug!("source tree not reusable: {}", e),
        }
    }

    source(req, fetcher)
}

/// Hash of what a prepared tree depends on: the pin and every patch file.
///
/// A missing patch file hashes by name only; applying it reports the error.
fn source_fingerprint(req: &BuildRequest, pin: &SourcePin) -> Result<String> {
    let mut fp = Fingerprint::new();
    fp.update_str(&pin.url).update_str(&pin.commit);

    for entry in &req.recipe.patches {
        fp.update_str(&entry.file);
        let path = req.recipe.patch_path(entry);
        if path.is_file() {
            fp.update_file(&path)?;
        }
    }

    Ok(fp.finish())
}

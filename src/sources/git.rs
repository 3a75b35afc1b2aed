//! Git source fetcher.

use std::path::Path;

use git2::build::CheckoutBuilder;
use git2::{Commit, Oid, Repository};

use crate::core::{GitReference, RecipeError, SourcePin};
use crate::sources::{SourceFetcher, SourceTree};
use crate::util::fs::{ensure_dir, remove_dir_all_if_exists};

/// Fetches pins by cloning with libgit2.
#[derive(Debug, Clone, Default)]
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        GitFetcher
    }
}

impl SourceFetcher for GitFetcher {
    fn name(&self) -> &str {
        "git"
    }

    fn fetch(&self, pin: &SourcePin, destination: &Path) -> Result<SourceTree, RecipeError> {
        let err = |message: String| fetch_error(pin, message);

        remove_dir_all_if_exists(destination).map_err(|e| err(format!("{:#}", e)))?;
        if let Some(parent) = destination.parent() {
            ensure_dir(parent).map_err(|e| err(format!("{:#}", e)))?;
        }

        tracing::debug!("cloning {}", pin.url);
        let repo = Repository::clone(&pin.url, destination)
            .map_err(|e| err(format!("clone failed: {}", e.message())))?;

        let commit = resolve_commit(&repo, pin)?;
        tracing::debug!("{} resolved to {}", pin.commit, commit.id());

        repo.checkout_tree(commit.as_object(), Some(CheckoutBuilder::new().force()))
            .map_err(|e| err(format!("checkout failed: {}", e.message())))?;
        repo.set_head_detached(commit.id())
            .map_err(|e| err(format!("failed to detach HEAD: {}", e.message())))?;

        Ok(SourceTree {
            root: destination.to_path_buf(),
            pin: pin.clone(),
            commit_id: commit.id().to_string(),
        })
    }

    fn open(&self, pin: &SourcePin, root: &Path) -> Result<SourceTree, RecipeError> {
        let repo = Repository::open(root).map_err(|e| {
            fetch_error(
                pin,
                format!(
                    "no source checkout at {} ({}); run `quay source` first",
                    root.display(),
                    e.message()
                ),
            )
        })?;

        let expected = resolve_commit(&repo, pin)?.id();
        let head = repo
            .head()
            .and_then(|h| h.peel_to_commit())
            .map_err(|e| fetch_error(pin, format!("unreadable HEAD: {}", e.message())))?;

        if head.id() != expected {
            return Err(fetch_error(
                pin,
                format!(
                    "checkout at {} is at {}, expected {}",
                    root.display(),
                    head.id(),
                    expected
                ),
            ));
        }

        Ok(SourceTree {
            root: root.to_path_buf(),
            pin: pin.clone(),
            commit_id: head.id().to_string(),
        })
    }
}

/// Resolve a pin's commit string to exactly one commit.
fn resolve_commit<'r>(repo: &'r Repository, pin: &SourcePin) -> Result<Commit<'r>, RecipeError> {
    let not_found = |detail: String| {
        fetch_error(
            pin,
            format!("revision `{}` not found: {}", pin.commit, detail),
        )
    };

    match pin.reference() {
        GitReference::Rev(rev) => {
            let oid = Oid::from_str(&rev).map_err(|e| not_found(e.message().to_string()))?;
            repo.find_commit(oid)
                .map_err(|e| not_found(e.message().to_string()))
        }
        GitReference::Tag(tag) => {
            let by_tag = repo
                .find_reference(&format!("refs/tags/{}", tag))
                .and_then(|r| r.peel_to_commit());

            match by_tag {
                Ok(commit) => Ok(commit),
                // Not a tag; allow abbreviated hashes and other revspecs
                Err(_) => repo
                    .revparse_single(&tag)
                    .and_then(|obj| obj.peel_to_commit())
                    .map_err(|e| not_found(e.message().to_string())),
            }
        }
    }
}

fn fetch_error(pin: &SourcePin, message: String) -> RecipeError {
    RecipeError::Fetch {
        url: pin.url.clone(),
        commit: pin.commit.clone(),
        message,
    }
}

//! SourceFetcher trait - common interface for materializing pinned sources.

use std::path::{Path, PathBuf};

use crate::core::{RecipeError, SourcePin};

/// A source tree materialized from a pin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceTree {
    /// Root of the checkout
    pub root: PathBuf,

    /// The pin it was fetched from
    pub pin: SourcePin,

    /// Full commit hash the pin resolved to
    pub commit_id: String,
}

/// Fetches a pinned revision into a local directory.
pub trait SourceFetcher {
    /// Get the fetcher name for display.
    fn name(&self) -> &str;

    /// Materialize `pin` at `destination`.
    ///
    /// Anything already at `destination` is replaced. Fetching the same pin
    /// into a clean destination always yields the same tree.
    fn fetch(&self, pin: &SourcePin, destination: &Path) -> Result<SourceTree, RecipeError>;

    /// Open a tree previously fetched into `root`, without touching the network.
    fn open(&self, pin: &SourcePin, root: &Path) -> Result<SourceTree, RecipeError>;
}

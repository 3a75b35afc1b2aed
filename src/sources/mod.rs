//! Package sources.
//!
//! Sources are responsible for materializing a recipe's pinned upstream
//! revision as a local tree, and for applying the recipe's patches to it.

pub mod git;
pub mod patch;
pub mod source;

pub use git::GitFetcher;
pub use patch::apply_patches;
pub use source::{SourceFetcher, SourceTree};

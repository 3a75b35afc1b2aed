//! Pinned source identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::core::error::RecipeError;

/// A repository URL and the revision it is pinned to.
///
/// Pins are recorded once at export time and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourcePin {
    pub url: String,
    pub commit: String,
}

/// How a pin's `commit` string is resolved in the repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GitReference {
    /// A tag name, e.g. `v0.8.0`
    Tag(String),
    /// A full commit hash
    Rev(String),
}

impl SourcePin {
    /// Create a pin, validating both components.
    pub fn new(url: impl Into<String>, commit: impl Into<String>) -> Result<Self, RecipeError> {
        let pin = SourcePin {
            url: url.into(),
            commit: commit.into(),
        };
        pin.validate()?;
        Ok(pin)
    }

    /// The conventional tag pin for a version: `v<version>`.
    pub fn for_version(url: impl Into<String>, version: &semver::Version) -> Result<Self, RecipeError> {
        Self::new(url, format!("v{}", version))
    }

    /// Check that the URL is usable and the revision is non-empty.
    pub fn validate(&self) -> Result<(), RecipeError> {
        if self.url.trim().is_empty() {
            return Err(RecipeError::configuration("source url is empty"));
        }
        if self.commit.trim().is_empty() {
            return Err(RecipeError::configuration("source commit is empty"));
        }

        // Anything that isn't a URL is treated as a local path (mirrors, tests)
        if let Ok(url) = Url::parse(&self.url) {
            match url.scheme() {
                "https" | "http" | "ssh" | "git" | "file" => {}
                // Windows drive letters parse as a one-letter scheme
                s if s.len() == 1 => {}
                other => {
                    return Err(RecipeError::configuration(format!(
                        "unsupported source url scheme `{}` in `{}`",
                        other, self.url
                    )))
                }
            }
        }

        Ok(())
    }

    /// Classify the commit string.
    pub fn reference(&self) -> GitReference {
        if is_full_hash(&self.commit) {
            GitReference::Rev(self.commit.clone())
        } else {
            GitReference::Tag(self.commit.clone())
        }
    }
}

impl fmt::Display for SourcePin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.url, self.commit)
    }
}

fn is_full_hash(s: &str) -> bool {
    s.len() == 40 && s.chars().all(|c| c.is_ascii_hexdigit())
}

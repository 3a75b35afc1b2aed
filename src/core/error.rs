//! Recipe pipeline errors.
//!
//! Every stage of the pipeline fails with one of these. None of them are
//! retried; the caller re-runs the whole pipeline.

use miette::Diagnostic;
use thiserror::Error;

/// A fatal error raised by one of the pipeline stages.
#[derive(Debug, Error, Diagnostic)]
pub enum RecipeError {
    /// The source could not be cloned or the pinned revision does not exist.
    #[error("failed to fetch `{url}` at `{commit}`: {message}")]
    #[diagnostic(
        code(quay::fetch),
        help("check the `[source]` section of Recipe.toml and your network connection")
    )]
    Fetch {
        url: String,
        commit: String,
        message: String,
    },

    /// Options or recipe data are malformed or contradictory.
    #[error("invalid configuration: {message}")]
    #[diagnostic(code(quay::configuration))]
    Configuration { message: String },

    /// A recipe patch is missing or does not apply cleanly.
    #[error("failed to apply patch `{patch}`: {message}")]
    #[diagnostic(
        code(quay::patch),
        help("regenerate the patch against the pinned source revision")
    )]
    Patch { patch: String, message: String },

    /// An external toolchain step exited unsuccessfully.
    #[error("{step} step failed{}: {message}", exit_suffix(.exit_code))]
    #[diagnostic(
        code(quay::build),
        help("run with --verbose to see the full toolchain command line")
    )]
    Build {
        step: BuildStep,
        exit_code: Option<i32>,
        message: String,
    },
}

impl RecipeError {
    /// Shorthand for a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        RecipeError::Configuration {
            message: message.into(),
        }
    }

    /// Shorthand for a build error without an exit code.
    pub fn build(step: BuildStep, message: impl Into<String>) -> Self {
        RecipeError::Build {
            step,
            exit_code: None,
            message: message.into(),
        }
    }
}

fn exit_suffix(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!(" with exit code {}", code),
        None => String::new(),
    }
}

/// External toolchain steps driven by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStep {
    Configure,
    Build,
    Install,
}

impl std::fmt::Display for BuildStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildStep::Configure => write!(f, "configure"),
            BuildStep::Build => write!(f, "build"),
            BuildStep::Install => write!(f, "install"),
        }
    }
}

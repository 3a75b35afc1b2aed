//! Core data types for recipes and their build requests.

pub mod artifact;
pub mod descriptor;
pub mod error;
pub mod layout;
pub mod options;
pub mod recipe;
pub mod settings;
pub mod source_pin;

pub use artifact::{Artifact, ArtifactKind, ArtifactSet};
pub use descriptor::{describe, PackageDescriptor};
pub use error::{BuildStep, RecipeError};
pub use layout::BuildLayout;
pub use options::{OptionOverride, OptionSet, OptionValue};
pub use recipe::Recipe;
pub use settings::{BuildType, Platform, Settings};
pub use source_pin::{GitReference, SourcePin};

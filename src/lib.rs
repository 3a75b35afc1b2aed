//! quay - a package-recipe orchestrator for CMake-based native libraries
//!
//! This crate provides the core library functionality for quay: fetching a
//! pinned upstream source, translating recipe options into CMake
//! configuration, driving the build, curating the installed artifacts and
//! describing the result to consumers.

pub mod builder;
pub mod core;
pub mod ops;
pub mod sources;
pub mod util;

/// Test utilities for quay unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a throwaway git repository and a fake build
/// backend.
#[cfg(test)]
pub mod test_support;

pub use crate::core::{
    descriptor::PackageDescriptor, options::OptionSet, recipe::Recipe, settings::Settings,
    source_pin::SourcePin,
};

pub use ops::BuildRequest;
pub use util::context::GlobalContext;

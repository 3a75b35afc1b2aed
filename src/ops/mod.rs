//! High-level operations.
//!
//! This module contains the implementation of quay commands. Each stage can
//! run on its own; `create` runs them all.

pub mod quay_build;
pub mod quay_clean;
pub mod quay_create;
pub mod quay_export;
pub mod quay_inspect;
pub mod quay_package;
pub mod quay_source;
pub mod request;

pub use quay_build::{build, toolchain_config, BuildOptions, BuildResult};
pub use quay_clean::{clean, CleanScope};
pub use quay_create::{create, CreateResult};
pub use quay_export::{export, recorded_pin, ExportResult};
pub use quay_inspect::{info, inspect, Inspection};
pub use quay_package::{package, PackageResult};
pub use quay_source::{ensure_source, source, SourceResult};
pub use request::BuildRequest;

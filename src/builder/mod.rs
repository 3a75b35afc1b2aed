//! Driving the upstream CMake build.
//!
//! Options are translated into a toolchain configuration, the backend
//! configures and builds in the layout's build root, and the curator installs
//! and prunes the result down to one linkage.

pub mod backend;
pub mod cmake;
pub mod curate;
pub mod toolchain_file;
pub mod translate;

pub use backend::{configure_and_build, existing_output, BuildBackend, BuildOutput};
pub use cmake::CMakeBackend;
pub use curate::{curate, curate_installed, CurationAction, CurationReport, CurationWarning};
pub use toolchain_file::write_toolchain_file;
pub use translate::{translate, ToolchainConfig};

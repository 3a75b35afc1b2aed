//! Test utilities for quay unit tests.
//!
//! Provides a local git repository to fetch from and a build backend that
//! fakes a CMake install, so the pipeline can be exercised without network
//! access or a C++ toolchain.
//!
//! # Example
//!
//! ```rust,ignore
//! use quay::test_support::{FakeBackend, GitFixture};
//!
//! #[test]
//! fn test_example() {
//!     let fixture = GitFixture::new();
//!     fixture.commit("CMakeLists.txt", "project(demo)\n", "initial");
//!     fixture.tag("v0.8.0");
//!
//!     let backend = FakeBackend::new();
//!     // Point a recipe at fixture.url() and run it with the backend...
//! }
//! ```

use std::cell::RefCell;
use std::path::Path;

use git2::{IndexAddOption, Oid, Repository, Signature};
use tempfile::TempDir;

use crate::builder::{BuildBackend, BuildOutput, ToolchainConfig};
use crate::core::{BuildStep, RecipeError};

/// A throwaway git repository with helpers for committing and tagging.
pub struct GitFixture {
    dir: TempDir,
    repo: Repository,
}

impl GitFixture {
    /// Create an empty repository in a temp directory.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let repo = Repository::init(dir.path()).expect("failed to init repository");
        GitFixture { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// URL to clone from.
    pub fn url(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    /// Write `contents` to `path` and commit everything. Returns the commit id.
    pub fn commit(&self, path: &str, contents: &str, message: &str) -> String {
        let file = self.dir.path().join(path);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).expect("failed to create directory");
        }
        std::fs::write(&file, contents).expect("failed to write file");

        let mut index = self.repo.index().expect("failed to open index");
        index
            .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
            .expect("failed to stage files");
        index.write().expect("failed to write index");
        let tree_id = index.write_tree().expect("failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("failed to find tree");

        let sig = Signature::now("quay", "quay@example.com").expect("invalid signature");
        let parents = match self.head() {
            Some(oid) => vec![self.repo.find_commit(oid).expect("failed to find HEAD")],
            None => Vec::new(),
        };
        let parent_refs: Vec<_> = parents.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .expect("failed to commit")
            .to_string()
    }

    /// Create a lightweight tag at HEAD.
    pub fn tag(&self, name: &str) {
        let oid = self.head().expect("tag needs a commit");
        let object = self.repo.find_object(oid, None).expect("failed to find HEAD");
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("failed to create tag");
    }

    fn head(&self) -> Option<Oid> {
        self.repo.head().ok().and_then(|h| h.target())
    }
}

impl Default for GitFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Step a [`FakeBackend`] should fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Configure,
    Build,
    Install,
}

/// A build backend that records its calls and installs a canned file set.
///
/// The install writes what a real iceoryx2 install leaves behind: both
/// linkages of both libraries for every platform, plus versioned headers.
#[derive(Debug, Default)]
pub struct FakeBackend {
    fail_at: Option<FailAt>,
    install_files: Vec<String>,
    calls: RefCell<Vec<String>>,
    configured: RefCell<Option<ToolchainConfig>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        FakeBackend {
            fail_at: None,
            install_files: default_install_files(),
            calls: RefCell::new(Vec::new()),
            configured: RefCell::new(None),
        }
    }

    /// Fail with exit code 2 at the given step.
    pub fn failing_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    /// Install exactly these files (relative to the package root) instead.
    pub fn installing(mut self, files: &[&str]) -> Self {
        self.install_files = files.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Steps run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// The configuration passed to the last configure step.
    pub fn configured(&self) -> Option<ToolchainConfig> {
        self.configured.borrow().clone()
    }

    fn record(&self, step: FailAt, name: &str) -> Result<(), RecipeError> {
        self.calls.borrow_mut().push(name.to_string());
        if self.fail_at == Some(step) {
            let build_step = match step {
                FailAt::Configure => BuildStep::Configure,
                FailAt::Build => BuildStep::Build,
                FailAt::Install => BuildStep::Install,
            };
            return Err(RecipeError::Build {
                step: build_step,
                exit_code: Some(2),
                message: format!("fake {} failure", name),
            });
        }
        Ok(())
    }
}

impl BuildBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    fn configure(
        &self,
        _source_root: &Path,
        build_root: &Path,
        _toolchain_file: &Path,
        _package_root: &Path,
        config: &ToolchainConfig,
    ) -> Result<(), RecipeError> {
        self.record(FailAt::Configure, "configure")?;
        *self.configured.borrow_mut() = Some(config.clone());
        std::fs::write(build_root.join("CMakeCache.txt"), "")
            .map_err(|e| RecipeError::build(BuildStep::Configure, e.to_string()))
    }

    fn build(&self, _output: &BuildOutput) -> Result<(), RecipeError> {
        self.record(FailAt::Build, "build")
    }

    fn install(&self, _output: &BuildOutput, package_root: &Path) -> Result<(), RecipeError> {
        self.record(FailAt::Install, "install")?;
        for file in &self.install_files {
            let path = package_root.join(file);
            write_empty(&path)
                .map_err(|e| RecipeError::build(BuildStep::Install, e.to_string()))?;
        }
        Ok(())
    }
}

fn write_empty(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, "")
}

fn default_install_files() -> Vec<String> {
    [
        "lib/libiceoryx2_ffi_c.a",
        "lib/libiceoryx2_ffi_c.so",
        "lib/libiceoryx2_cxx.a",
        "lib/libiceoryx2_cxx.so",
        "lib/libiceoryx2_ffi_c.dylib",
        "lib/libiceoryx2_cxx.dylib",
        "lib/iceoryx2_ffi_c.lib",
        "lib/iceoryx2_ffi_c.dll",
        "lib/iceoryx2_cxx.lib",
        "lib/iceoryx2_cxx.dll",
        "include/iceoryx2/v0.8.0/iox2/node.hpp",
        "include/iceoryx2/v0.8.0/iox2/iceoryx2.h",
        "lib/cmake/iceoryx2-cxx/iceoryx2-cxxConfig.cmake",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_fixture() {
        let fixture = GitFixture::new();
        let first = fixture.commit("a.txt", "one", "first");
        fixture.tag("v1");
        let second = fixture.commit("a.txt", "two", "second");

        assert_ne!(first, second);
        assert_eq!(first.len(), 40);
        let repo = Repository::open(fixture.path()).unwrap();
        let tagged = repo.revparse_single("v1").unwrap().peel_to_commit().unwrap();
        assert_eq!(tagged.id().to_string(), first);
    }

    #[test]
    fn test_fake_backend_fails_on_demand() {
        let backend = FakeBackend::new().failing_at(FailAt::Build);
        let tmp = TempDir::new().unwrap();
        let output = BuildOutput {
            source_root: tmp.path().to_path_buf(),
            build_root: tmp.path().to_path_buf(),
            toolchain_file: tmp.path().join("tc.cmake"),
            build_type: crate::core::BuildType::Release,
            multi_config: false,
        };

        let err = backend.build(&output).unwrap_err();
        assert!(matches!(
            err,
            RecipeError::Build {
                step: BuildStep::Build,
                exit_code: Some(2),
                ..
            }
        ));
        assert_eq!(backend.calls(), vec!["build"]);
    }
}

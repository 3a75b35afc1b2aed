//! CMake backend.

use std::path::{Path, PathBuf};

use crate::builder::backend::{BuildBackend, BuildOutput};
use crate::builder::translate::ToolchainConfig;
use crate::core::{BuildStep, RecipeError};
use crate::util::process::{find_cmake, output_tail, ProcessBuilder};

/// Lines of toolchain stderr kept in error messages.
const ERROR_TAIL_LINES: usize = 40;

/// Drives configure, build and install through the `cmake` executable.
#[derive(Debug, Clone)]
pub struct CMakeBackend {
    cmake: PathBuf,
    jobs: Option<usize>,
    verbose: bool,
}

impl CMakeBackend {
    /// Locate cmake (configured path, `$CMAKE`, then PATH).
    pub fn new(configured: Option<&Path>) -> Result<Self, RecipeError> {
        let cmake = find_cmake(configured).ok_or_else(|| {
            RecipeError::build(
                BuildStep::Configure,
                "CMake not found\n\
                 \n\
                 CMake is required to build recipes.\n\
                 Install CMake and ensure it's in your PATH, or set `build.cmake` in config.",
            )
        })?;

        Ok(CMakeBackend {
            cmake,
            jobs: None,
            verbose: false,
        })
    }

    /// Use a specific cmake executable without searching.
    pub fn with_program(cmake: PathBuf) -> Self {
        CMakeBackend {
            cmake,
            jobs: None,
            verbose: false,
        }
    }

    /// Number of parallel build jobs.
    pub fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    /// Pass `--verbose` to the build step.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Arguments for the configure step.
    pub fn configure_args(
        &self,
        source_root: &Path,
        build_root: &Path,
        toolchain_file: &Path,
        package_root: &Path,
        config: &ToolchainConfig,
    ) -> Vec<String> {
        let mut args = vec![
            "-S".to_string(),
            source_root.display().to_string(),
            "-B".to_string(),
            build_root.display().to_string(),
        ];

        if let Some(ref generator) = config.generator {
            args.push("-G".to_string());
            args.push(generator.clone());
        }

        args.push(format!("-DCMAKE_TOOLCHAIN_FILE={}", toolchain_file.display()));
        args.push(format!("-DCMAKE_INSTALL_PREFIX={}", package_root.display()));

        for (name, value) in &config.cache_variables {
            args.push(format!("-D{}={}", name, value));
        }

        args
    }

    /// Arguments for the build step.
    pub fn build_args(&self, output: &BuildOutput) -> Vec<String> {
        let mut args = vec![
            "--build".to_string(),
            output.build_root.display().to_string(),
            "--config".to_string(),
            output.build_type.as_str().to_string(),
        ];

        args.push("--parallel".to_string());
        if let Some(jobs) = self.jobs {
            args.push(jobs.to_string());
        }

        if self.verbose {
            args.push("--verbose".to_string());
        }

        args
    }

    /// Arguments for the install step.
    pub fn install_args(&self, output: &BuildOutput, package_root: &Path) -> Vec<String> {
        vec![
            "--install".to_string(),
            output.build_root.display().to_string(),
            "--config".to_string(),
            output.build_type.as_str().to_string(),
            "--prefix".to_string(),
            package_root.display().to_string(),
        ]
    }

    fn run(&self, step: BuildStep, args: Vec<String>, cwd: &Path) -> Result<(), RecipeError> {
        let cmd = ProcessBuilder::new(&self.cmake).args(&args).cwd(cwd);
        tracing::debug!("{}: {}", step, cmd.display_command());

        let output = cmd
            .exec()
            .map_err(|e| RecipeError::build(step, format!("{:#}", e)))?;

        if self.verbose {
            tracing::debug!("{}", String::from_utf8_lossy(&output.stdout));
        }

        if !output.status.success() {
            let mut message = output_tail(&output.stderr, ERROR_TAIL_LINES);
            if message.trim().is_empty() {
                message = output_tail(&output.stdout, ERROR_TAIL_LINES);
            }
            return Err(RecipeError::Build {
                step,
                exit_code: output.status.code(),
                message: format!("`{}`\n{}", cmd.display_command(), message),
            });
        }

        Ok(())
    }
}

impl BuildBackend for CMakeBackend {
    fn name(&self) -> &str {
        "cmake"
    }

    fn configure(
        &self,
        source_root: &Path,
        build_root: &Path,
        toolchain_file: &Path,
        package_root: &Path,
        config: &ToolchainConfig,
    ) -> Result<(), RecipeError> {
        if !is_cmake_project(source_root) {
            return Err(RecipeError::build(
                BuildStep::Configure,
                format!("no CMakeLists.txt in {}", source_root.display()),
            ));
        }

        let args =
            self.configure_args(source_root, build_root, toolchain_file, package_root, config);
        self.run(BuildStep::Configure, args, build_root)
    }

    fn build(&self, output: &BuildOutput) -> Result<(), RecipeError> {
        self.run(BuildStep::Build, self.build_args(output), &output.build_root)
    }

    fn install(&self, output: &BuildOutput, package_root: &Path) -> Result<(), RecipeError> {
        self.run(
            BuildStep::Install,
            self.install_args(output, package_root),
            &output.build_root,
        )
    }
}

/// Check if a directory contains a CMake project.
pub fn is_cmake_project(dir: &Path) -> bool {
    dir.join("CMakeLists.txt").exists()
}

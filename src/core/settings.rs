//! Build settings: target OS, architecture, build type and compiler.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::error::RecipeError;

/// Platform family used by artifact curation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    Linux,
    Macos,
    Windows,
    Other,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Linux => write!(f, "Linux"),
            Platform::Macos => write!(f, "Macos"),
            Platform::Windows => write!(f, "Windows"),
            Platform::Other => write!(f, "Other"),
        }
    }
}

/// CMake build type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum BuildType {
    Debug,
    #[default]
    Release,
    RelWithDebInfo,
    MinSizeRel,
}

impl BuildType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildType::Debug => "Debug",
            BuildType::Release => "Release",
            BuildType::RelWithDebInfo => "RelWithDebInfo",
            BuildType::MinSizeRel => "MinSizeRel",
        }
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BuildType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" => Ok(BuildType::Debug),
            "release" => Ok(BuildType::Release),
            "relwithdebinfo" => Ok(BuildType::RelWithDebInfo),
            "minsizerel" => Ok(BuildType::MinSizeRel),
            _ => Err(format!(
                "invalid build type '{}'; expected Debug, Release, RelWithDebInfo or MinSizeRel",
                s
            )),
        }
    }
}

/// Settings describing the target of one build request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Operating system name (`Linux`, `Macos`, `Windows`, `WindowsStore`, ...)
    pub os: String,
    /// CPU architecture (`x86_64`, `armv8`, ...)
    pub arch: String,
    pub build_type: BuildType,
    /// Compiler family (`gcc`, `clang`, `apple-clang`, `msvc`)
    pub compiler: Option<String>,
}

impl Settings {
    /// Settings for the host machine.
    pub fn host() -> Self {
        let os = match std::env::consts::OS {
            "linux" => "Linux",
            "macos" => "Macos",
            "windows" => "Windows",
            "freebsd" => "FreeBSD",
            other => other,
        };

        let arch = match std::env::consts::ARCH {
            "aarch64" => "armv8",
            other => other,
        };

        Settings {
            os: os.to_string(),
            arch: arch.to_string(),
            build_type: BuildType::default(),
            compiler: None,
        }
    }

    /// Apply a `key=value` setting override.
    pub fn apply(&mut self, assignment: &str) -> Result<(), RecipeError> {
        let (key, value) = assignment.split_once('=').ok_or_else(|| {
            RecipeError::configuration(format!("expected `key=value`, got `{}`", assignment))
        })?;
        let value = value.trim();

        match key.trim() {
            "os" => self.os = value.to_string(),
            "arch" => self.arch = value.to_string(),
            "build_type" => {
                self.build_type = value.parse().map_err(RecipeError::configuration)?;
            }
            "compiler" => self.compiler = Some(value.to_string()),
            other => {
                return Err(RecipeError::configuration(format!(
                    "unknown setting `{}`; expected os, arch, build_type or compiler",
                    other
                )))
            }
        }
        Ok(())
    }

    /// The platform family for this OS.
    pub fn platform(&self) -> Platform {
        match self.os.as_str() {
            "Linux" => Platform::Linux,
            "Macos" => Platform::Macos,
            "Windows" | "WindowsStore" => Platform::Windows,
            _ => Platform::Other,
        }
    }

    pub fn is_windows(&self) -> bool {
        self.platform() == Platform::Windows
    }

    /// Whether the CMake generator for these settings is multi-config.
    pub fn is_multi_config(&self, generator: Option<&str>) -> bool {
        match generator {
            Some(gen) => {
                gen.contains("Visual") || gen.contains("Xcode") || gen.contains("Multi-Config")
            }
            None => self.compiler.as_deref() == Some("msvc"),
        }
    }
}

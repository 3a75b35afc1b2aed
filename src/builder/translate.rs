//! Option-to-toolchain translation.
//!
//! Each option becomes a CMake variable named after the uppercased option;
//! booleans become `ON`/`OFF` and anything else passes through verbatim.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::recipe::CMakeSpec;
use crate::core::{OptionSet, OptionValue, Settings};

/// CMake-level configuration derived from an option set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ToolchainConfig {
    /// Option-derived variables, written to the toolchain file
    pub variables: BTreeMap<String, String>,

    /// Fixed variables passed on the configure command line
    pub cache_variables: BTreeMap<String, String>,

    /// Standard CMake variables implied by well-known options and settings
    pub builtins: BTreeMap<String, String>,

    /// Generator, if one was chosen
    pub generator: Option<String>,

    /// Whether the generator is multi-config (build type chosen at build time)
    pub multi_config: bool,
}

impl ToolchainConfig {
    /// Option-derived and fixed variables as one map.
    pub fn merged(&self) -> BTreeMap<String, String> {
        let mut all = self.variables.clone();
        all.extend(
            self.cache_variables
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        all
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cache_variables
            .get(name)
            .or_else(|| self.variables.get(name))
            .or_else(|| self.builtins.get(name))
            .map(String::as_str)
    }
}

/// Normalize a single option value for CMake.
pub fn cmake_value(value: &OptionValue) -> String {
    match value {
        OptionValue::Bool(true) => "ON".to_string(),
        OptionValue::Bool(false) => "OFF".to_string(),
        OptionValue::Str(s) => s.clone(),
    }
}

/// Translate an option set into toolchain configuration.
///
/// Deterministic and total: every option maps to a variable, including ones
/// the recipe doesn't declare.
pub fn translate(options: &OptionSet, settings: &Settings, cmake: &CMakeSpec) -> ToolchainConfig {
    let mut config = ToolchainConfig::default();

    for (name, value) in options.iter() {
        config
            .variables
            .insert(name.to_ascii_uppercase(), cmake_value(value));
    }

    for (name, value) in &cmake.cache_variables {
        config
            .cache_variables
            .insert(name.to_ascii_uppercase(), cmake_value(value));
    }

    if let Some(shared) = options.get("shared").and_then(OptionValue::as_bool) {
        config
            .builtins
            .insert("BUILD_SHARED_LIBS".to_string(), on_off(shared));
    }
    if let Some(pic) = options.get("fPIC").and_then(OptionValue::as_bool) {
        config
            .builtins
            .insert("CMAKE_POSITION_INDEPENDENT_CODE".to_string(), on_off(pic));
    }

    config.generator = cmake.generator.clone();
    config.multi_config = settings.is_multi_config(config.generator.as_deref());
    if !config.multi_config {
        config.builtins.insert(
            "CMAKE_BUILD_TYPE".to_string(),
            settings.build_type.as_str().to_string(),
        );
    }

    config
}

fn on_off(b: bool) -> String {
    cmake_value(&OptionValue::Bool(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::BuildType;

    fn linux() -> Settings {
        Settings {
            os: "Linux".to_string(),
            arch: "x86_64".to_string(),
            build_type: BuildType::Release,
            compiler: Some("gcc".to_string()),
        }
    }

    fn options(pairs: &[(&str, OptionValue)]) -> OptionSet {
        let mut set = OptionSet::new();
        for (name, value) in pairs {
            set.insert(name, value.clone(), &[]).unwrap();
        }
        set
    }

    #[test]
    fn test_bool_translation() {
        let config = translate(
            &options(&[("shared", true.into()), ("build_testing", false.into())]),
            &linux(),
            &CMakeSpec::default(),
        );
        assert_eq!(config.variables["SHARED"], "ON");
        assert_eq!(config.variables["BUILD_TESTING"], "OFF");
    }

    #[test]
    fn test_string_passthrough() {
        let config = translate(
            &options(&[("build_type", "Release".into())]),
            &linux(),
            &CMakeSpec::default(),
        );
        assert_eq!(config.variables.len(), 1);
        assert_eq!(config.variables["BUILD_TYPE"], "Release");
    }

    #[test]
    fn test_unknown_option_passes_through() {
        let config = translate(
            &options(&[("with_tracing_backend", "lttng".into())]),
            &linux(),
            &CMakeSpec::default(),
        );
        assert_eq!(config.variables["WITH_TRACING_BACKEND"], "lttng");
    }

    #[test]
    fn test_fixed_flag_always_injected() {
        let config = translate(&OptionSet::new(), &linux(), &CMakeSpec::default());
        assert!(config.variables.is_empty());
        assert_eq!(config.cache_variables["BUILD_CXX"], "ON");
    }

    #[test]
    fn test_deterministic() {
        let set = options(&[
            ("shared", false.into()),
            ("fPIC", true.into()),
            ("build_examples", false.into()),
        ]);
        let a = translate(&set, &linux(), &CMakeSpec::default());
        let b = translate(&set.clone(), &linux(), &CMakeSpec::default());
        assert_eq!(a, b);
    }

    #[test]
    fn test_builtins() {
        let set = options(&[("shared", true.into()), ("fPIC", true.into())]);
        let config = translate(&set, &linux(), &CMakeSpec::default());
        assert_eq!(config.builtins["BUILD_SHARED_LIBS"], "ON");
        assert_eq!(config.builtins["CMAKE_POSITION_INDEPENDENT_CODE"], "ON");
        assert_eq!(config.builtins["CMAKE_BUILD_TYPE"], "Release");
        assert!(!config.merged().contains_key("BUILD_SHARED_LIBS"));

        let mut msvc = linux();
        msvc.os = "Windows".to_string();
        msvc.compiler = Some("msvc".to_string());
        let config = translate(&set, &msvc, &CMakeSpec::default());
        assert!(config.multi_config);
        assert!(!config.builtins.contains_key("CMAKE_BUILD_TYPE"));
    }
}

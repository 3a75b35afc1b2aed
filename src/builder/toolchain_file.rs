//! Generated CMake toolchain file.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::builder::translate::ToolchainConfig;
use crate::util::fs::write_string;

/// Name of the generated toolchain file inside the generators folder.
pub const TOOLCHAIN_FILE: &str = "quay_toolchain.cmake";

/// Render the toolchain file. Byte-stable for a given config.
pub fn render(config: &ToolchainConfig) -> String {
    let mut out = String::new();
    out.push_str("# Generated by quay. Do not edit.\n");
    out.push_str("cmake_minimum_required(VERSION 3.15)\n\n");

    if !config.builtins.is_empty() {
        out.push_str("# Standard variables\n");
        for (name, value) in &config.builtins {
            push_set(&mut out, name, value);
        }
        out.push('\n');
    }

    if !config.variables.is_empty() {
        out.push_str("# Recipe options\n");
        for (name, value) in &config.variables {
            push_set(&mut out, name, value);
        }
    }

    out
}

fn push_set(out: &mut String, name: &str, value: &str) {
    out.push_str(&format!(
        "set({name} \"{value}\" CACHE STRING \"Variable {name} defined by quay\" FORCE)\n",
        name = name,
        value = escape(value)
    ));
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Write the toolchain file into `generators_dir`, returning its path.
pub fn write_toolchain_file(config: &ToolchainConfig, generators_dir: &Path) -> Result<PathBuf> {
    let path = generators_dir.join(TOOLCHAIN_FILE);
    write_string(&path, &render(config))?;
    tracing::debug!("wrote {}", path.display());
    Ok(path)
}

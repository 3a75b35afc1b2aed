//! Implementation of `quay package`.

use std::path::PathBuf;

use anyhow::Result;

use crate::builder::{curate, existing_output, BuildBackend, BuildOutput, CurationReport};
use crate::core::descriptor::DESCRIPTOR_FILE;
use crate::core::{describe, PackageDescriptor};
use crate::ops::quay_build::toolchain_config;
use crate::ops::request::BuildRequest;
use crate::util::fs::{remove_dir_all_if_exists, write_string};

/// Result of packaging.
#[derive(Debug, Clone)]
pub struct PackageResult {
    pub report: CurationReport,
    pub descriptor: PackageDescriptor,
    pub descriptor_path: PathBuf,
    pub pkg_config_path: PathBuf,
}

/// Install, curate and describe a finished build.
///
/// `output` is the build to package; when `None` the build already on disk
/// for this request is used.
pub fn package(
    req: &BuildRequest,
    backend: &dyn BuildBackend,
    output: Option<&BuildOutput>,
) -> Result<PackageResult> {
    let output = match output {
        Some(output) => output.clone(),
        None => existing_output(&req.layout, &toolchain_config(req), req.settings.build_type)?,
    };

    let package_root = &req.layout.package_root;
    // Start from an empty prefix so files from an earlier option set can't leak in
    remove_dir_all_if_exists(package_root)?;

    let report = curate(backend, &output, package_root, req.platform(), req.shared())?;

    let descriptor = describe(&report.artifacts, &req.recipe, &req.version, req.shared());

    let descriptor_path = package_root.join(DESCRIPTOR_FILE);
    descriptor.save(&descriptor_path)?;

    let pkg_config_path = req
        .layout
        .lib_dir()
        .join("pkgconfig")
        .join(format!("{}.pc", req.name()));
    write_string(
        &pkg_config_path,
        &descriptor.to_pkg_config(package_root, req.recipe.package.description.as_deref()),
    )?;

    tracing::debug!("packaged {} {} into {}", req.name(), req.version, package_root.display());

    Ok(PackageResult {
        report,
        descriptor,
        descriptor_path,
        pkg_config_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recipe::ICEORYX2_RECIPE;
    use crate::core::{ArtifactKind, Recipe, RecipeError, Settings};
    use crate::test_support::FakeBackend;
    use tempfile::TempDir;

    fn request(work: &TempDir, os: &str) -> BuildRequest {
        let recipe = Recipe::parse(ICEORYX2_RECIPE, work.path().to_path_buf()).unwrap();
        let mut settings = Settings::host();
        settings.os = os.to_string();
        BuildRequest::new(recipe, &[], settings, &work.path().join(".quay")).unwrap()
    }

    fn fake_build(req: &BuildRequest) {
        let generators = &req.layout.generators_dir;
        std::fs::create_dir_all(generators).unwrap();
        std::fs::write(generators.join("quay_toolchain.cmake"), "").unwrap();
        std::fs::write(req.layout.build_stamp(), "").unwrap();
    }

    #[test]
    fn test_package_requires_build() {
        let work = TempDir::new().unwrap();
        let req = request(&work, "Linux");

        let err = package(&req, &FakeBackend::new(), None).unwrap_err();
        assert!(err.downcast_ref::<RecipeError>().is_some());
        assert!(err.to_string().contains("quay build"));
    }

    #[test]
    fn test_package_requires_completed_build() {
        let work = TempDir::new().unwrap();
        let req = request(&work, "Linux");
        fake_build(&req);
        std::fs::remove_file(req.layout.build_stamp()).unwrap();

        assert!(package(&req, &FakeBackend::new(), None).is_err());
        assert!(!req.layout.package_root.exists());
    }

    #[test]
    fn test_package_writes_descriptors() {
        let work = TempDir::new().unwrap();
        let req = request(&work, "Linux");
        fake_build(&req);

        let result = package(&req, &FakeBackend::new(), None).unwrap();

        assert_eq!(result.report.artifacts.count(ArtifactKind::SharedObject), 0);
        assert!(result.descriptor_path.exists());
        let loaded = PackageDescriptor::load(&result.descriptor_path).unwrap();
        assert_eq!(loaded, result.descriptor);

        let pc = std::fs::read_to_string(&result.pkg_config_path).unwrap();
        assert!(pc.contains("Name: iceoryx2"));
        assert!(pc.contains("Description: Zero-copy inter-process communication"));
    }

    #[test]
    fn test_repackage_starts_clean() {
        let work = TempDir::new().unwrap();
        let req = request(&work, "Linux");
        fake_build(&req);

        let stale = req.layout.package_root.join("lib/libstale.a");
        std::fs::create_dir_all(stale.parent().unwrap()).unwrap();
        std::fs::write(&stale, "").unwrap();

        package(&req, &FakeBackend::new(), None).unwrap();
        assert!(!stale.exists());
    }
}

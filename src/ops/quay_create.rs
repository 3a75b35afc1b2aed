//! Implementation of `quay create`: every stage, in order.

use anyhow::Result;

use crate::builder::BuildBackend;
use crate::ops::quay_build::{build, BuildOptions, BuildResult};
use crate::ops::quay_export::{export, ExportResult};
use crate::ops::quay_package::{package, PackageResult};
use crate::ops::request::BuildRequest;
use crate::sources::SourceFetcher;

/// Result of a full pipeline run.
#[derive(Debug, Clone)]
pub struct CreateResult {
    pub export: ExportResult,
    pub build: BuildResult,
    pub package: PackageResult,
}

/// Export, fetch, patch, configure, build, install, curate and describe.
pub fn create(
    req: &BuildRequest,
    fetcher: &dyn SourceFetcher,
    backend: &dyn BuildBackend,
    opts: &BuildOptions,
) -> Result<CreateResult> {
    let export = export(&req.recipe, &req.layout.sources_file())?;
    let build = build(req, fetcher, backend, opts)?;
    let package = package(req, backend, Some(&build.output))?;

    Ok(CreateResult {
        export,
        build,
        package,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recipe::ICEORYX2_RECIPE;
    use crate::core::{ArtifactKind, OptionOverride, Recipe, Settings};
    use crate::sources::GitFetcher;
    use crate::test_support::{FakeBackend, GitFixture};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    struct Pipeline {
        _fixture: GitFixture,
        _work: TempDir,
        req: BuildRequest,
    }

    fn pipeline(os: &str, overrides: &[&str]) -> Pipeline {
        let fixture = GitFixture::new();
        fixture.commit(
            "CMakeLists.txt",
            "cmake_minimum_required(VERSION 3.22)\nproject(iceoryx2 VERSION 0.8.0)\n",
            "initial",
        );
        fixture.tag("v0.8.0");

        let work = TempDir::new().unwrap();
        let contents = ICEORYX2_RECIPE.replace(
            "https://github.com/eclipse-iceoryx/iceoryx2.git",
            &fixture.url().replace('\\', "/"),
        );
        let recipe = Recipe::parse(&contents, work.path().to_path_buf()).unwrap();

        let mut settings = Settings::host();
        settings.os = os.to_string();
        settings.compiler = None;
        let overrides: Vec<OptionOverride> = overrides.iter().map(|o| o.parse().unwrap()).collect();

        let req =
            BuildRequest::new(recipe, &overrides, settings, &work.path().join(".quay")).unwrap();
        Pipeline {
            _fixture: fixture,
            _work: work,
            req,
        }
    }

    #[test]
    fn test_create_linux_defaults() {
        let p = pipeline("Linux", &[]);
        let backend = FakeBackend::new();

        let result = create(&p.req, &GitFetcher::new(), &backend, &BuildOptions::default()).unwrap();

        let expected: BTreeMap<String, String> = [
            ("SHARED", "OFF"),
            ("FPIC", "ON"),
            ("BUILD_EXAMPLES", "OFF"),
            ("BUILD_TESTING", "OFF"),
            ("BUILD_CXX", "ON"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        assert_eq!(result.build.config.merged(), expected);

        let artifacts = &result.package.report.artifacts;
        assert_eq!(artifacts.count(ArtifactKind::SharedObject), 0);
        assert!(artifacts.count(ArtifactKind::StaticArchive) >= 1);
        assert!(result.package.report.warnings.is_empty());

        let descriptor = &result.package.descriptor;
        assert_eq!(descriptor.libs, vec!["iceoryx2_ffi_c", "iceoryx2_cxx"]);
        assert!(descriptor
            .include_dirs
            .iter()
            .any(|d| d.ends_with("include/iceoryx2/v0.8.0")));

        assert_eq!(backend.calls(), vec!["configure", "build", "install"]);
        assert!(result.export.created);
    }

    #[test]
    fn test_create_linux_shared() {
        let p = pipeline("Linux", &["shared=True"]);
        let result = create(
            &p.req,
            &GitFetcher::new(),
            &FakeBackend::new(),
            &BuildOptions::default(),
        )
        .unwrap();

        let artifacts = &result.package.report.artifacts;
        assert_eq!(artifacts.count(ArtifactKind::StaticArchive), 0);
        assert_eq!(artifacts.count(ArtifactKind::SharedObject), 2);
        assert!(result.package.descriptor.shared);
    }

    #[test]
    fn test_create_windows_static() {
        let p = pipeline("Windows", &[]);
        let backend = FakeBackend::new().installing(&[
            "lib/iceoryx2_ffi_c.lib",
            "lib/iceoryx2_cxx.lib",
            "bin/iceoryx2_ffi_c.dll",
            "bin/iceoryx2_cxx.dll",
            "include/iceoryx2/v0.8.0/iox2/node.hpp",
        ]);

        let result = create(&p.req, &GitFetcher::new(), &backend, &BuildOptions::default()).unwrap();

        assert!(p.req.layout.build_root.ends_with("target/ff/cc/build/Release"));
        let artifacts = &result.package.report.artifacts;
        assert_eq!(artifacts.count(ArtifactKind::RuntimeLibrary), 0);
        assert_eq!(artifacts.count(ArtifactKind::StaticArchive), 2);
    }

    #[test]
    fn test_create_missing_linkage_warns() {
        let p = pipeline("Linux", &["shared=True"]);
        let backend = FakeBackend::new().installing(&[
            "lib/libiceoryx2_ffi_c.a",
            "include/iceoryx2/v0.8.0/iox2/node.hpp",
        ]);

        let result = create(&p.req, &GitFetcher::new(), &backend, &BuildOptions::default()).unwrap();
        assert_eq!(result.package.report.warnings.len(), 1);
        assert!(result.package.descriptor_path.exists());
    }

    #[test]
    fn test_create_is_repeatable() {
        let p = pipeline("Linux", &[]);
        let fetcher = GitFetcher::new();

        let first = create(&p.req, &fetcher, &FakeBackend::new(), &BuildOptions::default()).unwrap();
        let second = create(&p.req, &fetcher, &FakeBackend::new(), &BuildOptions::default()).unwrap();

        assert!(!second.export.created);
        assert!(!second.build.source.fetched);
        assert_eq!(first.package.descriptor, second.package.descriptor);
    }
}

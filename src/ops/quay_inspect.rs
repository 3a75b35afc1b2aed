//! Implementation of `quay inspect` and `quay info`.
//!
//! Both are dry: nothing is fetched and no toolchain is run.

use serde::Serialize;

use crate::builder::curate::{curation_action, CurationAction};
use crate::builder::ToolchainConfig;
use crate::core::{describe, ArtifactSet, BuildLayout, OptionSet, PackageDescriptor, Settings, SourcePin};
use crate::ops::quay_build::toolchain_config;
use crate::ops::request::BuildRequest;

/// Everything the pipeline would do for a request.
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub name: String,
    pub version: String,
    pub pin: SourcePin,
    pub options: OptionSet,
    pub settings: Settings,
    pub layout: BuildLayout,
    pub toolchain: ToolchainConfig,
    pub curation: CurationAction,
}

/// Compute the inspection for a request.
pub fn inspect(req: &BuildRequest) -> anyhow::Result<Inspection> {
    Ok(Inspection {
        name: req.name().to_string(),
        version: req.version.to_string(),
        pin: req.recipe.pin()?,
        options: req.options.clone(),
        settings: req.settings.clone(),
        layout: req.layout.clone(),
        toolchain: toolchain_config(req),
        curation: curation_action(req.platform(), req.shared()),
    })
}

/// The descriptor the request would produce.
///
/// Depends only on the recipe and options, so nothing on disk is read.
pub fn info(req: &BuildRequest) -> PackageDescriptor {
    describe(&ArtifactSet::default(), &req.recipe, &req.version, req.shared())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recipe::ICEORYX2_RECIPE;
    use crate::core::{OptionOverride, Recipe};
    use std::path::{Path, PathBuf};

    fn request(overrides: &[&str], os: &str) -> BuildRequest {
        let recipe = Recipe::parse(ICEORYX2_RECIPE, PathBuf::from("/r")).unwrap();
        let overrides: Vec<OptionOverride> = overrides.iter().map(|o| o.parse().unwrap()).collect();
        let mut settings = Settings::host();
        settings.os = os.to_string();
        BuildRequest::new(recipe, &overrides, settings, Path::new("/r/.quay")).unwrap()
    }

    #[test]
    fn test_inspect() {
        let inspection = inspect(&request(&["build_examples=True"], "Linux")).unwrap();
        assert_eq!(inspection.toolchain.variables["BUILD_EXAMPLES"], "ON");
        assert_eq!(inspection.pin.commit, "v0.8.0");
        assert!(matches!(inspection.curation, CurationAction::Delete { pattern: "*.so", .. }));

        let json = serde_json::to_value(&inspection).unwrap();
        assert_eq!(json["toolchain"]["cache_variables"]["BUILD_CXX"], "ON");
        assert_eq!(json["options"]["values"]["shared"], false);
    }

    #[test]
    fn test_info_is_dry() {
        let desc = info(&request(&[], "Macos"));
        assert_eq!(desc.libs, vec!["iceoryx2_ffi_c", "iceoryx2_cxx"]);
        assert_eq!(desc.include_dirs[1], "include/iceoryx2/v0.8.0");
    }

    #[test]
    fn test_info_ignores_package_root() {
        let tmp = tempfile::TempDir::new().unwrap();
        let recipe = Recipe::parse(ICEORYX2_RECIPE, tmp.path().to_path_buf()).unwrap();
        let req = BuildRequest::new(recipe, &[], Settings::host(), &tmp.path().join(".quay")).unwrap();

        // A file where the package directory should be
        std::fs::create_dir_all(&req.layout.work_dir).unwrap();
        std::fs::write(&req.layout.package_root, "not a directory").unwrap();

        assert_eq!(info(&req), info(&request(&[], &req.settings.os)));
    }
}

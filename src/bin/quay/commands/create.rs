//! `quay create` command

use anyhow::Result;

use super::Session;
use crate::cli::{BuildArgs, GlobalArgs};
use quay::ops::quay_build::BuildOptions;
use quay::ops::{create, BuildRequest, PackageResult};
use quay::sources::GitFetcher;
use quay::util::shell::Status;

pub fn execute(args: BuildArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let req = session.request(&args.request)?;
    let backend = session.backend(args.jobs)?;

    let opts = BuildOptions {
        fresh_source: args.fresh,
    };

    let spinner = session.shell.spinner(
        Status::Building,
        format!("{} v{} [{}]", req.name(), req.version, req.settings.build_type),
    );
    let result = create(&req, &GitFetcher::new(), &backend, &opts)?;
    spinner.finish();

    if result.export.created {
        session.shell.status(
            Status::Exported,
            format!("{}@{}", result.export.pin.url, result.export.pin.commit),
        );
    }
    report_package(&session, &req, &result.package);
    Ok(())
}

/// Status lines shared by `package` and `create`.
pub fn report_package(session: &Session, req: &BuildRequest, result: &PackageResult) {
    let report = &result.report;
    if !report.removed.is_empty() || !report.relocated.is_empty() {
        session.shell.status(
            Status::Curating,
            format!(
                "removed {}, relocated {}",
                report.removed.len(),
                report.relocated.len()
            ),
        );
    }
    for warning in &report.warnings {
        session.shell.warn(&warning.message);
    }

    session.shell.status(
        Status::Packaged,
        format!(
            "{} v{} ({}) -> {}",
            req.name(),
            req.version,
            if req.shared() { "shared" } else { "static" },
            req.layout.package_root.display()
        ),
    );
}

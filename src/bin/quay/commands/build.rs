//! `quay build` command

use anyhow::Result;

use super::Session;
use crate::cli::{BuildArgs, GlobalArgs};
use quay::ops::quay_build::{build, BuildOptions};
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
    let result = build(&req, &GitFetcher::new(), &backend, &opts)?;
    spinner.finish();

    session.shell.status(
        Status::Finished,
        format!("`{}` -> {}", req.name(), result.output.build_root.display()),
    );

    Ok(())
}

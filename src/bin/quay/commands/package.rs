//! `quay package` command

use anyhow::Result;

use super::Session;
use crate::cli::{GlobalArgs, PackageArgs};
use quay::ops::package;
use quay::util::shell::Status;

pub fn execute(args: PackageArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let req = session.request(&args.request)?;
    let backend = session.backend(None)?;

    let spinner = session
        .shell
        .spinner(Status::Installing, format!("{} v{}", req.name(), req.version));
    let result = package(&req, &backend, None)?;
    spinner.finish();

    super::create::report_package(&session, &req, &result);
    Ok(())
}

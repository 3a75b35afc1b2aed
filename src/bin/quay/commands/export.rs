//! `quay export` command

use anyhow::Result;

use super::Session;
use crate::cli::{ExportArgs, GlobalArgs, RequestArgs};
use quay::ops::export;
use quay::util::shell::Status;

pub fn execute(_args: ExportArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let req = session.request(&RequestArgs::default())?;

    let result = export(&session.recipe, &req.layout.sources_file())?;

    if result.created {
        session.shell.status(
            Status::Exported,
            format!(
                "{} v{} ({}@{})",
                req.name(),
                req.version,
                result.pin.url,
                result.pin.commit
            ),
        );
    } else {
        session.shell.note(format!(
            "{} v{} already exported at {}",
            req.name(),
            req.version,
            result.pin.commit
        ));
    }

    Ok(())
}

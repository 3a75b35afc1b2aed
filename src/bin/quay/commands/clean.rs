//! `quay clean` command

use anyhow::Result;

use super::Session;
use crate::cli::{CleanArgs, GlobalArgs};
use quay::ops::{clean, CleanScope};
use quay::util::shell::Status;

pub fn execute(args: CleanArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let req = session.request(&args.request)?;

    let scope = if args.all {
        CleanScope::All
    } else {
        CleanScope::Request
    };

    let removed = clean(&req, &session.work_root, scope)?;
    if removed.is_empty() {
        session.shell.note("nothing to clean");
    }
    for path in removed {
        session.shell.status(Status::Removed, path.display());
    }

    Ok(())
}

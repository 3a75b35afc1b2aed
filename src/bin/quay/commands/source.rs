//! `quay source` command

use anyhow::Result;

use super::Session;
use crate::cli::{GlobalArgs, SourceArgs};
use quay::ops::source;
use quay::sources::GitFetcher;
use quay::util::shell::Status;

pub fn execute(args: SourceArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let req = session.request(&args.request)?;

    let spinner = session
        .shell
        .spinner(Status::Fetching, format!("{} v{}", req.name(), req.version));
    let result = source(&req, &GitFetcher::new())?;
    spinner.finish();

    if result.patches_applied > 0 {
        session.shell.status(
            Status::Patching,
            format!("applied {} patch(es)", result.patches_applied),
        );
    }
    session.shell.status(
        Status::Finished,
        format!(
            "{} at {} -> {}",
            req.name(),
            &result.tree.commit_id[..12.min(result.tree.commit_id.len())],
            result.tree.root.display()
        ),
    );

    Ok(())
}

//! `quay info` command

use anyhow::Result;

use super::Session;
use crate::cli::{GlobalArgs, InfoArgs};
use quay::ops::info;

pub fn execute(args: InfoArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let req = session.request(&args.request)?;

    let descriptor = info(&req);
    println!("{}", serde_json::to_string_pretty(&descriptor)?);

    Ok(())
}

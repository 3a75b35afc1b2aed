//! `quay inspect` command

use anyhow::Result;

use super::Session;
use crate::cli::{GlobalArgs, InspectArgs};
use quay::builder::CurationAction;
use quay::ops::inspect;

pub fn execute(args: InspectArgs, global: &GlobalArgs) -> Result<()> {
    let session = Session::open(global)?;
    let req = session.request(&args.request)?;
    let inspection = inspect(&req)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&inspection)?);
        return Ok(());
    }

    println!("{} v{}", inspection.name, inspection.version);
    println!("source:    {}@{}", inspection.pin.url, inspection.pin.commit);
    println!("build key: {}", inspection.layout.build_key);
    println!(
        "settings:  os={} arch={} build_type={}",
        inspection.settings.os, inspection.settings.arch, inspection.settings.build_type
    );

    println!();
    println!("options:");
    for (name, value) in inspection.options.iter() {
        println!("  {} = {}", name, value);
    }

    println!();
    println!("toolchain:");
    for (name, value) in inspection.toolchain.merged() {
        println!("  {} = {}", name, value);
    }
    for (name, value) in &inspection.toolchain.builtins {
        println!("  {} = {} (builtin)", name, value);
    }
    if let Some(ref generator) = inspection.toolchain.generator {
        println!("  generator: {}", generator);
    }

    println!();
    println!("layout:");
    println!("  source:  {}", inspection.layout.source_root.display());
    println!("  build:   {}", inspection.layout.build_root.display());
    println!("  package: {}", inspection.layout.package_root.display());

    println!();
    match inspection.curation {
        CurationAction::Delete { dir, pattern } => {
            println!("curation: delete {}/{}", dir.as_str(), pattern)
        }
        CurationAction::Relocate { from, to, pattern } => println!(
            "curation: move {}/{} into {}/",
            from.as_str(),
            pattern,
            to.as_str()
        ),
        CurationAction::Keep => println!("curation: none"),
    }

    Ok(())
}

//! quay CLI - build pinned upstream C/C++ libraries into curated packages

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.global.verbose {
        EnvFilter::new("quay=debug")
    } else if cli.global.quiet {
        EnvFilter::new("quay=error")
    } else {
        EnvFilter::new("quay=info")
    };

    // stdout is reserved for command output (`inspect --json`, `info`)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let global = &cli.global;
    match cli.command {
        Commands::Export(args) => commands::export::execute(args, global),
        Commands::Source(args) => commands::source::execute(args, global),
        Commands::Build(args) => commands::build::execute(args, global),
        Commands::Package(args) => commands::package::execute(args, global),
        Commands::Create(args) => commands::create::execute(args, global),
        Commands::Inspect(args) => commands::inspect::execute(args, global),
        Commands::Info(args) => commands::info::execute(args, global),
        Commands::Clean(args) => commands::clean::execute(args, global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

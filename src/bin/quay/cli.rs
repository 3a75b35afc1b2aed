//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use quay::core::OptionOverride;
use quay::util::shell::ColorChoice;

/// quay - build pinned upstream C/C++ libraries into curated packages
#[derive(Parser)]
#[command(name = "quay")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Coloring: auto, always, never
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    pub color: ColorChoice,

    /// Path to Recipe.toml or its directory (default: search upward from cwd)
    #[arg(long, global = true, env = "QUAY_RECIPE", value_name = "PATH")]
    pub recipe: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record the recipe's source pin
    Export(ExportArgs),

    /// Fetch and patch the pinned source
    Source(SourceArgs),

    /// Fetch, configure and build
    Build(BuildArgs),

    /// Install, curate and describe a finished build
    Package(PackageArgs),

    /// Run every stage, from export to package
    Create(BuildArgs),

    /// Show the translated configuration without building
    Inspect(InspectArgs),

    /// Print the package descriptor
    Info(InfoArgs),

    /// Remove work directories
    Clean(CleanArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Options and settings selecting one build of the recipe.
#[derive(Args, Debug, Clone, Default)]
pub struct RequestArgs {
    /// Set a recipe option (repeatable), e.g. `-o shared=True`
    #[arg(short = 'o', long = "option", value_name = "NAME=VALUE")]
    pub options: Vec<OptionOverride>,

    /// Set a build setting (repeatable), e.g. `-s build_type=Debug`
    #[arg(short = 's', long = "setting", value_name = "NAME=VALUE")]
    pub settings: Vec<String>,
}

#[derive(Args)]
pub struct ExportArgs {}

#[derive(Args)]
pub struct SourceArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Number of parallel jobs
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Re-fetch the source even if it was already prepared
    #[arg(long)]
    pub fresh: bool,
}

#[derive(Args)]
pub struct PackageArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

#[derive(Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    #[command(flatten)]
    pub request: RequestArgs,
}

#[derive(Args)]
pub struct CleanArgs {
    #[command(flatten)]
    pub request: RequestArgs,

    /// Remove every work directory and recorded pin
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

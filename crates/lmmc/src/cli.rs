//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use lmmc_core::OutputFormat;
use lmmc_update::UpdateOptions;

/// lmmc - Lerian MCP Memory developer CLI
#[derive(Parser, Debug)]
#[command(name = "lmmc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format (table, json, plain)
    #[arg(short, long, global = true)]
    pub output: Option<OutputFormat>,

    /// Directory holding lmmc-runtime.yaml
    #[arg(long, global = true)]
    pub config_dir: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Update lmmc to the latest release
    Update(UpdateArgs),

    /// Show version information
    Version(VersionArgs),

    /// Generate shell completions
    Completion(CompletionArgs),
}

// Update command
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Update even if already on the latest version
    #[arg(short, long)]
    pub force: bool,

    /// Include prerelease versions
    #[arg(long)]
    pub prerelease: bool,

    /// Show what would be updated without installing
    #[arg(long)]
    pub dry_run: bool,
}

impl From<&UpdateArgs> for UpdateOptions {
    fn from(args: &UpdateArgs) -> Self {
        UpdateOptions {
            force: args.force,
            prerelease: args.prerelease,
            dry_run: args.dry_run,
        }
    }
}

// Version command
#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// Completion command
#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

//! lmmc CLI - developer task management
//!
//! This is the main entry point for the lmmc command-line interface.

mod cli;
mod commands;
mod format;
mod output;
mod version;

use anyhow::{Context, Result};
use clap::Parser;
use console::Term;
use lmmc_core::{HierarchicalConfigLoader, OutputFormat, RuntimeConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize rustls crypto provider (required for rustls 0.23+)
    // This must be done before any TLS operations
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();

    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        output::error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    if !config.display.color_enabled {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }

    let format = cli.output.unwrap_or(config.display.output_format);
    let interactive = format == OutputFormat::Table && !cli.quiet && Term::stdout().is_term();

    match cli.command {
        Commands::Update(args) => commands::update::run(args, &config, format, interactive).await,
        Commands::Version(args) => commands::version::run(args, format),
        Commands::Completion(args) => commands::completions::run(args),
    }
}

fn load_config(cli: &Cli) -> Result<RuntimeConfig> {
    let loader = match &cli.config_dir {
        Some(dir) => HierarchicalConfigLoader::with_dir(dir.clone()),
        None => HierarchicalConfigLoader::new().context("Failed to resolve config directory")?,
    };

    loader
        .load_runtime_config()
        .with_context(|| format!("Failed to load configuration from {}", loader.config_dir()))
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout stays clean for --output json
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

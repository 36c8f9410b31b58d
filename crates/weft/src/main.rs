//! weft CLI - plugin-driven static site build tool.
//!
//! Provides commands for:
//! - `rebuild`: (re)build the entire project
//! - `plugins`: show the discovered plugin registries

mod commands;
mod error;
mod output;
mod pipeline;
mod setup;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PluginsArgs, RebuildArgs};
use output::Output;

/// weft - static site build tool.
#[derive(Parser)]
#[command(name = "weft", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// (Re)build the entire project.
    Rebuild(RebuildArgs),
    /// Show the discovered plugin registries.
    Plugins(PluginsArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // Check if verbose flag is set for the rebuild command
    let verbose = matches!(&cli.command, Commands::Rebuild(args) if args.verbose);

    // Initialize tracing with appropriate log level
    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Rebuild(args) => args.execute(&output),
        Commands::Plugins(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

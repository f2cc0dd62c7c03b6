//! gmap CLI - markdown with embedded Google Maps.
//!
//! Provides commands for:
//! - `render`: Convert a markdown document to HTML, expanding `[map:...]`
//! - `embed`: Print the map fragment for a single location

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{EmbedArgs, RenderArgs};
use output::Output;

/// gmap - Google Maps embeds for markdown.
#[derive(Parser)]
#[command(name = "gmap", version, about)]
struct Cli {
    /// Enable verbose output (configuration sources and timing logs).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert markdown to HTML.
    Render(RenderArgs),
    /// Print the embed fragment for one location.
    Embed(EmbedArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&output),
        Commands::Embed(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

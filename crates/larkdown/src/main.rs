//! larkdown CLI - styled markdown preview.
//!
//! Provides commands for:
//! - `render`: Render markdown (or a table cell value) to styled HTML
//! - `templates`: List templates and code themes
//! - `export`: Export a document as a printable page or PDF

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ExportArgs, RenderArgs, TemplatesArgs};
use output::Output;

/// larkdown - styled markdown preview.
#[derive(Parser)]
#[command(name = "larkdown", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown to styled HTML.
    Render(RenderArgs),
    /// List available templates and code themes.
    Templates(TemplatesArgs),
    /// Export markdown as a standalone HTML page or PDF.
    Export(ExportArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Templates(args) => args.execute(),
        Commands::Export(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

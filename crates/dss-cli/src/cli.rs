//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use dss_core::ExportMode;

/// dss - Compare two DSS planning snapshots by entity and week
#[derive(Parser, Debug)]
#[command(name = "dss")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch both snapshots and write the comparison document
    Compare(CompareArgs),

    /// Print a comparison document as a table
    Show(ShowArgs),

    /// Export a comparison document as CSV
    Export(ExportArgs),

    /// Serve the comparison over HTTP with an on-demand refresh endpoint
    Serve(ServeArgs),
}

/// Arguments for the compare command
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Override the output document path
    #[arg(short, long)]
    pub output: Option<String>,

    /// Print the document to stdout instead of writing it
    #[arg(long)]
    pub stdout: bool,
}

/// Row and column selection shared by show and export
#[derive(Args, Debug, Clone, Default)]
pub struct SelectionArgs {
    /// Read this comparison document instead of the configured output
    #[arg(short, long)]
    pub input: Option<String>,

    /// Weeks to include (comma-separated, default: all)
    #[arg(short, long)]
    pub weeks: Option<String>,

    /// Case-insensitive search over station, region and planner
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only stations with a move beyond the significance threshold
    #[arg(long)]
    pub significant: bool,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Maximum number of rows to print
    #[arg(short, long)]
    pub limit: Option<usize>,
}

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    #[command(flatten)]
    pub selection: SelectionArgs,

    /// Output CSV path (default: stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Cell rendering
    #[arg(short, long, value_enum, default_value = "raw")]
    pub mode: ExportFormat,
}

/// CSV cell rendering
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Every value as a percentage
    Raw,
    /// Values within the threshold left blank, as on screen
    Display,
}

impl From<ExportFormat> for ExportMode {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Raw => ExportMode::Raw,
            ExportFormat::Display => ExportMode::Display,
        }
    }
}

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Skip the comparison run at startup and start with the existing document
    #[arg(long)]
    pub no_initial_run: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

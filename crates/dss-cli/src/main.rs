//! dss CLI - compare DSS planning snapshots by station and week

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::{compare, export, serve, show};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    match &cli.command {
        cli::Commands::Compare(args) => compare::execute(args, &cli.global).await,
        cli::Commands::Show(args) => show::execute(args, &cli.global).await,
        cli::Commands::Export(args) => export::execute(args, &cli.global).await,
        cli::Commands::Serve(args) => serve::execute(args, &cli.global).await,
    }
}

//! HEXREACH CLI - Command-line interface
//!
//! Commands:
//! - play: Play a game at the terminal
//! - replay: Replay a saved game record and report the result
//! - bench: Random playouts to measure engine throughput

mod bench;
mod play;
mod replay;
mod rules_args;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexreach")]
#[command(about = "HEXREACH hex connection game")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game at the terminal
    Play(play::PlayArgs),
    /// Replay a saved game record
    Replay(replay::ReplayArgs),
    /// Random playouts to measure engine throughput
    Bench(bench::BenchArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Play(args) => play::run(args),
        Commands::Replay(args) => replay::run(args),
        Commands::Bench(args) => bench::run(args),
    }
}

//! gpxsim CLI - Command-line interface
//!
//! Replays GPX track logs as a live position feed.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::run::{OutputFormat, RunArgs};

#[derive(Parser)]
#[command(name = "gpxsim")]
#[command(version = gpxsim::VERSION)]
#[command(about = "Replay GPX track logs as a timed position feed", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a track log, printing one position update per tick
    Run {
        /// GPX track log (defaults to [simulator] source in config.ini)
        source: Option<PathBuf>,

        /// Real-time milliseconds between updates
        #[arg(long)]
        tick_ms: Option<u64>,

        /// Simulated time per update as a multiple of the tick interval
        #[arg(long)]
        multiplier: Option<u32>,

        /// Output format for updates
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Stop after this many updates
        #[arg(long)]
        limit: Option<u64>,

        /// Config file to use instead of ~/.gpxsim/config.ini
        #[arg(long)]
        config: Option<PathBuf>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Summarize a track log without playing it
    Inspect {
        /// GPX track log
        source: PathBuf,
    },

    /// Create the config file with defaults if it does not exist
    Init {
        /// Config file to create instead of ~/.gpxsim/config.ini
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            source,
            tick_ms,
            multiplier,
            format,
            limit,
            config,
            debug,
        } => commands::run::run(RunArgs {
            source,
            tick_ms,
            multiplier,
            format,
            limit,
            config,
            debug,
        }),
        Commands::Inspect { source } => commands::inspect::run(&source),
        Commands::Init { config } => commands::init::run(config),
    };

    if let Err(e) = result {
        e.exit();
    }
}

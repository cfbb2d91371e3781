//! # FreePark Tools
//!
//! Command line inspection of FreePark data files:
//! - list the blocks of a resource file
//! - show the missions and scenarios of a resource file
//! - describe a savegame
//! - write a new default savegame

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Blocks, Missions, NewSave, Savegame};
use freepark_common::{StorageConfig, CONFIG_FILE};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Inspect FreePark resource files and savegames
#[derive(Parser)]
#[command(name = "freepark")]
#[command(about = "Inspect FreePark resource files and savegames", long_about = None)]
#[command(version)]
struct Cli {
    /// Storage configuration file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Log decoding steps
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List the blocks of a resource file
    Blocks(Blocks),

    /// Show the missions of a resource file
    Missions(Missions),

    /// Describe a savegame
    Savegame(Savegame),

    /// Write a savegame for a new default game
    NewSave(NewSave),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "freepark=trace" } else { "freepark=info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    let config_path = cli.config.unwrap_or_else(|| PathBuf::from(CONFIG_FILE));
    let config = StorageConfig::load_from(&config_path);
    debug!("Using storage configuration {}", config_path.display());

    match cli.command {
        Command::Blocks(cmd) => cmd.execute(&config),
        Command::Missions(cmd) => cmd.execute(&config),
        Command::Savegame(cmd) => cmd.execute(&config),
        Command::NewSave(cmd) => cmd.execute(&config),
    }
}

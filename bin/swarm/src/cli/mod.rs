pub mod simulate;

use clap::{Parser, Subcommand};

use crate::cli::simulate::SimulateConfig;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run a local swarm of agents in memory
    #[command(name = "simulate")]
    Simulate(Box<SimulateConfig>),
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Commands::Simulate(config) => config.verbosity,
        }
    }
}

/// Log filter directive for a `--verbosity` level.
pub fn verbosity_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "error",
        1 => "warn",
        2 => "info",
        3 => "debug",
        _ => "trace",
    }
}

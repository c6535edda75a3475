//! CLI argument definitions using clap.
//!
//! Commands:
//! - ordos init [--config <path>]
//! - ordos run [--config <path>]
//! - ordos serve [--config <path>]
//! - ordos status [--config <path>]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// ordos - evidence-gated governance of operational actions
#[derive(Parser, Debug)]
#[command(name = "ordos")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the library directory layout
    Init {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run processor, runner and status API until SIGINT/SIGTERM
    Run {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Serve the read-only status API only
    Serve {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the last execution result
    Status {
        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

//! Command-line interface.
//!
//! - init: create the library layout
//! - run: processor + runner + status API until SIGINT/SIGTERM
//! - serve: status API only
//! - status: print the last execution result

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run_command, serve, status};
pub use errors::{CliError, CliResult};

/// Parse arguments and dispatch. The single entry point used by `main`.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}

//! CLI command implementations.
//!
//! `run` wires the three loops together: the order processor and the
//! decision runner each get an OS thread (they are synchronous, filesystem
//! driven), while the status API runs on a tokio runtime on the main
//! thread. One shared stop flag, raised by SIGINT/SIGTERM, winds all three
//! down between ticks.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::{FileStatusProvider, StatusProvider, StatusServer};
use crate::authority::{AuthorityLevel, CapabilitySet};
use crate::config::Config;
use crate::engine::EvidenceFallback;
use crate::ledger::FileLedger;
use crate::observability::{Logger, Severity};
use crate::queue::{ExecutorConfig, ExecutorRuntime, OrderProcessor};
use crate::runner::{NullCycleSource, RunnerLoop};

use super::args::{Cli, Command};
use super::errors::CliResult;

/// Dispatch one parsed CLI invocation.
pub fn run_command(cli: Cli) -> CliResult<()> {
    match cli.command {
        Command::Init { config } => init(config.as_deref()),
        Command::Run { config } => run(config.as_deref()),
        Command::Serve { config } => serve(config.as_deref()),
        Command::Status { config } => status(config.as_deref()),
    }
}

/// Create the library layout and the ledger file.
pub fn init(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let layout = config.layout();
    layout.ensure()?;
    FileLedger::open(layout.ledger_file())?;
    Logger::log(
        Severity::Info,
        "init.complete",
        &[("lib_dir", &config.lib_dir.display().to_string())],
    );
    Ok(())
}

/// Run processor, runner and API until a shutdown signal.
pub fn run(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let layout = config.layout();
    layout.ensure()?;

    let stop = Arc::new(AtomicBool::new(false));
    let ledger = Arc::new(FileLedger::open(layout.ledger_file())?);

    let processor = OrderProcessor::new(
        layout.clone(),
        Box::new(ExecutorRuntime::new(ExecutorConfig {
            dry_run: config.dry_run,
            acte_parent: config.acte_parent.clone(),
        })),
        config.processor_interval(),
    );
    let processor_stop = Arc::clone(&stop);
    let processor_handle = std::thread::spawn(move || processor.run(&processor_stop));

    let runner = RunnerLoop::new(
        layout.clone(),
        ledger,
        Box::new(NullCycleSource),
        Box::new(CapabilitySet::granting([AuthorityLevel::Operational])),
        AuthorityLevel::Operational,
        EvidenceFallback::Silence,
        config.runner_interval(),
    );
    let runner_stop = Arc::clone(&stop);
    let runner_handle = std::thread::spawn(move || runner.run(&runner_stop));

    let provider: Arc<dyn StatusProvider> = Arc::new(FileStatusProvider::new(layout));
    let server = StatusServer::new(config.api.clone(), provider);

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(server.serve_with_shutdown(shutdown_signal(Arc::clone(&stop))));

    // The server only returns once shutdown was requested; make sure the
    // loops see the flag even if it exited on an error.
    stop.store(true, Ordering::SeqCst);
    join_loop(processor_handle, "processor");
    join_loop(runner_handle, "runner");

    result?;
    Ok(())
}

/// Serve the status API only.
pub fn serve(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let provider: Arc<dyn StatusProvider> = Arc::new(FileStatusProvider::new(config.layout()));
    let server = StatusServer::new(config.api.clone(), provider);
    let stop = Arc::new(AtomicBool::new(false));

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve_with_shutdown(shutdown_signal(stop)))?;
    Ok(())
}

/// Print the last execution result to stdout.
pub fn status(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::load(config_path)?;
    let provider = FileStatusProvider::new(config.layout());
    let result = provider.get_deployer_last();
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Resolve on SIGINT or SIGTERM and raise the shared stop flag.
async fn shutdown_signal(stop: Arc<AtomicBool>) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }

    stop.store(true, Ordering::SeqCst);
    Logger::log(Severity::Info, "shutdown.requested", &[]);
}

fn join_loop<E: std::fmt::Display>(
    handle: std::thread::JoinHandle<Result<(), E>>,
    name: &str,
) {
    match handle.join() {
        Ok(Ok(())) => {}
        Ok(Err(error)) => Logger::log_stderr(
            Severity::Error,
            "loop.failed",
            &[("loop", name), ("error", &error.to_string())],
        ),
        Err(_) => Logger::log_stderr(Severity::Error, "loop.panicked", &[("loop", name)]),
    }
}

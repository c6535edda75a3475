//! CLI error types. All of them are fatal for the invoked command.

use thiserror::Error;

use crate::config::ConfigError;
use crate::queue::QueueError;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("queue error: {0}")]
    Queue(#[from] QueueError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! File-based order queue: at-most-once consumption of emitted Orders.
//!
//! Per order file the state machine is `inbox -> consumed` (applied) or
//! `inbox -> rejected` (validation failure, execution failure, or a
//! re-consumption attempt). The atomic rename out of the inbox is the sole
//! synchronization primitive and doubles as the commit point; no locks.

mod apply;
mod contract;
mod layout;
mod order_file;
mod processor;
mod result;

pub use apply::{ApplyResult, DeployOutcome, ExecutorConfig, ExecutorRuntime, OrderExecutor};
pub use contract::validate_order_contract;
pub use layout::{atomic_write_json, QueueLayout};
pub use order_file::{parse_order_file, ParsedOrder};
pub use processor::OrderProcessor;
pub use result::{
    failure, from_apply, map_outcome, rejection, unknown_result, ExecutionResult, ExecutionStatus,
};

use thiserror::Error;

/// Result type for queue operations.
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors raised by the queue processor itself.
///
/// Malformed or contract-violating orders are NOT errors: they resolve to
/// rejected files with named reason codes. Only infrastructure failures
/// (filesystem, serialization of our own records) surface here.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("queue I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("queue serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

//! Execution results persisted for external readers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Fact, Order, Trace};
use crate::state::DeployState;

use super::apply::{ApplyResult, DeployOutcome};

/// Raw, observable status of one execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExecutionStatus {
    Applied,
    Failed,
    Unknown,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "APPLIED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// Raw result of one processed order, without interpretation.
///
/// This record is what `last_execution.json` contains; its serde form is
/// the external schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub deploy_state: DeployState,
    pub order: Order,
    pub facts: Vec<Fact>,
    pub traces: Vec<Trace>,
    pub raw_result: Option<String>,
    pub raw_error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Map an application outcome to (execution status, deploy state).
pub fn map_outcome(outcome: DeployOutcome) -> (ExecutionStatus, DeployState) {
    match outcome {
        DeployOutcome::Applied => (ExecutionStatus::Applied, DeployState::Applied),
        DeployOutcome::Failed => (ExecutionStatus::Failed, DeployState::Failed),
        DeployOutcome::Rejected => (ExecutionStatus::Unknown, DeployState::Rejected),
    }
}

fn defaulted_created_at_marks(
    order_id: &str,
    finished_at: DateTime<Utc>,
) -> (Fact, Trace) {
    (
        Fact::new(
            "order.created_at.defaulted",
            [("order_id", order_id), ("defaulted", "true")],
        ),
        Trace::new(
            finished_at,
            "deployer",
            [
                ("order_id", order_id),
                ("order.created_at.defaulted", "true"),
            ],
        ),
    )
}

/// Build the persisted result from a completed application attempt.
pub fn from_apply(
    result: &ApplyResult,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    defaulted_created_at: bool,
) -> ExecutionResult {
    let (status, deploy_state) = map_outcome(result.outcome);
    let mut facts = result.facts.clone();
    let mut traces = result.traces.clone();
    if defaulted_created_at {
        let (fact, trace) = defaulted_created_at_marks(&result.order.identifier, finished_at);
        facts.push(fact);
        traces.push(trace);
    }
    ExecutionResult {
        status,
        deploy_state,
        order: result.order.clone(),
        facts,
        traces,
        raw_result: Some(format!("Order {}", result.outcome.as_str())),
        raw_error: if result.errors.is_empty() {
            None
        } else {
            Some("validation_failed".to_string())
        },
        started_at,
        finished_at,
    }
}

/// Build the persisted result for an order rejected before application
/// (parse-level failure).
pub fn rejection(
    order: &Order,
    errors: &[String],
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    defaulted_created_at: bool,
) -> ExecutionResult {
    let order = order.mark_consumed(finished_at);
    let mut facts = vec![Fact::new(
        "order.validation.failed",
        [
            ("order_id", order.identifier.clone()),
            ("errors", errors.join(",")),
        ],
    )];
    let mut traces = vec![Trace::new(
        finished_at,
        "deployer",
        [
            ("event", "validation_failed".to_string()),
            ("order_id", order.identifier.clone()),
            ("errors", errors.join(",")),
        ],
    )];
    if defaulted_created_at {
        let (fact, trace) = defaulted_created_at_marks(&order.identifier, finished_at);
        facts.push(fact);
        traces.push(trace);
    }
    ExecutionResult {
        status: ExecutionStatus::Unknown,
        deploy_state: DeployState::Rejected,
        order,
        facts,
        traces,
        raw_result: Some("Order REJECTED".to_string()),
        raw_error: Some("validation_failed".to_string()),
        started_at,
        finished_at,
    }
}

/// Build the persisted result for an unexpected execution fault.
///
/// The order's `consumed_at` defaults to completion time if unset: a
/// faulted attempt is still a terminal attempt.
pub fn failure(
    order: &Order,
    error: &str,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
    defaulted_created_at: bool,
) -> ExecutionResult {
    let order = order.mark_consumed(finished_at);
    let mut traces = vec![Trace::new(
        finished_at,
        "deployer",
        [
            ("event", "apply_failed".to_string()),
            ("order_id", order.identifier.clone()),
            ("scope", order.scope.clone()),
            ("error", error.to_string()),
        ],
    )];
    let mut facts = vec![Fact::new(
        "deployer.execution.status",
        [
            ("order_id", order.identifier.clone()),
            ("status", ExecutionStatus::Failed.as_str().to_string()),
            ("deploy_state", DeployState::Failed.as_str().to_string()),
        ],
    )];
    if defaulted_created_at {
        let (fact, trace) = defaulted_created_at_marks(&order.identifier, finished_at);
        facts.push(fact);
        traces.push(trace);
    }
    ExecutionResult {
        status: ExecutionStatus::Failed,
        deploy_state: DeployState::Failed,
        order,
        facts,
        traces,
        raw_result: None,
        raw_error: Some(error.to_string()),
        started_at,
        finished_at,
    }
}

/// Placeholder result for readers before any order has been processed.
pub fn unknown_result(now: DateTime<Utc>) -> ExecutionResult {
    ExecutionResult {
        status: ExecutionStatus::Unknown,
        deploy_state: DeployState::Unknown,
        order: Order {
            identifier: "unknown".to_string(),
            scope: "unknown".to_string(),
            created_at: now,
            acte_parent: crate::model::ROOT_ACT.to_string(),
            consumed_at: None,
            metadata: Default::default(),
        },
        facts: vec![],
        traces: vec![],
        raw_result: None,
        raw_error: None,
        started_at: now,
        finished_at: now,
    }
}

//! Order application: the at-most-once consumption point.
//!
//! "Applying" an order is a pure, observable state transition: no process
//! is spawned and no network call is made. Real execution is an external
//! concern behind the `OrderExecutor` trait.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::model::{Fact, Order, Trace};

use super::contract::validate_order_contract;

/// Outcome of one application attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeployOutcome {
    Applied,
    Rejected,
    Failed,
}

impl DeployOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "APPLIED",
            Self::Rejected => "REJECTED",
            Self::Failed => "FAILED",
        }
    }
}

/// Observable result of applying one order.
#[derive(Debug, Clone)]
pub struct ApplyResult {
    pub outcome: DeployOutcome,
    pub order: Order,
    pub facts: Vec<Fact>,
    pub traces: Vec<Trace>,
    pub errors: Vec<String>,
}

/// Executor seam. The shipped implementation is a pure state transition;
/// anything that actually touches the system lives behind this trait.
pub trait OrderExecutor: Send + Sync {
    fn apply(&self, order: &Order) -> ApplyResult;
}

/// Executor configuration.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    pub dry_run: bool,
    pub acte_parent: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            dry_run: true,
            acte_parent: crate::model::ROOT_ACT.to_string(),
        }
    }
}

/// The standard executor: validates the contract and consumes the order,
/// exactly once, without side effects.
#[derive(Debug, Clone, Default)]
pub struct ExecutorRuntime {
    config: ExecutorConfig,
}

impl ExecutorRuntime {
    pub fn new(config: ExecutorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }
}

impl OrderExecutor for ExecutorRuntime {
    fn apply(&self, order: &Order) -> ApplyResult {
        let timestamp = Utc::now();

        let (outcome, errors, consumed_order) = if order.is_consumed() {
            // Terminal: the original consumed_at is preserved untouched.
            (
                DeployOutcome::Rejected,
                vec!["order_already_consumed".to_string()],
                order.clone(),
            )
        } else {
            let errors = validate_order_contract(order);
            let outcome = if errors.is_empty() {
                DeployOutcome::Applied
            } else {
                DeployOutcome::Rejected
            };
            // The attempt consumes the order terminally, applied or not.
            (outcome, errors, order.mark_consumed(timestamp))
        };

        let facts = vec![
            Fact::new(
                "deploy.attempted",
                [
                    ("acte_parent", self.config.acte_parent.clone()),
                    ("order_id", order.identifier.clone()),
                    ("scope", order.scope.clone()),
                    ("dry_run", self.config.dry_run.to_string()),
                ],
            ),
            Fact::new(
                "deploy.outcome",
                [
                    ("order_id", order.identifier.clone()),
                    ("outcome", outcome.as_str().to_string()),
                ],
            ),
        ];

        let mut trace_metadata = vec![
            ("acte_parent", self.config.acte_parent.clone()),
            ("event", "apply".to_string()),
            ("order_id", order.identifier.clone()),
            ("outcome", outcome.as_str().to_string()),
            ("dry_run", self.config.dry_run.to_string()),
        ];
        if !errors.is_empty() {
            trace_metadata.push(("errors", errors.join(",")));
        }
        let traces = vec![Trace::new(timestamp, "deployer", trace_metadata)];

        ApplyResult {
            outcome,
            order: consumed_order,
            facts,
            traces,
            errors,
        }
    }
}

//! Wiring between an emitted Order and its consumption.
//!
//! One wiring step takes the expression side's output (at most one Order)
//! and drives it through an executor, translating the outcome back into a
//! terminal expression plus a ready-to-append ledger entry. The step never
//! invents authority: with no order in hand it expresses Silence, and an
//! already-consumed order is refused before the executor is ever called.

use chrono::{DateTime, Utc};

use crate::ledger::LedgerEntry;
use crate::model::{
    emit_refusal, emit_silence, AuthorityExpression, Decision, Fact, Trace,
};
use crate::model::Order;
use crate::queue::{ApplyResult, DeployOutcome, OrderExecutor};

/// Outcome of one wiring step.
#[derive(Debug, Clone)]
pub struct WiringResult {
    pub expression: AuthorityExpression,
    pub apply_result: Option<ApplyResult>,
    pub ledger_entry: LedgerEntry,
}

/// Drive one order (or its absence) through the executor.
pub fn wire_step(
    order: Option<&Order>,
    executor: &dyn OrderExecutor,
    acte_parent: &str,
    now: DateTime<Utc>,
) -> WiringResult {
    match order {
        None => {
            let silence = emit_silence("no_order", Default::default(), acte_parent);
            let expression = AuthorityExpression::Silence(silence);
            let traces = vec![link_trace(now, "link.silence", "no_order")];
            WiringResult {
                ledger_entry: entry(acte_parent, now, &expression, vec![], traces),
                expression,
                apply_result: None,
            }
        }
        Some(order) if order.is_consumed() => {
            // Refused up front; the executor never sees a spent order here.
            let refusal = emit_refusal(
                "order_already_consumed",
                [("order_id".to_string(), order.identifier.clone())].into(),
                acte_parent,
            );
            let expression = AuthorityExpression::Refusal(refusal);
            let traces = vec![link_trace(now, "link.refusal", "order_already_consumed")];
            WiringResult {
                ledger_entry: entry(acte_parent, now, &expression, vec![], traces),
                expression,
                apply_result: None,
            }
        }
        Some(order) => {
            let result = executor.apply(order);
            let expression = match result.outcome {
                DeployOutcome::Applied => AuthorityExpression::Order(result.order.clone()),
                outcome => {
                    let mut reason = format!("deployer_{}", outcome.as_str().to_lowercase());
                    if !result.errors.is_empty() {
                        reason.push(':');
                        reason.push_str(&result.errors.join(","));
                    }
                    AuthorityExpression::Refusal(emit_refusal(
                        reason,
                        [("order_id".to_string(), order.identifier.clone())].into(),
                        acte_parent,
                    ))
                }
            };
            let event = match expression {
                AuthorityExpression::Order(_) => "link.applied",
                _ => "link.refusal",
            };
            let mut traces = result.traces.clone();
            traces.push(link_trace(now, event, result.outcome.as_str()));
            WiringResult {
                ledger_entry: entry(acte_parent, now, &expression, result.facts.clone(), traces),
                expression,
                apply_result: Some(result),
            }
        }
    }
}

fn link_trace(now: DateTime<Utc>, event: &str, detail: &str) -> Trace {
    Trace::new(
        now,
        "link",
        [("event", event.to_string()), ("detail", detail.to_string())],
    )
}

fn entry(
    acte_parent: &str,
    now: DateTime<Utc>,
    expression: &AuthorityExpression,
    facts: Vec<Fact>,
    traces: Vec<Trace>,
) -> LedgerEntry {
    LedgerEntry {
        acte_parent: acte_parent.to_string(),
        created_at: now,
        facts: facts.clone(),
        evidence: vec![],
        decision: Decision::new(
            format!("expression={}", expression.kind_name()),
            facts,
        ),
        traces,
        expression: Some(expression.clone()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::model::emit_order;
    use crate::queue::ExecutorRuntime;

    use super::*;

    fn valid_order() -> Order {
        emit_order(
            "order-1",
            "local",
            [
                ("action".to_string(), "deploy.up".to_string()),
                ("target".to_string(), "app-1".to_string()),
                ("release_ref".to_string(), "v1.0.0".to_string()),
            ]
            .into(),
            "ACTE_IV",
        )
    }

    #[test]
    fn test_no_order_expresses_silence() {
        let executor = ExecutorRuntime::default();
        let result = wire_step(None, &executor, "ACTE_IV", Utc::now());
        match &result.expression {
            AuthorityExpression::Silence(silence) => assert_eq!(silence.reason, "no_order"),
            other => panic!("expected silence, got {:?}", other),
        }
        assert!(result.apply_result.is_none());
        assert_eq!(result.ledger_entry.decision.summary, "expression=silence");
    }

    #[test]
    fn test_consumed_order_is_refused_without_applying() {
        let executor = ExecutorRuntime::default();
        let order = valid_order().mark_consumed(Utc::now());
        let result = wire_step(Some(&order), &executor, "ACTE_IV", Utc::now());
        match &result.expression {
            AuthorityExpression::Refusal(refusal) => {
                assert_eq!(refusal.reason, "order_already_consumed")
            }
            other => panic!("expected refusal, got {:?}", other),
        }
        assert!(result.apply_result.is_none());
    }

    #[test]
    fn test_applied_order_echoes_consumed_order() {
        let executor = ExecutorRuntime::default();
        let result = wire_step(Some(&valid_order()), &executor, "ACTE_IV", Utc::now());
        match &result.expression {
            AuthorityExpression::Order(order) => assert!(order.is_consumed()),
            other => panic!("expected order, got {:?}", other),
        }
        let apply = result.apply_result.unwrap();
        assert_eq!(apply.outcome, DeployOutcome::Applied);
    }

    #[test]
    fn test_rejected_order_yields_reasoned_refusal() {
        let executor = ExecutorRuntime::default();
        let order = emit_order("order-2", "local", BTreeMap::new(), "ACTE_IV");
        let result = wire_step(Some(&order), &executor, "ACTE_IV", Utc::now());
        match &result.expression {
            AuthorityExpression::Refusal(refusal) => {
                assert!(refusal.reason.starts_with("deployer_rejected:"));
                assert!(refusal.reason.contains("missing_payload_action"));
            }
            other => panic!("expected refusal, got {:?}", other),
        }
    }
}

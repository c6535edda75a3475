//! The decision cycle: three signals in, one terminal expression out.
//!
//! `build_cycle` is pure. It reads fresh, read-only inputs, accumulates
//! every applicable reason, and only then resolves the expression kind.
//! The precedence order is fixed:
//!
//! 1. default kind is Silence;
//! 2. authority denial appends OUT_OF_AUTHORITY, sets Refusal;
//! 3. insufficient evidence appends INSUFFICIENT_PRIMARY_EVIDENCE, sets the
//!    caller-configured fallback;
//! 4. an illegal transition appends CRITICAL_DIVERGENCE and forces Refusal;
//!    a legal one appends TRANSITION_ALLOWED without overriding;
//! 5. a clean cycle appends OBSERVED;
//! 6. final override: OUT_OF_AUTHORITY or CRITICAL_DIVERGENCE anywhere in
//!    the collected reasons forces Refusal, whatever earlier steps chose.
//!
//! Step 6 is what guarantees that authority and coherence violations can
//! never be silently downgraded to an Order or a plain Silence.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::authority::{AuthorityCheck, AuthorityLevel};
use crate::model::{
    AuthorityExpression, Decision, DecisionReason, EvidenceSet, Fact, Order, Refusal, Silence,
    Trace, ROOT_ACT,
};
use crate::runtime::RuntimeContext;
use crate::state::{engine_transition_allowed, EngineState};

use super::evidence::evidence_insufficient;
use super::reports::{EvidenceFallback, ExpressionKind, HealthReport, PreflightReport};

/// Read-only input for one decision cycle.
pub struct CycleInput<'a> {
    pub facts: Vec<Fact>,
    pub evidence: Vec<EvidenceSet>,
    pub context: RuntimeContext,
    pub preflight_reports: Vec<PreflightReport>,
    pub health_reports: Vec<HealthReport>,
    pub authority: &'a dyn AuthorityCheck,
    pub authority_level: AuthorityLevel,
    pub engine_transition: Option<(EngineState, EngineState)>,
    pub insufficient_evidence_fallback: EvidenceFallback,
    pub order_identifier: String,
    pub order_scope: String,
}

/// Read-only report for one completed decision cycle.
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub context: RuntimeContext,
    pub decision: CycleDecision,
    pub expression: AuthorityExpression,
    pub traces: Vec<Trace>,
    pub preflight_reports: Vec<PreflightReport>,
    pub health_reports: Vec<HealthReport>,
    pub created_at: DateTime<Utc>,
    pub acte_parent: String,
}

/// Explainable decision of a cycle: summary plus the closed reason list.
#[derive(Debug, Clone, Serialize)]
pub struct CycleDecision {
    pub summary: String,
    pub reasons: Vec<DecisionReason>,
    pub acte_parent: String,
}

impl CycleDecision {
    /// Flatten into the generic ledger decision record.
    pub fn to_decision(&self, facts: Vec<Fact>) -> Decision {
        Decision::new(self.summary.clone(), facts)
    }
}

/// Produce a complete report for one cycle, without side effects.
pub fn build_cycle(input: CycleInput<'_>, created_at: DateTime<Utc>) -> CycleReport {
    let mut reasons: Vec<DecisionReason> = Vec::new();
    let mut kind = ExpressionKind::Silence;

    if !input.authority.has_authority(input.authority_level) {
        reasons.push(DecisionReason::OutOfAuthority);
        kind = ExpressionKind::Refusal;
    }

    if evidence_insufficient(&input.evidence, &input.preflight_reports) {
        reasons.push(DecisionReason::InsufficientPrimaryEvidence);
        kind = input.insufficient_evidence_fallback.kind();
    }

    if let Some((from, to)) = input.engine_transition {
        if engine_transition_allowed(from, to).is_none() {
            reasons.push(DecisionReason::CriticalDivergence);
            kind = ExpressionKind::Refusal;
        } else {
            reasons.push(DecisionReason::TransitionAllowed);
        }
    }

    if reasons.is_empty() {
        reasons.push(DecisionReason::Observed);
    }

    // Final override: a recorded violation always wins.
    if reasons.contains(&DecisionReason::OutOfAuthority)
        || reasons.contains(&DecisionReason::CriticalDivergence)
    {
        kind = ExpressionKind::Refusal;
    }

    let expression = build_expression(&input, kind, created_at, &reasons);

    let decision = CycleDecision {
        summary: format!("expression={}", kind.as_str()),
        reasons: reasons.clone(),
        acte_parent: ROOT_ACT.to_string(),
    };

    let mut traces = input.context.traces.clone();
    traces.push(Trace::new(
        created_at,
        "runner",
        [
            ("acte_parent", ROOT_ACT.to_string()),
            ("expression", kind.as_str().to_string()),
            ("reasons", DecisionReason::join(&reasons)),
        ],
    ));

    CycleReport {
        context: input.context,
        decision,
        expression,
        traces,
        preflight_reports: input.preflight_reports,
        health_reports: input.health_reports,
        created_at,
        acte_parent: ROOT_ACT.to_string(),
    }
}

fn build_expression(
    input: &CycleInput<'_>,
    kind: ExpressionKind,
    created_at: DateTime<Utc>,
    reasons: &[DecisionReason],
) -> AuthorityExpression {
    let reason_text = DecisionReason::join(reasons);
    match kind {
        ExpressionKind::Order => AuthorityExpression::Order(Order {
            identifier: input.order_identifier.clone(),
            scope: input.order_scope.clone(),
            created_at,
            acte_parent: ROOT_ACT.to_string(),
            consumed_at: None,
            metadata: [("reason".to_string(), reason_text)].into(),
        }),
        ExpressionKind::Refusal => AuthorityExpression::Refusal(Refusal {
            reason: reason_text.clone(),
            created_at,
            acte_parent: ROOT_ACT.to_string(),
            metadata: [("reason".to_string(), reason_text)].into(),
        }),
        ExpressionKind::Silence => AuthorityExpression::Silence(Silence {
            reason: reason_text.clone(),
            created_at,
            acte_parent: ROOT_ACT.to_string(),
            metadata: [("reason".to_string(), reason_text)].into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use crate::authority::CapabilitySet;
    use crate::model::EvidencePrimary;
    use crate::runtime::RuntimeContext;

    use super::*;

    fn input_with<'a>(gate: &'a CapabilitySet) -> CycleInput<'a> {
        CycleInput {
            facts: vec![],
            evidence: vec![EvidenceSet::new(EvidencePrimary::new("probe ok"), vec![])],
            context: RuntimeContext::initial(Utc::now()),
            preflight_reports: vec![],
            health_reports: vec![],
            authority: gate,
            authority_level: AuthorityLevel::Operational,
            engine_transition: None,
            insufficient_evidence_fallback: EvidenceFallback::Silence,
            order_identifier: "order-1".to_string(),
            order_scope: "local".to_string(),
        }
    }

    #[test]
    fn test_clean_cycle_is_observed_silence() {
        let gate = CapabilitySet::granting([AuthorityLevel::Operational]);
        let report = build_cycle(input_with(&gate), Utc::now());
        assert_eq!(report.decision.reasons, vec![DecisionReason::Observed]);
        assert!(matches!(
            report.expression,
            AuthorityExpression::Silence(_)
        ));
    }

    #[test]
    fn test_cycle_appends_runner_trace() {
        let gate = CapabilitySet::granting([AuthorityLevel::Operational]);
        let report = build_cycle(input_with(&gate), Utc::now());
        let last = report.traces.last().unwrap();
        assert_eq!(last.actor, "runner");
        assert_eq!(last.metadata.get("expression").unwrap(), "silence");
        assert_eq!(last.metadata.get("reasons").unwrap(), "observed");
    }
}

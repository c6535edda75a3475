//! Decision engine precedence invariants.
//!
//! The override rules are enumerated exhaustively: for every combination of
//! authority, evidence and transition signals, a recorded violation must
//! resolve to Refusal, the evidence fallback must be honored exactly, and a
//! clean cycle must stay an observed Silence.

use chrono::Utc;

use ordos::authority::{AuthorityLevel, CapabilitySet};
use ordos::engine::{
    build_cycle, CycleInput, EvidenceFallback, PreflightReport, PreflightStatus,
};
use ordos::model::{
    AuthorityExpression, DecisionReason, EvidencePrimary, EvidenceSet,
};
use ordos::runtime::RuntimeContext;
use ordos::state::EngineState;

#[derive(Debug, Clone, Copy, PartialEq)]
enum TransitionCase {
    Absent,
    Legal,
    Illegal,
}

impl TransitionCase {
    fn pair(self) -> Option<(EngineState, EngineState)> {
        match self {
            Self::Absent => None,
            Self::Legal => Some((EngineState::Unknown, EngineState::Up)),
            Self::Illegal => Some((EngineState::Failed, EngineState::Up)),
        }
    }
}

fn run_cycle(
    gate: &CapabilitySet,
    evidence_sufficient: bool,
    transition: TransitionCase,
    fallback: EvidenceFallback,
) -> ordos::engine::CycleReport {
    let evidence = if evidence_sufficient {
        vec![EvidenceSet::new(EvidencePrimary::new("probe ok"), vec![])]
    } else {
        vec![]
    };
    let input = CycleInput {
        facts: vec![],
        evidence,
        context: RuntimeContext::initial(Utc::now()),
        preflight_reports: vec![],
        health_reports: vec![],
        authority: gate,
        authority_level: AuthorityLevel::Operational,
        engine_transition: transition.pair(),
        insufficient_evidence_fallback: fallback,
        order_identifier: "order-test".to_string(),
        order_scope: "local".to_string(),
    };
    build_cycle(input, Utc::now())
}

// =============================================================================
// Override precedence, all combinations
// =============================================================================

/// For every signal combination: a violation forces Refusal; otherwise the
/// evidence fallback decides; otherwise Silence. The engine never emits an
/// Order on its own.
#[test]
fn test_override_precedence_for_all_signal_combinations() {
    let granting = CapabilitySet::granting([AuthorityLevel::Operational]);
    let denying = CapabilitySet::new();

    for authority_granted in [true, false] {
        for evidence_sufficient in [true, false] {
            for transition in [
                TransitionCase::Absent,
                TransitionCase::Legal,
                TransitionCase::Illegal,
            ] {
                for fallback in [EvidenceFallback::Refusal, EvidenceFallback::Silence] {
                    let gate = if authority_granted { &granting } else { &denying };
                    let report = run_cycle(gate, evidence_sufficient, transition, fallback);

                    let violation =
                        !authority_granted || transition == TransitionCase::Illegal;
                    match (&report.expression, violation) {
                        (AuthorityExpression::Refusal(_), true) => {}
                        (_, true) => panic!(
                            "violation not refused: granted={} sufficient={} transition={:?}",
                            authority_granted, evidence_sufficient, transition
                        ),
                        (AuthorityExpression::Order(_), false) => {
                            panic!("engine emitted an unconditional order")
                        }
                        (expr, false) => {
                            if evidence_sufficient {
                                assert!(matches!(expr, AuthorityExpression::Silence(_)));
                            } else {
                                match fallback {
                                    EvidenceFallback::Refusal => assert!(matches!(
                                        expr,
                                        AuthorityExpression::Refusal(_)
                                    )),
                                    EvidenceFallback::Silence => assert!(matches!(
                                        expr,
                                        AuthorityExpression::Silence(_)
                                    )),
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// All applicable reasons are collected; no check short-circuits another.
#[test]
fn test_reasons_are_accumulated_never_short_circuited() {
    let report = run_cycle(
        &CapabilitySet::new(),
        false,
        TransitionCase::Illegal,
        EvidenceFallback::Silence,
    );
    assert_eq!(
        report.decision.reasons,
        vec![
            DecisionReason::OutOfAuthority,
            DecisionReason::InsufficientPrimaryEvidence,
            DecisionReason::CriticalDivergence,
        ]
    );
    assert!(matches!(report.expression, AuthorityExpression::Refusal(_)));
}

// =============================================================================
// Evidence fallback
// =============================================================================

/// With no violation present, the fallback kind is honored exactly.
#[test]
fn test_evidence_fallback_respected() {
    let gate = CapabilitySet::granting([AuthorityLevel::Operational]);

    let silent = run_cycle(&gate, false, TransitionCase::Absent, EvidenceFallback::Silence);
    assert!(matches!(silent.expression, AuthorityExpression::Silence(_)));

    let refused = run_cycle(&gate, false, TransitionCase::Absent, EvidenceFallback::Refusal);
    assert!(matches!(refused.expression, AuthorityExpression::Refusal(_)));

    for report in [silent, refused] {
        assert_eq!(
            report.decision.reasons,
            vec![DecisionReason::InsufficientPrimaryEvidence]
        );
    }
}

/// A preflight report carrying INSUFFICIENT_EVIDENCE makes evidence
/// insufficient even when evidence sets are present.
#[test]
fn test_insufficient_preflight_overrides_present_evidence() {
    let gate = CapabilitySet::granting([AuthorityLevel::Operational]);
    let input = CycleInput {
        facts: vec![],
        evidence: vec![EvidenceSet::new(EvidencePrimary::new("probe ok"), vec![])],
        context: RuntimeContext::initial(Utc::now()),
        preflight_reports: vec![PreflightReport {
            facts: vec![],
            primary_evidence: vec![],
            secondary_evidence: vec![],
            traces: vec![],
            status: PreflightStatus::InsufficientEvidence,
            blocking: true,
            created_at: Utc::now(),
        }],
        health_reports: vec![],
        authority: &gate,
        authority_level: AuthorityLevel::Operational,
        engine_transition: None,
        insufficient_evidence_fallback: EvidenceFallback::Refusal,
        order_identifier: "order-test".to_string(),
        order_scope: "local".to_string(),
    };
    let report = build_cycle(input, Utc::now());
    assert!(report
        .decision
        .reasons
        .contains(&DecisionReason::InsufficientPrimaryEvidence));
    assert!(matches!(report.expression, AuthorityExpression::Refusal(_)));
}

// =============================================================================
// Scenario: divergent transition wins over everything
// =============================================================================

/// (UP, FAILED) is not in the engine allow-table: even with sufficient
/// evidence and granted authority the cycle must refuse.
#[test]
fn test_divergent_transition_forces_refusal_despite_clean_signals() {
    let gate = CapabilitySet::granting([AuthorityLevel::Operational]);
    let input = CycleInput {
        facts: vec![],
        evidence: vec![EvidenceSet::new(EvidencePrimary::new("probe ok"), vec![])],
        context: RuntimeContext::initial(Utc::now()),
        preflight_reports: vec![],
        health_reports: vec![],
        authority: &gate,
        authority_level: AuthorityLevel::Operational,
        engine_transition: Some((EngineState::Up, EngineState::Failed)),
        insufficient_evidence_fallback: EvidenceFallback::Silence,
        order_identifier: "order-test".to_string(),
        order_scope: "local".to_string(),
    };
    let report = build_cycle(input, Utc::now());
    assert_eq!(
        report.decision.reasons,
        vec![DecisionReason::CriticalDivergence]
    );
    match &report.expression {
        AuthorityExpression::Refusal(refusal) => {
            assert!(refusal.reason.contains("critical_divergence"));
        }
        other => panic!("expected refusal, got {:?}", other),
    }
}

/// A clean cycle records OBSERVED and stays Silence.
#[test]
fn test_clean_cycle_is_observed_silence() {
    let gate = CapabilitySet::granting([AuthorityLevel::Operational]);
    let report = run_cycle(&gate, true, TransitionCase::Absent, EvidenceFallback::Refusal);
    assert_eq!(report.decision.reasons, vec![DecisionReason::Observed]);
    assert_eq!(report.decision.summary, "expression=silence");
    assert!(matches!(report.expression, AuthorityExpression::Silence(_)));
}

/// A legal transition contributes TRANSITION_ALLOWED without overriding.
#[test]
fn test_legal_transition_does_not_override() {
    let gate = CapabilitySet::granting([AuthorityLevel::Operational]);
    let report = run_cycle(&gate, true, TransitionCase::Legal, EvidenceFallback::Refusal);
    assert_eq!(
        report.decision.reasons,
        vec![DecisionReason::TransitionAllowed]
    );
    assert!(matches!(report.expression, AuthorityExpression::Silence(_)));
}

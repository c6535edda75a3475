//! Evidence sufficiency predicate.

use crate::model::EvidenceSet;

use super::reports::{PreflightReport, PreflightStatus};

/// Evidence is insufficient if the evidence list is empty OR any preflight
/// report carries INSUFFICIENT_EVIDENCE.
///
/// Evaluated independently of the authority and transition checks: the
/// three signals are never short-circuited against each other, so every
/// applicable reason is collected before the expression kind is resolved.
pub fn evidence_insufficient(evidence: &[EvidenceSet], preflight: &[PreflightReport]) -> bool {
    evidence.is_empty()
        || preflight
            .iter()
            .any(|report| report.status == PreflightStatus::InsufficientEvidence)
}

//! Decisions and the closed registry of decision reasons.

use serde::{Deserialize, Serialize};

use super::Fact;

/// Normalized, non-heuristic justifications for a decision.
///
/// This registry is closed: call sites select from it, they never extend
/// it. Every reason maps to one fixed code (the wire value) and one fixed
/// human-readable explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// No usable primary evidence for this cycle.
    InsufficientPrimaryEvidence,

    /// A state transition outside the allow-table was proposed.
    CriticalDivergence,

    /// The required authority level is not granted.
    OutOfAuthority,

    /// The proposed transition is present in the allow-table.
    TransitionAllowed,

    /// Clean cycle: nothing to report beyond the observation itself.
    Observed,
}

impl DecisionReason {
    /// Wire code, identical to the serde representation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InsufficientPrimaryEvidence => "insufficient_primary_evidence",
            Self::CriticalDivergence => "critical_divergence",
            Self::OutOfAuthority => "out_of_authority",
            Self::TransitionAllowed => "transition_allowed",
            Self::Observed => "observed",
        }
    }

    /// Fixed explanation for audit output.
    pub fn explanation(&self) -> &'static str {
        match self {
            Self::InsufficientPrimaryEvidence => "no usable primary evidence",
            Self::CriticalDivergence => "critical divergence observed",
            Self::OutOfAuthority => "authority insufficient to express an order",
            Self::TransitionAllowed => "transition permitted by the allow-table",
            Self::Observed => "observation without critical divergence",
        }
    }

    /// Join reason codes into the comma-separated audit form.
    pub fn join(reasons: &[DecisionReason]) -> String {
        reasons
            .iter()
            .map(|r| r.code())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A traceable decision, justified by facts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub summary: String,
    pub facts: Vec<Fact>,
}

impl Decision {
    pub fn new(summary: impl Into<String>, facts: Vec<Fact>) -> Self {
        Self {
            summary: summary.into(),
            facts,
        }
    }
}

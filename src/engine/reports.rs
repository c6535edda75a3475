//! Report contracts feeding the decision engine.
//!
//! Preflight and health reports are produced by external sensors and are
//! strictly read-only here: the engine consumes their statuses, it never
//! re-derives or reinterprets them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{EvidencePrimary, EvidenceSecondary, Fact, Trace};

/// Contractual status of a preflight report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreflightStatus {
    InsufficientEvidence,
    IncoherentEvidence,
    ConditionsSatisfied,
    ConditionsUnsatisfied,
}

/// Read-only preflight report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreflightReport {
    pub facts: Vec<Fact>,
    pub primary_evidence: Vec<EvidencePrimary>,
    pub secondary_evidence: Vec<EvidenceSecondary>,
    pub traces: Vec<Trace>,
    pub status: PreflightStatus,
    pub blocking: bool,
    pub created_at: DateTime<Utc>,
}

/// Non-confirming health observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthObservation {
    Observed,
    Unobserved,
    Unknown,
}

/// Read-only health report. Carried through cycles and the status API, but
/// not part of the evidence-sufficiency predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    pub facts: Vec<Fact>,
    pub primary_evidence: Vec<EvidencePrimary>,
    pub secondary_evidence: Vec<EvidenceSecondary>,
    pub traces: Vec<Trace>,
    pub observation: HealthObservation,
    pub created_at: DateTime<Utc>,
}

/// The three possible expression kinds of a decision cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpressionKind {
    Order,
    Refusal,
    Silence,
}

impl ExpressionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Refusal => "refusal",
            Self::Silence => "silence",
        }
    }
}

/// Caller-configured fallback when evidence is insufficient.
///
/// Restricted to Refusal or Silence by construction: the engine must never
/// be handed an Order fallback, and the type makes that unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvidenceFallback {
    Refusal,
    Silence,
}

impl EvidenceFallback {
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Self::Refusal => ExpressionKind::Refusal,
            Self::Silence => ExpressionKind::Silence,
        }
    }
}

/// Expressions a preflight status may legitimately lead to.
///
/// Declarative contract table; no default emission is implied by any entry.
pub fn preflight_allowed_expressions(status: PreflightStatus) -> &'static [ExpressionKind] {
    match status {
        PreflightStatus::InsufficientEvidence => {
            &[ExpressionKind::Refusal, ExpressionKind::Silence]
        }
        PreflightStatus::IncoherentEvidence => &[ExpressionKind::Refusal],
        PreflightStatus::ConditionsUnsatisfied => &[ExpressionKind::Refusal],
        PreflightStatus::ConditionsSatisfied => &[ExpressionKind::Order, ExpressionKind::Silence],
    }
}

//! The governance decision engine.
//!
//! Fuses three independent signals (the authority gate, evidence
//! sufficiency, transition legality) into exactly one terminal
//! expression per cycle. The precedence rules are load-bearing: an
//! authority or coherence violation can never be downgraded to an Order or
//! a plain Silence, whatever the other signals say.

mod cycle;
mod evidence;
mod reports;

pub use cycle::{build_cycle, CycleDecision, CycleInput, CycleReport};
pub use evidence::evidence_insufficient;
pub use reports::{
    preflight_allowed_expressions, EvidenceFallback, ExpressionKind, HealthObservation,
    HealthReport, PreflightReport, PreflightStatus,
};

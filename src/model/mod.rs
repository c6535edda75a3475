//! Value model: immutable records shared by every subsystem.
//!
//! - A Fact is an uninterpreted observation.
//! - A Trace is an irreversible, timestamped footprint of an act.
//! - Evidence pairs exactly one primary proof with contextual secondaries.
//! - An authority expression is one of Order / Refusal / Silence, terminal
//!   in all three cases.
//!
//! Nothing in this module performs I/O or holds mutable state.

mod decision;
mod evidence;
mod expression;
mod fact;
mod trace;

pub use decision::{Decision, DecisionReason};
pub use evidence::{EvidencePrimary, EvidenceSecondary, EvidenceSet};
pub use expression::{
    emit_order, emit_refusal, emit_silence, AuthorityExpression, Order, Refusal, Silence,
};
pub use fact::Fact;
pub use trace::Trace;

/// Parent act tag assigned when an order file does not carry one.
///
/// This value is part of the on-disk order schema and must not change.
pub const ROOT_ACT: &str = "ACTE_IV";

pub(crate) fn root_act() -> String {
    ROOT_ACT.to_string()
}

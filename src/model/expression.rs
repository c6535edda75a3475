//! Authority expressions: Order, Refusal, Silence.
//!
//! All three variants are terminal. An Order may additionally be consumed,
//! exactly once; Refusal and Silence carry no further lifecycle at all.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A consumable, one-shot instruction to perform a privileged action.
///
/// Once `consumed_at` is set the order is terminal: any further consumption
/// attempt must be rejected while preserving the original timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub identifier: String,
    pub scope: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "super::root_act")]
    pub acte_parent: String,
    #[serde(default)]
    pub consumed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Order {
    /// Return a copy with `consumed_at` stamped, if and only if the order
    /// has not been consumed before. An already-consumed order is returned
    /// unchanged, original timestamp preserved.
    pub fn mark_consumed(&self, at: DateTime<Utc>) -> Order {
        let mut order = self.clone();
        if order.consumed_at.is_none() {
            order.consumed_at = Some(at);
        }
        order
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }
}

/// A terminal, reasoned decision not to act. Irrevocable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refusal {
    pub reason: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "super::root_act")]
    pub acte_parent: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// A deliberate absence of expression, distinct from absence of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Silence {
    pub reason: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "super::root_act")]
    pub acte_parent: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// The tagged union of the three terminal expressions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthorityExpression {
    Order(Order),
    Refusal(Refusal),
    Silence(Silence),
}

impl AuthorityExpression {
    /// Tag name for observability.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Order(_) => "order",
            Self::Refusal(_) => "refusal",
            Self::Silence(_) => "silence",
        }
    }
}

/// Emit a declarative order, without execution.
pub fn emit_order(
    identifier: impl Into<String>,
    scope: impl Into<String>,
    metadata: BTreeMap<String, String>,
    acte_parent: impl Into<String>,
) -> Order {
    Order {
        identifier: identifier.into(),
        scope: scope.into(),
        created_at: Utc::now(),
        acte_parent: acte_parent.into(),
        consumed_at: None,
        metadata,
    }
}

/// Emit a declarative refusal.
pub fn emit_refusal(
    reason: impl Into<String>,
    metadata: BTreeMap<String, String>,
    acte_parent: impl Into<String>,
) -> Refusal {
    Refusal {
        reason: reason.into(),
        created_at: Utc::now(),
        acte_parent: acte_parent.into(),
        metadata,
    }
}

/// Emit a declarative silence.
pub fn emit_silence(
    reason: impl Into<String>,
    metadata: BTreeMap<String, String>,
    acte_parent: impl Into<String>,
) -> Silence {
    Silence {
        reason: reason.into(),
        created_at: Utc::now(),
        acte_parent: acte_parent.into(),
        metadata,
    }
}

//! Trace: the irreversible footprint of an act.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A timestamped trace without interpretation.
///
/// Traces are append-only once written; nothing in the system rewrites or
/// deletes one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trace {
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    pub metadata: BTreeMap<String, String>,
}

impl Trace {
    /// Create a trace for the given actor.
    pub fn new<I, K, V>(timestamp: DateTime<Utc>, actor: impl Into<String>, metadata: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            timestamp,
            actor: actor.into(),
            metadata: metadata
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

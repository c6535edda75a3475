//! Evidence types: primary proof and contextual secondaries.

use serde::{Deserialize, Serialize};

/// Directly observed, repeatable proof. Sufficient standalone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidencePrimary {
    pub description: String,
}

impl EvidencePrimary {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Contextual evidence. Never sufficient alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSecondary {
    pub description: String,
}

impl EvidenceSecondary {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Exactly one primary proof paired with zero-or-more secondary items.
///
/// There is no scoring or weighting; composition is the only operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSet {
    pub primary: EvidencePrimary,
    pub secondary: Vec<EvidenceSecondary>,
}

impl EvidenceSet {
    pub fn new(primary: EvidencePrimary, secondary: Vec<EvidenceSecondary>) -> Self {
        Self { primary, secondary }
    }
}

//! Authority levels and the authority gate.
//!
//! Authority is checked by capability lookup, never by comparing ranks:
//! holding EXECUTIVE says nothing about holding OPERATIONAL. Absence of
//! authority is a normal, expected outcome, not an error.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Fixed responsibility tiers. The derived ordering exists only so levels
/// can live in a `BTreeSet`; the gate answers membership, never rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthorityLevel {
    Ontological,
    Operational,
    Executive,
    Exposure,
}

impl AuthorityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ontological => "ONTOLOGICAL",
            Self::Operational => "OPERATIONAL",
            Self::Executive => "EXECUTIVE",
            Self::Exposure => "EXPOSURE",
        }
    }
}

/// The authority gate.
///
/// A pure predicate: no side effects, no errors for a negative answer.
pub trait AuthorityCheck: Send + Sync {
    fn has_authority(&self, level: AuthorityLevel) -> bool;
}

/// Capability-set implementation of the gate: a level is granted if and
/// only if it was explicitly placed in the set.
#[derive(Debug, Clone, Default)]
pub struct CapabilitySet {
    granted: BTreeSet<AuthorityLevel>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set granting exactly the given levels.
    pub fn granting(levels: impl IntoIterator<Item = AuthorityLevel>) -> Self {
        Self {
            granted: levels.into_iter().collect(),
        }
    }

    pub fn grant(&mut self, level: AuthorityLevel) {
        self.granted.insert(level);
    }
}

impl AuthorityCheck for CapabilitySet {
    fn has_authority(&self, level: AuthorityLevel) -> bool {
        self.granted.contains(&level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_denies_everything() {
        let gate = CapabilitySet::new();
        assert!(!gate.has_authority(AuthorityLevel::Operational));
        assert!(!gate.has_authority(AuthorityLevel::Executive));
    }

    #[test]
    fn test_grant_is_per_level_not_rank_based() {
        let gate = CapabilitySet::granting([AuthorityLevel::Executive]);
        assert!(gate.has_authority(AuthorityLevel::Executive));
        // Holding a "higher" tier grants nothing else.
        assert!(!gate.has_authority(AuthorityLevel::Operational));
        assert!(!gate.has_authority(AuthorityLevel::Exposure));
    }
}

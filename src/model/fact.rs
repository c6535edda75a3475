//! Fact: a verifiable, uninterpreted observation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// An observable fact, without interpretation or intent.
///
/// Facts are created by sensors and never mutated. Attribute keys are
/// unique; the ordered map keeps serialization deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    pub description: String,
    pub attributes: BTreeMap<String, String>,
}

impl Fact {
    /// Create a fact from a description and attribute pairs.
    pub fn new<I, K, V>(description: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            description: description.into(),
            attributes: attributes
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_attributes_are_ordered() {
        let fact = Fact::new("deploy.outcome", [("z", "1"), ("a", "2")]);
        let json = serde_json::to_string(&fact).unwrap();
        assert!(json.find("\"a\"").unwrap() < json.find("\"z\"").unwrap());
    }
}

//! State domains and their transition allow-tables.
//!
//! Each domain (engine, app, deploy, integration) has a fixed enumeration
//! and a static table of permitted (from, to) pairs. Any pair absent from
//! its table is illegal: deny-by-omission is the rule, not an exception.

mod transitions;

pub use transitions::{
    app_transition_allowed, deploy_transition_allowed, engine_transition_allowed,
    integration_transition_allowed, ALLOWED_APP_TRANSITIONS, ALLOWED_DEPLOY_TRANSITIONS,
    ALLOWED_ENGINE_TRANSITIONS, ALLOWED_INTEGRATION_TRANSITIONS,
};

use serde::{Deserialize, Serialize};

/// Observed condition of the governance engine itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EngineState {
    Up,
    Degraded,
    Failed,
    Unknown,
}

/// Observed condition of the governed application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AppState {
    Up,
    Down,
    Failed,
    Unknown,
}

/// Terminal condition of a deployment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DeployState {
    Applied,
    Rejected,
    Failed,
    Unknown,
}

/// Observed condition of an external integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IntegrationState {
    Available,
    Unavailable,
    Unstable,
    Unknown,
}

impl EngineState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Degraded => "DEGRADED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

impl DeployState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "APPLIED",
            Self::Rejected => "REJECTED",
            Self::Failed => "FAILED",
            Self::Unknown => "UNKNOWN",
        }
    }
}

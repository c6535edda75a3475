//! Passive runtime context: logical time, cycle framing, status report.
//!
//! Nothing here decides anything. These records frame a decision cycle and
//! are exposed verbatim through the status API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::{HealthReport, PreflightReport};
use crate::model::{AuthorityExpression, EvidenceSet, Fact, Trace, ROOT_ACT};

/// Contractual states of the passive runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuntimeState {
    Init,
    Running,
    Degraded,
    Blocked,
    Failed,
    Stopped,
}

/// Logical clock: tick, instant, cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeClock {
    pub tick: u64,
    pub instant: u64,
    pub cycle: u64,
}

/// One logical cycle of the runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeCycle {
    pub clock: RuntimeClock,
    pub opened_at: DateTime<Utc>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Utc>>,
}

/// Read-only context for a decision cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeContext {
    pub state: RuntimeState,
    pub cycle: RuntimeCycle,
    pub facts: Vec<Fact>,
    pub evidence: Vec<EvidenceSet>,
    pub traces: Vec<Trace>,
}

impl RuntimeContext {
    /// Empty INIT context opened at the given instant.
    pub fn initial(opened_at: DateTime<Utc>) -> Self {
        Self {
            state: RuntimeState::Init,
            cycle: RuntimeCycle {
                clock: RuntimeClock {
                    tick: 0,
                    instant: 0,
                    cycle: 0,
                },
                opened_at,
                closed_at: None,
            },
            facts: vec![],
            evidence: vec![],
            traces: vec![],
        }
    }
}

/// Read-only status report of the passive runtime.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeReport {
    pub context: RuntimeContext,
    pub preflight_reports: Vec<PreflightReport>,
    pub health_reports: Vec<HealthReport>,
    pub expression: AuthorityExpression,
    pub traces: Vec<Trace>,
    pub created_at: DateTime<Utc>,
    pub acte_parent: String,
}

impl RuntimeReport {
    pub fn new(
        context: RuntimeContext,
        preflight_reports: Vec<PreflightReport>,
        health_reports: Vec<HealthReport>,
        expression: AuthorityExpression,
        traces: Vec<Trace>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            context,
            preflight_reports,
            health_reports,
            expression,
            traces,
            created_at,
            acte_parent: ROOT_ACT.to_string(),
        }
    }
}

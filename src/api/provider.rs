//! Report providers backing the status API.

use std::fs;

use chrono::Utc;

use crate::engine::{CycleDecision, CycleReport};
use crate::gateway::{
    build_gateway_report, GatewayContext, GatewayExposureState, GatewayReport, GatewayRequest,
};
use crate::model::{AuthorityExpression, Silence, ROOT_ACT};
use crate::queue::{unknown_result, ExecutionResult, QueueLayout};
use crate::runtime::{RuntimeContext, RuntimeReport};

/// Read-only source for the four status reports.
pub trait StatusProvider: Send + Sync {
    fn get_runtime_status(&self) -> RuntimeReport;
    fn get_runner_cycle(&self) -> CycleReport;
    fn get_deployer_last(&self) -> ExecutionResult;
    fn get_gateway_exposure(&self) -> GatewayReport;
}

/// Provider returning UNKNOWN/empty placeholder reports.
///
/// Used before any cycle has run, and as the fallback whenever a backing
/// record is missing or unreadable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStatusProvider;

impl DefaultStatusProvider {
    pub fn new() -> Self {
        Self
    }
}

fn placeholder_silence(reason: &str) -> AuthorityExpression {
    AuthorityExpression::Silence(Silence {
        reason: reason.to_string(),
        created_at: Utc::now(),
        acte_parent: ROOT_ACT.to_string(),
        metadata: [("reason".to_string(), reason.to_string())].into(),
    })
}

impl StatusProvider for DefaultStatusProvider {
    fn get_runtime_status(&self) -> RuntimeReport {
        let now = Utc::now();
        RuntimeReport::new(
            RuntimeContext::initial(now),
            vec![],
            vec![],
            placeholder_silence("runtime_status_unknown"),
            vec![],
            now,
        )
    }

    fn get_runner_cycle(&self) -> CycleReport {
        let now = Utc::now();
        CycleReport {
            context: RuntimeContext::initial(now),
            decision: CycleDecision {
                summary: "cycle_report_unavailable".to_string(),
                reasons: vec![],
                acte_parent: ROOT_ACT.to_string(),
            },
            expression: placeholder_silence("runner_cycle_unknown"),
            traces: vec![],
            preflight_reports: vec![],
            health_reports: vec![],
            created_at: now,
            acte_parent: ROOT_ACT.to_string(),
        }
    }

    fn get_deployer_last(&self) -> ExecutionResult {
        unknown_result(Utc::now())
    }

    fn get_gateway_exposure(&self) -> GatewayReport {
        // Unknown target without proof: insufficient evidence, Silence.
        build_gateway_report(
            GatewayRequest {
                order: None,
                context: GatewayContext {
                    target: "unknown".to_string(),
                    exposure_state: GatewayExposureState::Unknown,
                    proof_present: false,
                    facts: vec![],
                    traces: vec![],
                },
                metadata: Default::default(),
            },
            Utc::now(),
        )
    }
}

/// Provider reading the deployer record from the library directory.
///
/// `last_execution.json` is replaced atomically by the processor, so a read
/// observes either the previous or the current complete document; a missing
/// or garbled file falls back to the placeholder rather than erroring.
#[derive(Debug, Clone)]
pub struct FileStatusProvider {
    layout: QueueLayout,
    fallback: DefaultStatusProvider,
}

impl FileStatusProvider {
    pub fn new(layout: QueueLayout) -> Self {
        Self {
            layout,
            fallback: DefaultStatusProvider::new(),
        }
    }
}

impl StatusProvider for FileStatusProvider {
    fn get_runtime_status(&self) -> RuntimeReport {
        self.fallback.get_runtime_status()
    }

    fn get_runner_cycle(&self) -> CycleReport {
        self.fallback.get_runner_cycle()
    }

    fn get_deployer_last(&self) -> ExecutionResult {
        fs::read_to_string(self.layout.last_execution_file())
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_else(|| self.fallback.get_deployer_last())
    }

    fn get_gateway_exposure(&self) -> GatewayReport {
        self.fallback.get_gateway_exposure()
    }
}

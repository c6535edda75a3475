//! Cooperative decision-cycle loop.
//!
//! Each tick advances the persisted cycle id, gathers fresh read-only
//! inputs from the injected source, runs one decision cycle and appends the
//! resulting entry to the ledger. The cycle id marker survives restarts; an
//! unreadable marker restarts the count at zero rather than failing boot.

use std::fs;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::authority::{AuthorityCheck, AuthorityLevel};
use crate::engine::{
    build_cycle, CycleInput, CycleReport, EvidenceFallback, HealthReport, PreflightReport,
};
use crate::ledger::{Ledger, LedgerEntry};
use crate::model::{EvidenceSet, Fact};
use crate::observability::{Logger, Severity};
use crate::queue::QueueLayout;
use crate::runtime::RuntimeContext;
use crate::state::EngineState;

/// Read-only input source for decision cycles.
///
/// Implementations are sensors: they observe, they never decide.
pub trait CycleSource: Send + Sync {
    fn facts(&self) -> Vec<Fact>;
    fn evidence(&self) -> Vec<EvidenceSet>;
    fn preflight_reports(&self) -> Vec<PreflightReport>;
    fn health_reports(&self) -> Vec<HealthReport>;

    /// Proposed engine transition for this cycle, if any.
    fn engine_transition(&self) -> Option<(EngineState, EngineState)> {
        None
    }
}

/// Source with nothing to report. Every cycle it feeds is a clean Silence.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCycleSource;

impl CycleSource for NullCycleSource {
    fn facts(&self) -> Vec<Fact> {
        vec![]
    }

    fn evidence(&self) -> Vec<EvidenceSet> {
        vec![]
    }

    fn preflight_reports(&self) -> Vec<PreflightReport> {
        vec![]
    }

    fn health_reports(&self) -> Vec<HealthReport> {
        vec![]
    }
}

/// Last persisted cycle id; missing or garbled markers read as zero.
pub fn read_last_cycle_id(path: &Path) -> u64 {
    fs::read_to_string(path)
        .ok()
        .and_then(|text| text.trim().parse().ok())
        .unwrap_or(0)
}

/// Persist the cycle id atomically (temp sibling + rename).
pub fn write_cycle_id(path: &Path, cycle_id: u64) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("last_cycle_id");
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));
    fs::write(&temp_path, cycle_id.to_string())?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

/// The decision-cycle loop.
pub struct RunnerLoop {
    layout: QueueLayout,
    ledger: Arc<dyn Ledger>,
    source: Box<dyn CycleSource>,
    authority: Box<dyn AuthorityCheck>,
    authority_level: AuthorityLevel,
    insufficient_evidence_fallback: EvidenceFallback,
    interval: Duration,
}

impl RunnerLoop {
    pub fn new(
        layout: QueueLayout,
        ledger: Arc<dyn Ledger>,
        source: Box<dyn CycleSource>,
        authority: Box<dyn AuthorityCheck>,
        authority_level: AuthorityLevel,
        insufficient_evidence_fallback: EvidenceFallback,
        interval: Duration,
    ) -> Self {
        Self {
            layout,
            ledger,
            source,
            authority,
            authority_level,
            insufficient_evidence_fallback,
            interval,
        }
    }

    /// Run until the stop flag is raised; checked only between ticks.
    pub fn run(&self, stop: &AtomicBool) -> io::Result<()> {
        while !stop.load(Ordering::SeqCst) {
            self.tick()?;
            if stop.load(Ordering::SeqCst) {
                break;
            }
            std::thread::sleep(self.interval);
        }
        Logger::log(Severity::Info, "runner.stopped", &[]);
        Ok(())
    }

    /// Run exactly one decision cycle and persist its outcome.
    pub fn tick(&self) -> io::Result<CycleReport> {
        let cycle_id_file = self.layout.cycle_id_file();
        let cycle_id = read_last_cycle_id(&cycle_id_file) + 1;
        let now = Utc::now();

        let mut context = RuntimeContext::initial(now);
        context.cycle.clock.cycle = cycle_id;
        context.facts = self.source.facts();
        context.evidence = self.source.evidence();

        let input = CycleInput {
            facts: context.facts.clone(),
            evidence: context.evidence.clone(),
            context,
            preflight_reports: self.source.preflight_reports(),
            health_reports: self.source.health_reports(),
            authority: self.authority.as_ref(),
            authority_level: self.authority_level,
            engine_transition: self.source.engine_transition(),
            insufficient_evidence_fallback: self.insufficient_evidence_fallback,
            order_identifier: format!("order-{}", Uuid::new_v4()),
            order_scope: "runner".to_string(),
        };

        let report = build_cycle(input, now);

        let entry = LedgerEntry {
            acte_parent: report.acte_parent.clone(),
            created_at: report.created_at,
            facts: report.context.facts.clone(),
            evidence: report.context.evidence.clone(),
            decision: report.decision.to_decision(report.context.facts.clone()),
            traces: report.traces.clone(),
            expression: Some(report.expression.clone()),
        };
        self.ledger.append(&entry)?;
        write_cycle_id(&cycle_id_file, cycle_id)?;

        Logger::log(
            Severity::Info,
            "runner.cycle",
            &[
                ("cycle", &cycle_id.to_string()),
                ("expression", report.expression.kind_name()),
                ("summary", &report.decision.summary),
            ],
        );
        Ok(report)
    }
}

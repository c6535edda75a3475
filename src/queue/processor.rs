//! The order queue polling loop.
//!
//! Protocol per tick:
//! 1. list inbox files, FIFO by modification time, take at most one;
//! 2. parse, validate, apply;
//! 3. persist the execution result atomically (temp file + rename);
//! 4. atomically move the order file to consumed or rejected; the rename
//!    is the commit point, and a rejection writes a `.reason.json` sidecar;
//! 5. sleep, repeat.
//!
//! A fault while applying a single order is contained at the loop boundary:
//! it becomes a FAILED result and a rejected file, never a dead loop. The
//! stop flag is observed only between ticks; a tick in progress always runs
//! to completion.

use std::fs;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime};

use chrono::Utc;
use serde_json::json;

use crate::observability::{Logger, Severity};

use super::apply::{ApplyResult, DeployOutcome, OrderExecutor};
use super::layout::{atomic_write_json, QueueLayout};
use super::order_file::parse_order_file;
use super::result::{self, ExecutionResult};
use super::QueueResult;

/// File-based, at-most-once order processor.
pub struct OrderProcessor {
    layout: QueueLayout,
    executor: Box<dyn OrderExecutor>,
    interval: Duration,
}

impl OrderProcessor {
    pub fn new(layout: QueueLayout, executor: Box<dyn OrderExecutor>, interval: Duration) -> Self {
        Self {
            layout,
            executor,
            interval,
        }
    }

    pub fn layout(&self) -> &QueueLayout {
        &self.layout
    }

    /// Run until the stop flag is raised. The flag is checked only between
    /// ticks; an in-flight tick finishes.
    pub fn run(&self, stop: &AtomicBool) -> QueueResult<()> {
        self.layout.ensure()?;
        while !stop.load(Ordering::SeqCst) {
            self.tick()?;
            if stop.load(Ordering::SeqCst) {
                break;
            }
            std::thread::sleep(self.interval);
        }
        Logger::log(Severity::Info, "processor.stopped", &[]);
        Ok(())
    }

    /// Process at most one order file. Returns the persisted result, if an
    /// order was present.
    pub fn tick(&self) -> QueueResult<Option<ExecutionResult>> {
        let order_path = match self.next_inbox_file()? {
            Some(path) => path,
            None => return Ok(None),
        };
        let file_name = order_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        Logger::log(Severity::Info, "order.processing", &[("file", &file_name)]);

        let started_at = Utc::now();
        let parsed = parse_order_file(&order_path, started_at);

        if !parsed.errors.is_empty() {
            let finished_at = Utc::now();
            Logger::log(
                Severity::Warn,
                "order.validation_errors",
                &[("file", &file_name), ("errors", &parsed.errors.join(","))],
            );
            let exec_result = result::rejection(
                &parsed.order,
                &parsed.errors,
                started_at,
                finished_at,
                parsed.defaulted_created_at,
            );
            self.finish_rejected(
                &order_path,
                &file_name,
                &exec_result,
                &parsed.errors,
                parsed.defaulted_created_at,
            )?;
            return Ok(Some(exec_result));
        }

        Logger::log(
            Severity::Info,
            "order.loaded",
            &[("file", &file_name), ("order_id", &parsed.order.identifier)],
        );

        let order = parsed.order.clone();
        let attempt = catch_unwind(AssertUnwindSafe(|| self.executor.apply(&order)));
        let finished_at = Utc::now();

        match attempt {
            Ok(apply_result) => {
                let exec_result = result::from_apply(
                    &apply_result,
                    started_at,
                    finished_at,
                    parsed.defaulted_created_at,
                );
                if apply_result.outcome == DeployOutcome::Applied {
                    atomic_write_json(&self.layout.last_execution_file(), &exec_result)?;
                    self.move_order(&order_path, &self.layout.consumed(), &file_name)?;
                    Logger::log(Severity::Info, "order.consumed", &[("file", &file_name)]);
                } else {
                    self.finish_rejected(
                        &order_path,
                        &file_name,
                        &exec_result,
                        &collected_errors(&parsed.errors, &apply_result),
                        parsed.defaulted_created_at,
                    )?;
                }
                Ok(Some(exec_result))
            }
            Err(panic) => {
                let error_text = panic_message(panic);
                Logger::log_stderr(
                    Severity::Error,
                    "order.apply_failed",
                    &[("file", &file_name), ("error", &error_text)],
                );
                let exec_result = result::failure(
                    &parsed.order,
                    &error_text,
                    started_at,
                    finished_at,
                    parsed.defaulted_created_at,
                );
                self.finish_rejected(
                    &order_path,
                    &file_name,
                    &exec_result,
                    &["execution_fault".to_string()],
                    parsed.defaulted_created_at,
                )?;
                Ok(Some(exec_result))
            }
        }
    }

    /// Oldest order file in the inbox, FIFO by modification time.
    fn next_inbox_file(&self) -> QueueResult<Option<PathBuf>> {
        let inbox = self.layout.inbox();
        if !inbox.is_dir() {
            return Ok(None);
        }
        let mut files: Vec<(SystemTime, PathBuf)> = Vec::new();
        for entry in fs::read_dir(&inbox)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let modified = entry
                .metadata()
                .and_then(|m| m.modified())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((modified, path));
        }
        files.sort_by(|a, b| a.cmp(b));
        Ok(files.into_iter().next().map(|(_, path)| path))
    }

    fn finish_rejected(
        &self,
        order_path: &Path,
        file_name: &str,
        exec_result: &ExecutionResult,
        errors: &[String],
        defaulted_created_at: bool,
    ) -> QueueResult<()> {
        atomic_write_json(&self.layout.last_execution_file(), exec_result)?;
        self.move_order(order_path, &self.layout.rejected(), file_name)?;
        self.write_rejection_reason(file_name, errors, defaulted_created_at)?;
        Logger::log(Severity::Info, "order.rejected", &[("file", file_name)]);
        Ok(())
    }

    /// Atomic rename out of the inbox: the commit point.
    fn move_order(&self, from: &Path, target_dir: &Path, file_name: &str) -> QueueResult<()> {
        fs::rename(from, target_dir.join(file_name))?;
        Ok(())
    }

    fn write_rejection_reason(
        &self,
        file_name: &str,
        errors: &[String],
        defaulted_created_at: bool,
    ) -> QueueResult<()> {
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| file_name.to_string());
        let reason_path = self.layout.rejected().join(format!("{}.reason.json", stem));
        atomic_write_json(
            &reason_path,
            &json!({
                "errors": errors,
                "order.created_at.defaulted": defaulted_created_at,
            }),
        )?;
        Ok(())
    }
}

fn collected_errors(parse_errors: &[String], apply_result: &ApplyResult) -> Vec<String> {
    let mut errors = parse_errors.to_vec();
    errors.extend(apply_result.errors.iter().cloned());
    errors
}

fn panic_message(panic: Box<dyn std::any::Any + Send>) -> String {
    if let Some(text) = panic.downcast_ref::<&str>() {
        (*text).to_string()
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else {
        "unknown execution fault".to_string()
    }
}

//! Append-only decision ledger.
//!
//! Every decision cycle produces exactly one `LedgerEntry`, serialized as a
//! single self-contained JSON line. Entries are never rewritten, reordered
//! or deleted. Durability is best-effort: each append writes one complete
//! line and flushes to the OS, but no fsync is issued; a crash immediately
//! after `append` returns may lose the most recent line. I/O failures are
//! not caught here; the caller treats them as fatal for the current cycle.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{AuthorityExpression, Decision, EvidenceSet, Fact, Trace};

/// One audit record per decision cycle.
///
/// Constructed once, serialized, appended. Never updated.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerEntry {
    pub acte_parent: String,
    pub created_at: DateTime<Utc>,
    pub facts: Vec<Fact>,
    pub evidence: Vec<EvidenceSet>,
    pub decision: Decision,
    pub traces: Vec<Trace>,
    pub expression: Option<AuthorityExpression>,
}

/// Append-only ledger contract.
///
/// `append` must durably persist exactly one entry before returning (to the
/// best-effort level documented above): either a complete line is appended
/// or nothing is.
pub trait Ledger: Send + Sync {
    fn append(&self, entry: &LedgerEntry) -> io::Result<()>;
}

/// File-backed ledger: one JSON object per line, no enclosing array.
pub struct FileLedger {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileLedger {
    /// Open or create the ledger file in append mode.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Ledger for FileLedger {
    fn append(&self, entry: &LedgerEntry) -> io::Result<()> {
        let json = serde_json::to_string(entry)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let mut writer = self.writer.lock().unwrap();
        // One write for the full line keeps partial entries impossible
        // short of a mid-write crash below the buffer.
        writeln!(writer, "{}", json)?;
        writer.flush()
    }
}

/// In-memory ledger for tests.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    entries: Mutex<Vec<LedgerEntry>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LedgerEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl Ledger for MemoryLedger {
    fn append(&self, entry: &LedgerEntry) -> io::Result<()> {
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}

//! Library-root directory layout and atomic JSON persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Persisted layout under the library root:
/// `orders/inbox`, `orders/consumed`, `orders/rejected`, the
/// last-execution-result file and the last-cycle-id marker.
#[derive(Debug, Clone)]
pub struct QueueLayout {
    root: PathBuf,
}

impl QueueLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn inbox(&self) -> PathBuf {
        self.root.join("orders").join("inbox")
    }

    pub fn consumed(&self) -> PathBuf {
        self.root.join("orders").join("consumed")
    }

    pub fn rejected(&self) -> PathBuf {
        self.root.join("orders").join("rejected")
    }

    pub fn last_execution_file(&self) -> PathBuf {
        self.root.join("last_execution.json")
    }

    pub fn cycle_id_file(&self) -> PathBuf {
        self.root.join("last_cycle_id")
    }

    pub fn ledger_file(&self) -> PathBuf {
        self.root.join("ledger.jsonl")
    }

    /// Create every directory of the layout.
    pub fn ensure(&self) -> io::Result<()> {
        for dir in [self.inbox(), self.consumed(), self.rejected()] {
            fs::create_dir_all(dir)?;
        }
        Ok(())
    }
}

/// Write a JSON document atomically: serialize to a temporary sibling,
/// then rename over the target. External readers observe either the old
/// or the new document, never a partial one.
pub fn atomic_write_json<T: Serialize>(path: &Path, payload: &T) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("payload.json");
    let temp_path = path.with_file_name(format!(".{}.{}.tmp", file_name, std::process::id()));
    let data = serde_json::to_vec_pretty(payload)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&temp_path, data)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_ensure_creates_order_directories() {
        let dir = tempdir().unwrap();
        let layout = QueueLayout::new(dir.path());
        layout.ensure().unwrap();
        assert!(layout.inbox().is_dir());
        assert!(layout.consumed().is_dir());
        assert!(layout.rejected().is_dir());
    }

    #[test]
    fn test_atomic_write_replaces_whole_document() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("last_execution.json");
        atomic_write_json(&target, &serde_json::json!({"status": "UNKNOWN"})).unwrap();
        atomic_write_json(&target, &serde_json::json!({"status": "APPLIED"})).unwrap();

        let text = std::fs::read_to_string(&target).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["status"], "APPLIED");
        // No temporary files left behind.
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }
}

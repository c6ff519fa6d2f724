//! JSON Lines history store.

use crate::types::HistoryEntry;
use crate::{HistoryError, HistoryResult};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

pub const HISTORY_FILE: &str = "history.jsonl";

#[derive(Clone)]
pub struct HistoryStore {
    root_dir: PathBuf,
}

impl HistoryStore {
    pub fn new(root_dir: PathBuf) -> HistoryResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    /// Read-only handle. A missing directory is an empty history and is not
    /// created.
    pub fn open(root_dir: PathBuf) -> HistoryResult<Self> {
        if root_dir.exists() && !root_dir.is_dir() {
            return Err(HistoryError::InvalidPath {
                message: format!("{} is not a directory", root_dir.display()),
            });
        }
        Ok(Self { root_dir })
    }

    pub fn path(&self) -> PathBuf {
        self.root_dir.join(HISTORY_FILE)
    }

    pub fn append(&self, entry: &HistoryEntry) -> HistoryResult<()> {
        let mut line = serde_json::to_string(entry)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path())?;
        file.write_all(line.as_bytes())?;
        tracing::debug!(id = %entry.id, tag = %entry.draft.tag, "history entry appended");
        Ok(())
    }

    /// All entries, oldest first.
    pub fn list(&self) -> HistoryResult<Vec<HistoryEntry>> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        let mut entries = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let entry = serde_json::from_str(line).map_err(|e| HistoryError::Corrupt {
                line: idx + 1,
                message: e.to_string(),
            })?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Entries whose tag matches, case-insensitive.
    pub fn filter_by_tag(&self, tag: &str) -> HistoryResult<Vec<HistoryEntry>> {
        let wanted = tag.trim();
        Ok(self
            .list()?
            .into_iter()
            .filter(|entry| entry.draft.tag.trim().eq_ignore_ascii_case(wanted))
            .collect())
    }
}

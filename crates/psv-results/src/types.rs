//! History record types.

use serde::{Deserialize, Serialize};

pub type EntryId = String;

/// What the caller knows about a finished calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub user: String,
    pub tag: String,
    pub service: String,
    /// "Sizing" or "Capacity".
    pub mode: String,
    /// Unit text as entered, e.g. "10 barg".
    pub set_pressure: String,
    pub back_pressure: String,
    pub orifice: String,
    pub valve_size: String,
    /// Required area for sizing, rated flow for capacity.
    pub outcome: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: EntryId,
    /// RFC 3339, UTC.
    pub timestamp: String,
    #[serde(flatten)]
    pub draft: EntryDraft,
}

impl HistoryEntry {
    pub fn stamp(draft: EntryDraft) -> Self {
        let timestamp = chrono::Utc::now().to_rfc3339();
        Self::at(draft, timestamp)
    }

    pub fn at(draft: EntryDraft, timestamp: String) -> Self {
        let id = crate::hash::compute_entry_id(&draft, &timestamp);
        Self {
            id,
            timestamp,
            draft,
        }
    }
}

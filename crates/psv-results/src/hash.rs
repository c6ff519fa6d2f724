//! Content-based hashing for history entry ids.

use crate::types::EntryDraft;
use sha2::{Digest, Sha256};

pub fn compute_entry_id(draft: &EntryDraft, timestamp: &str) -> String {
    let mut hasher = Sha256::new();

    let draft_json = serde_json::to_string(draft).unwrap_or_default();
    hasher.update(draft_json.as_bytes());
    hasher.update(timestamp.as_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(tag: &str) -> EntryDraft {
        EntryDraft {
            user: "jdoe".to_string(),
            tag: tag.to_string(),
            service: "Gas/Vapor".to_string(),
            mode: "Sizing".to_string(),
            set_pressure: "10 barg".to_string(),
            back_pressure: "0 barg".to_string(),
            orifice: "E".to_string(),
            valve_size: "1\" x 2\"".to_string(),
            outcome: "97.9 mm²".to_string(),
        }
    }

    #[test]
    fn hash_stability() {
        let ts = "2026-10-16T09:00:00+00:00";
        assert_eq!(compute_entry_id(&draft("PSV-1"), ts), compute_entry_id(&draft("PSV-1"), ts));
    }

    #[test]
    fn hash_differs_for_different_inputs() {
        let ts = "2026-10-16T09:00:00+00:00";
        assert_ne!(compute_entry_id(&draft("PSV-1"), ts), compute_entry_id(&draft("PSV-2"), ts));
        assert_ne!(
            compute_entry_id(&draft("PSV-1"), ts),
            compute_entry_id(&draft("PSV-1"), "2026-10-16T09:00:01+00:00")
        );
    }
}

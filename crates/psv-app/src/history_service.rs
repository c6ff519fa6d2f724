//! History entries for finished calculations.

use psv_project::SizingCase;
use psv_results::{EntryDraft, HistoryEntry, HistoryStore};
use psv_sizing::{ModeKind, SizingResult};
use std::path::Path;

use crate::error::AppResult;

pub fn history_draft(case: &SizingCase, result: &SizingResult, user: &str) -> EntryDraft {
    let outcome = match (result.mode, result.required_area_mm2) {
        (ModeKind::Sizing, Some(area)) => format!("{area:.2} mm²"),
        _ => format!(
            "{:.2} {}",
            result.flow.display.value, result.flow.display.unit
        ),
    };
    let back = psv_sizing::input::combine_back_pressure(
        case.process.back_pressure_constant,
        case.process.back_pressure_variable,
    );

    EntryDraft {
        user: user.to_string(),
        tag: case.general.tag.clone(),
        service: result.service.to_string(),
        mode: case.process.mode.label().to_string(),
        set_pressure: case.process.set_pressure.to_string(),
        back_pressure: format!("{:.2} {}", back.value, back.unit),
        orifice: result.orifice.designation.to_string(),
        valve_size: result.mechanical.valve_size.clone(),
        outcome,
    }
}

/// Entries in `dir`, optionally only those tagged `tag`. Never creates `dir`.
pub fn list_history(dir: &Path, tag: Option<&str>) -> AppResult<Vec<HistoryEntry>> {
    let store = HistoryStore::open(dir.to_path_buf())?;
    let entries = match tag {
        Some(tag) => store.filter_by_tag(tag)?,
        None => store.list()?,
    };
    Ok(entries)
}

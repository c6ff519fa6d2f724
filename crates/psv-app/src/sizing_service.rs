//! Engine construction and case execution.

use psv_fluids::{CoolPropSource, PropertySource, UnavailableSource};
use psv_project::{BackendKind, SizingCase};
use psv_results::{HistoryEntry, HistoryStore};
use psv_sizing::{SizingEngine, SizingResult, SpringTable};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::case_service;
use crate::error::AppResult;
use crate::history_service;
use crate::report::{Datasheet, build_datasheet};

/// Caller choices that are not part of the case file.
#[derive(Debug, Clone)]
pub struct SizingOptions {
    /// Overrides the case's spring table.
    pub springs: Option<PathBuf>,
    /// Append a history entry here when set.
    pub history_dir: Option<PathBuf>,
    pub user: String,
}

impl Default for SizingOptions {
    fn default() -> Self {
        Self {
            springs: None,
            history_dir: None,
            user: std::env::var("USER")
                .or_else(|_| std::env::var("USERNAME"))
                .unwrap_or_else(|_| "unknown".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SizingResponse {
    pub result: SizingResult,
    pub datasheet: Datasheet,
    pub history_entry: Option<HistoryEntry>,
}

/// Load a case file and size it. Relative paths in the case resolve
/// against the case file's directory.
pub fn size_case_file(path: &Path, options: &SizingOptions) -> AppResult<SizingResponse> {
    let case = case_service::load_case(path)?;
    size_case(&case, path.parent(), options)
}

pub fn size_case(
    case: &SizingCase,
    base_dir: Option<&Path>,
    options: &SizingOptions,
) -> AppResult<SizingResponse> {
    psv_project::validate_case(case)?;
    let request = case.to_request()?;
    let engine = build_engine(case, base_dir, options);

    tracing::info!(
        tag = %case.general.tag,
        service = %case.process.service,
        backend = engine.source_name(),
        "sizing case"
    );
    let result = engine.run(&request)?;
    let datasheet = build_datasheet(case, &result);

    let history_entry = match &options.history_dir {
        Some(dir) => {
            let entry = HistoryEntry::stamp(history_service::history_draft(
                case,
                &result,
                &options.user,
            ));
            HistoryStore::new(dir.clone())?.append(&entry)?;
            Some(entry)
        }
        None => None,
    };

    Ok(SizingResponse {
        result,
        datasheet,
        history_entry,
    })
}

/// Engine for a case: property backend plus the optional spring table.
pub fn build_engine(
    case: &SizingCase,
    base_dir: Option<&Path>,
    options: &SizingOptions,
) -> SizingEngine {
    let mut engine = SizingEngine::new(property_source(case.engine.backend));

    let springs_path = options.springs.clone().or_else(|| {
        case.engine.springs.as_ref().map(|p| match base_dir {
            Some(base) if p.is_relative() => base.join(p),
            _ => p.clone(),
        })
    });
    if let Some(path) = springs_path
        && let Some(table) = load_springs(&path)
    {
        engine = engine.with_springs(table);
    }
    engine
}

fn property_source(kind: BackendKind) -> Arc<dyn PropertySource> {
    match kind {
        BackendKind::Coolprop => Arc::new(CoolPropSource::new()),
        BackendKind::None => Arc::new(UnavailableSource),
    }
}

/// A missing or unreadable table leaves the lookup unavailable.
fn load_springs(path: &Path) -> Option<SpringTable> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "spring table not loaded");
            return None;
        }
    };
    match SpringTable::parse(&text) {
        Ok(table) => {
            tracing::debug!(
                path = %path.display(),
                springs = table.len(),
                orifices = ?table.orifice_columns(),
                "spring table loaded"
            );
            Some(table)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "spring table rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_spring_file_is_not_fatal() {
        assert!(load_springs(Path::new("/nonexistent/springs.csv")).is_none());
    }

    #[test]
    fn header_only_table_still_loads() {
        let path = std::env::temp_dir().join("psv_app_springs_header.csv");
        std::fs::write(&path, "Spring,D,E\n").unwrap();
        let table = load_springs(&path).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.orifice_columns(), ["D", "E"]);
    }
}

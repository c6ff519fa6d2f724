//! Case loading, validation, and introspection.

use psv_project::SizingCase;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// One-line view of a case for listings.
#[derive(Debug, Clone)]
pub struct CaseSummary {
    pub tag: String,
    pub service: String,
    pub mode: String,
    pub fluid: String,
    pub set_pressure: String,
}

/// Load, migrate and validate a YAML or JSON case file.
pub fn load_case(path: &Path) -> AppResult<SizingCase> {
    if !path.exists() {
        return Err(AppError::CaseFileRead {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        });
    }
    Ok(psv_project::load_case(path)?)
}

/// Full validation, including conversion into an engine request.
pub fn validate_case(case: &SizingCase) -> AppResult<()> {
    psv_project::validate_case(case)?;
    case.to_request()?;
    Ok(())
}

pub fn summarize_case(case: &SizingCase) -> CaseSummary {
    let fluid = match (&case.fluid.name, &case.fluid.manual) {
        (Some(name), _) => name.clone(),
        (None, Some(_)) => "Custom (Manual Input)".to_string(),
        (None, None) => "-".to_string(),
    };
    CaseSummary {
        tag: case.general.tag.clone(),
        service: case.process.service.to_string(),
        mode: case.process.mode.label().to_string(),
        fluid,
        set_pressure: case.process.set_pressure.to_string(),
    }
}

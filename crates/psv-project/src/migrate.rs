//! Schema migration framework.

use crate::ProjectError;
use crate::schema::SizingCase;

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut case: SizingCase) -> Result<SizingCase, ProjectError> {
    while case.version < LATEST_VERSION {
        case = migrate_one_version(case)?;
    }
    Ok(case)
}

fn migrate_one_version(case: SizingCase) -> Result<SizingCase, ProjectError> {
    match case.version {
        0 => migrate_v0_to_v1(case),
        1 => migrate_v1_to_v2(case),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

fn migrate_v0_to_v1(mut case: SizingCase) -> Result<SizingCase, ProjectError> {
    case.version = 1;
    Ok(case)
}

/// Version 1 files stored a blank tag when none was entered; version 2
/// requires a tag, so fill it from the description or a placeholder.
fn migrate_v1_to_v2(mut case: SizingCase) -> Result<SizingCase, ProjectError> {
    if case.general.tag.trim().is_empty() {
        let description = case.general.description.trim();
        case.general.tag = if description.is_empty() {
            "UNTAGGED".to_string()
        } else {
            description.chars().take(32).collect()
        };
    }
    case.version = 2;
    Ok(case)
}

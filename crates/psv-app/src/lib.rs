//! Shared application service layer for relief-valve sizing.
//!
//! Front ends load a case, hand it to [`sizing_service`], and render the
//! returned datasheet. History is appended here, never by the engine.

pub mod case_service;
pub mod error;
pub mod history_service;
pub mod report;
pub mod sizing_service;

pub use case_service::{CaseSummary, load_case, summarize_case, validate_case};
pub use error::{AppError, AppResult};
pub use history_service::{history_draft, list_history};
pub use report::{Datasheet, DatasheetGroup, build_datasheet};
pub use sizing_service::{SizingOptions, SizingResponse, build_engine, size_case, size_case_file};

//! psv-results: append-only calculation history.
//!
//! The store is owned by the caller. The sizing engine never writes to it.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_entry_id;
pub use store::HistoryStore;
pub use types::*;

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(thiserror::Error, Debug)]
pub enum HistoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt history line {line}: {message}")]
    Corrupt { line: usize, message: String },

    #[error("Invalid path: {message}")]
    InvalidPath { message: String },
}

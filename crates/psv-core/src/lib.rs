//! psv-core: stable foundation for the relief-valve sizing workspace.
//!
//! Contains:
//! - units (uom SI types + constructors, atmospheric reference)
//! - numeric (Real + finiteness/positivity guards)
//! - error (shared error types)

pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;

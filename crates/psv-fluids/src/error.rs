//! Fluid property errors.

use psv_core::CoreError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur while looking up or resolving fluid properties.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of valid range.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Fluid name not present in the catalog.
    #[error("Unknown fluid '{name}'")]
    UnknownFluid { name: String },

    /// The backing source cannot evaluate this fluid or this kind of state.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// Backend (CoolProp) evaluation failed at the requested state.
    #[error("Backend error: {message}")]
    Backend { message: String },

    /// No property backend is configured; use manual properties.
    #[error("No fluid property source available")]
    Unavailable,
}

impl From<CoreError> for FluidError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NonFinite { what, .. } => FluidError::NonPhysical { what },
            CoreError::InvalidArg { what } => FluidError::InvalidArg { what },
        }
    }
}

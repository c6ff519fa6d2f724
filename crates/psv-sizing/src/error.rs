//! Error types for sizing calculations.

use crate::input::ServiceType;
use psv_core::CoreError;
use psv_fluids::FluidError;
use thiserror::Error;

/// Errors that stop a sizing or capacity calculation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    #[error("Invalid property: {what}")]
    InvalidProperty { what: &'static str },

    #[error(
        "Back pressure ({p2_abs_kpa:.2} kPa abs) meets or exceeds relieving pressure ({p1_abs_kpa:.2} kPa abs)"
    )]
    Overpressure { p1_abs_kpa: f64, p2_abs_kpa: f64 },

    #[error(
        "No {family} orifice covers {required_mm2:.2} mm² at set pressure {set_pressure_barg:.2} barg"
    )]
    NoOrificeFound {
        family: &'static str,
        required_mm2: f64,
        set_pressure_barg: f64,
    },

    #[error("Cannot resolve properties of {fluid} for {service} service: {source}")]
    PropertyResolution {
        fluid: String,
        service: ServiceType,
        #[source]
        source: FluidError,
    },

    #[error("Range not found: {what}")]
    RangeNotFound { what: String },

    #[error("Invalid input: {what}")]
    InvalidInput { what: &'static str },

    #[error("Unknown orifice designation '{designation}'")]
    UnknownOrifice { designation: String },

    #[error("Unit error: {message}")]
    Unit { message: String },

    #[error("Non-finite value: {what}")]
    NonFinite { what: &'static str },
}

pub type CalcResult<T> = Result<T, SizingError>;

impl From<CoreError> for SizingError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NonFinite { what, .. } => SizingError::NonFinite { what },
            CoreError::InvalidArg { what } => SizingError::InvalidInput { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn overpressure_display_names_both_pressures() {
        let err = SizingError::Overpressure {
            p1_abs_kpa: 651.325,
            p2_abs_kpa: 701.325,
        };
        let msg = err.to_string();
        assert!(msg.contains("701.33"), "{msg}");
        assert!(msg.contains("651.33"), "{msg}");
    }

    #[test]
    fn property_resolution_keeps_cause() {
        let err = SizingError::PropertyResolution {
            fluid: "Nitrogen".into(),
            service: ServiceType::GasVapor,
            source: FluidError::Unavailable,
        };
        assert!(err.to_string().contains("Nitrogen"));
        assert!(err.to_string().contains("Gas/Vapor"));
        assert!(err.source().is_some());
    }

    #[test]
    fn core_error_conversion() {
        let err: SizingError = CoreError::NonFinite {
            what: "area",
            value: f64::NAN,
        }
        .into();
        assert_eq!(err, SizingError::NonFinite { what: "area" });
    }
}

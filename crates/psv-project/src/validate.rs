//! Sizing case validation logic.

use crate::schema::SizingCase;
use psv_sizing::{Accumulation, CalcMode, ServiceType, SizingCoefficients};

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Missing value: {field} ({context})")]
    Missing { field: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_case(case: &SizingCase) -> Result<(), ValidationError> {
    if case.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: case.version,
        });
    }

    if case.general.tag.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "general.tag".to_string(),
            context: "every case needs a tag".to_string(),
        });
    }

    let service = case.process.service;

    if Accumulation::try_from(case.process.overpressure_pct).is_err() {
        return Err(ValidationError::InvalidValue {
            field: "process.overpressure_pct".to_string(),
            value: case.process.overpressure_pct.to_string(),
            reason: "must be 10, 16 or 21".to_string(),
        });
    }

    match &case.process.mode {
        CalcMode::Sizing { flow } => {
            if !(flow.value.is_finite() && flow.value > 0.0) {
                return Err(ValidationError::InvalidValue {
                    field: "process.flow".to_string(),
                    value: flow.to_string(),
                    reason: "must be positive".to_string(),
                });
            }
        }
        CalcMode::Capacity { orifice, .. } => {
            if orifice.trim().is_empty() {
                return Err(ValidationError::Missing {
                    field: "process.orifice".to_string(),
                    context: "capacity mode".to_string(),
                });
            }
        }
    }

    if let Some(coefficients) = &case.coefficients {
        validate_coefficients(coefficients)?;
    }

    validate_fluid(case, service)?;

    if let Some(ctf) = &case.mechanical.valve.manual_center_to_face
        && !(ctf.inlet_mm > 0.0 && ctf.outlet_mm > 0.0)
    {
        return Err(ValidationError::InvalidValue {
            field: "mechanical.manual_center_to_face".to_string(),
            value: format!("{} / {}", ctf.inlet_mm, ctf.outlet_mm),
            reason: "dimensions must be positive".to_string(),
        });
    }

    Ok(())
}

fn validate_coefficients(coefficients: &SizingCoefficients) -> Result<(), ValidationError> {
    let named = [
        ("kd", coefficients.kd),
        ("kb", coefficients.kb),
        ("kc", coefficients.kc),
        ("kv", coefficients.kv),
        ("ksh", coefficients.ksh),
    ];
    for (name, value) in named {
        if !(value > 0.0 && value <= psv_sizing::input::COEFFICIENT_MAX) {
            return Err(ValidationError::InvalidValue {
                field: format!("coefficients.{name}"),
                value: value.to_string(),
                reason: "must be in (0, 1.2]".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_fluid(case: &SizingCase, service: ServiceType) -> Result<(), ValidationError> {
    let fluid = &case.fluid;
    match (&fluid.name, &fluid.manual) {
        (Some(name), None) => {
            psv_fluids::lookup_fluid(name).map_err(|e| ValidationError::InvalidValue {
                field: "fluid.name".to_string(),
                value: name.clone(),
                reason: e.to_string(),
            })?;
            if service == ServiceType::TwoPhase {
                match fluid.quality {
                    None => {
                        return Err(ValidationError::Missing {
                            field: "fluid.quality".to_string(),
                            context: "two-phase service".to_string(),
                        });
                    }
                    Some(q) if !(0.0..=1.0).contains(&q) => {
                        return Err(ValidationError::InvalidValue {
                            field: "fluid.quality".to_string(),
                            value: q.to_string(),
                            reason: "must be within [0, 1]".to_string(),
                        });
                    }
                    Some(_) => {}
                }
            }
            Ok(())
        }
        (None, Some(manual)) => {
            if let Some(field) = manual.missing_for(service).first() {
                return Err(ValidationError::Missing {
                    field: format!("fluid.manual.{field}"),
                    context: format!("manual {} fluid", service),
                });
            }
            Ok(())
        }
        (Some(_), Some(_)) => Err(ValidationError::InvalidValue {
            field: "fluid".to_string(),
            value: "name + manual".to_string(),
            reason: "give exactly one of name or manual".to_string(),
        }),
        (None, None) => Err(ValidationError::Missing {
            field: "fluid".to_string(),
            context: "a catalog name or manual values".to_string(),
        }),
    }
}

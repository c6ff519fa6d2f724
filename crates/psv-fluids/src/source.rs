//! Fluid property source capability and validation helpers.

use crate::error::{FluidError, FluidResult};
use crate::species::Species;
use crate::state::{PropertySample, StateInput};

/// Capability that evaluates pure-fluid properties at a state.
///
/// Implementations must be thread-safe (Send + Sync) so one source can serve
/// concurrent sizing requests. A source that cannot evaluate a state returns an
/// error instead of a placeholder value.
pub trait PropertySource: Send + Sync {
    /// Get the source name (for debugging/logging).
    fn name(&self) -> &str;

    /// Check if this source can evaluate the given fluid at all.
    fn supports(&self, species: Species) -> bool;

    /// Evaluate properties of `species` at the given state.
    fn lookup(&self, species: Species, input: StateInput) -> FluidResult<PropertySample>;
}

/// Source used when no property backend is configured.
///
/// Every lookup fails with [`FluidError::Unavailable`], which callers treat as
/// "fall back to manual properties".
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSource;

impl PropertySource for UnavailableSource {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn supports(&self, _species: Species) -> bool {
        false
    }

    fn lookup(&self, _species: Species, _input: StateInput) -> FluidResult<PropertySample> {
        Err(FluidError::Unavailable)
    }
}

/// Validation helpers for state inputs and returned samples.
pub(crate) mod validation {
    use super::*;
    use psv_core::units::{Pressure, Temperature};

    /// Ensure pressure is positive and finite.
    pub fn validate_pressure(p: Pressure) -> FluidResult<()> {
        if !p.value.is_finite() || p.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "pressure must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure temperature is positive and finite.
    pub fn validate_temperature(t: Temperature) -> FluidResult<()> {
        if !t.value.is_finite() || t.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "temperature must be positive and finite",
            });
        }
        Ok(())
    }

    /// Ensure vapor quality lies in [0, 1].
    pub fn validate_quality(quality: f64) -> FluidResult<()> {
        if !(0.0..=1.0).contains(&quality) {
            return Err(FluidError::OutOfRange {
                what: "quality must be between 0 and 1",
            });
        }
        Ok(())
    }

    pub fn validate_input(input: &StateInput) -> FluidResult<()> {
        match *input {
            StateInput::PT { p, t } => {
                validate_pressure(p)?;
                validate_temperature(t)
            }
            StateInput::PQ { p, quality } => {
                validate_pressure(p)?;
                validate_quality(quality)
            }
            StateInput::TQ { t, quality } => {
                validate_temperature(t)?;
                validate_quality(quality)
            }
            StateInput::PS { p, s } => {
                validate_pressure(p)?;
                if !s.is_finite() {
                    return Err(FluidError::NonPhysical {
                        what: "entropy must be finite",
                    });
                }
                Ok(())
            }
        }
    }

    /// Ensure the sample a backend produced is physically plausible.
    pub fn validate_sample(sample: &PropertySample) -> FluidResult<()> {
        validate_pressure(sample.p)?;
        validate_temperature(sample.t)?;
        if !sample.rho.value.is_finite() || sample.rho.value <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "density must be positive and finite",
            });
        }
        if !sample.molar_mass.is_finite() || sample.molar_mass <= 0.0 {
            return Err(FluidError::NonPhysical {
                what: "molar mass must be positive and finite",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;
    use psv_core::units::{k, pa};

    #[test]
    fn unavailable_source_always_fails() {
        let source = UnavailableSource;
        assert!(!source.supports(Species::N2));
        let err = source
            .lookup(
                Species::N2,
                StateInput::PT {
                    p: pa(101_325.0),
                    t: k(300.0),
                },
            )
            .unwrap_err();
        assert_eq!(err, FluidError::Unavailable);
    }

    #[test]
    fn validate_positive_pressure() {
        assert!(validate_pressure(pa(101325.0)).is_ok());
        assert!(validate_pressure(pa(-100.0)).is_err());
        assert!(validate_pressure(pa(0.0)).is_err());
        assert!(validate_pressure(pa(f64::NAN)).is_err());
    }

    #[test]
    fn validate_quality_bounds() {
        assert!(validate_quality(0.0).is_ok());
        assert!(validate_quality(1.0).is_ok());
        assert!(validate_quality(1.2).is_err());
        assert!(validate_quality(-0.1).is_err());
    }

    #[test]
    fn validate_input_rejects_non_finite_entropy() {
        let input = StateInput::PS {
            p: pa(500_000.0),
            s: f64::INFINITY,
        };
        assert!(validate_input(&input).is_err());
    }
}

//! CoolProp-based property source.

use crate::error::{FluidError, FluidResult};
use crate::source::{PropertySource, validation};
use crate::species::Species;
use crate::state::{PropertySample, StateInput};
use psv_core::units::{k, kg_per_m3, pa};
use rfluids::prelude::*;
use uom::si::dynamic_viscosity::pascal_second;

/// CoolProp backend for fluid properties.
///
/// Supports the pure fluids of [`Species`]. Thread-safe: rfluids Fluid instances
/// are created per lookup and never shared.
pub struct CoolPropSource {}

impl CoolPropSource {
    /// Create a new CoolProp source.
    pub fn new() -> Self {
        Self {}
    }

    fn fluid_in_state(
        &self,
        pure: Pure,
        first: FluidInput,
        second: FluidInput,
        input: &StateInput,
    ) -> FluidResult<Fluid> {
        Fluid::from(pure)
            .in_state(first, second)
            .map_err(|e| FluidError::Backend {
                message: format!("rfluids error at {} state {:?}: {}", input.label(), input, e),
            })
    }

    /// Read the properties of an already-updated backend state.
    fn sample(&self, species: Species, fluid: &mut Fluid) -> FluidResult<PropertySample> {
        let p_pa = fluid.pressure().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting pressure: {}", e),
        })?;
        let t_k = fluid.temperature().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting temperature: {}", e),
        })?;
        let rho = fluid.density().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting density: {}", e),
        })?;
        let s = fluid.entropy().map_err(|e| FluidError::Backend {
            message: format!("rfluids error getting entropy: {}", e),
        })?;

        // cp and viscosity are undefined inside the dome; leave them empty there.
        let cp = fluid.specific_heat().ok().filter(|cp| cp.is_finite() && *cp > 0.0);

        let cv = fluid
            .specific_heat_const_volume()
            .ok()
            .filter(|cv| cv.is_finite() && *cv > 0.0)
            .or_else(|| mayer_cv(cp?, p_pa, rho, t_k));

        let viscosity = fluid
            .dynamic_viscosity()
            .ok()
            .filter(|mu| mu.is_finite() && *mu > 0.0)
            .map(uom::si::f64::DynamicViscosity::new::<pascal_second>);

        Ok(PropertySample {
            p: pa(p_pa),
            t: k(t_k),
            rho: kg_per_m3(rho),
            s,
            molar_mass: species.molar_mass(),
            cp,
            cv,
            viscosity,
        })
    }
}

/// cv from `cp - p/(rho*T)`, only used when the backend has no Cvmass.
///
/// Exact for an ideal gas; underestimates k well away from it.
fn mayer_cv(cp: f64, p_pa: f64, rho: f64, t_k: f64) -> Option<f64> {
    let cv = cp - p_pa / (rho * t_k);
    (cv.is_finite() && cv > 0.0).then_some(cv)
}

impl Default for CoolPropSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertySource for CoolPropSource {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn supports(&self, _species: Species) -> bool {
        true
    }

    fn lookup(&self, species: Species, input: StateInput) -> FluidResult<PropertySample> {
        validation::validate_input(&input)?;

        let pure = species.rfluids_pure();
        let (first, second) = match input {
            StateInput::PT { p, t } => (
                FluidInput::pressure(p.value),
                FluidInput::temperature(t.value),
            ),
            StateInput::PQ { p, quality } => (
                FluidInput::pressure(p.value),
                FluidInput::quality(quality),
            ),
            StateInput::TQ { t, quality } => (
                FluidInput::temperature(t.value),
                FluidInput::quality(quality),
            ),
            StateInput::PS { p, s } => (FluidInput::pressure(p.value), FluidInput::entropy(s)),
        };

        let mut fluid = self.fluid_in_state(pure, first, second, &input)?;
        let sample = self.sample(species, &mut fluid)?;
        validation::validate_sample(&sample)?;
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_name() {
        let source = CoolPropSource::new();
        assert_eq!(source.name(), "CoolProp");
    }

    #[test]
    fn supports_every_catalog_species() {
        let source = CoolPropSource::new();
        assert!(Species::ALL.iter().all(|s| source.supports(*s)));
    }

    #[test]
    fn mayer_fallback_matches_ideal_air() {
        // p/(rho*T) is R_specific for air at ambient
        let cv = mayer_cv(1_005.0, 101_325.0, 1.225, 288.15).unwrap();
        assert!((cv - 718.0).abs() < 1.0, "cv = {cv}");
        assert!(mayer_cv(100.0, 101_325.0, 1.225, 288.15).is_none());
    }

    #[test]
    fn rejects_invalid_input_before_backend_call() {
        let source = CoolPropSource::new();
        let result = source.lookup(
            Species::N2,
            StateInput::PQ {
                p: pa(500_000.0),
                quality: 1.5,
            },
        );
        assert!(matches!(result, Err(FluidError::OutOfRange { .. })));
    }
}

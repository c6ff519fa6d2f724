//! Fluid property resolution: canonical property record for sizing.
//!
//! A [`FluidProperties`] record comes either from a [`PropertySource`] evaluated
//! at the relieving state, or straight from manual entry.

use crate::error::{FluidError, FluidResult};
use crate::source::PropertySource;
use crate::species::Species;
use crate::state::StateInput;
use psv_core::ensure_positive;
use psv_core::units::{Pressure, Temperature, pa};
use serde::{Deserialize, Serialize};
use uom::si::dynamic_viscosity::centipoise;
use uom::si::pressure::kilopascal;

/// Heat capacity ratio used when cp/cv cannot be evaluated at the state.
pub const FALLBACK_K: f64 = 1.01;

/// Pressure fraction of the isentropic expansion state used for omega.
const OMEGA_EXPANSION_RATIO: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyOrigin {
    Source,
    Manual,
}

/// Canonical fluid properties consumed by the sizing calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidProperties {
    /// Molecular weight [g/mol]
    pub molecular_weight: f64,
    /// Specific-heat ratio cp/cv
    pub k: f64,
    /// Compressibility factor
    pub z: f64,
    /// Density at the relieving state [kg/m³]
    pub density: f64,
    /// Dynamic viscosity [cP]
    pub viscosity_cp: f64,
    /// Two-phase omega parameter
    pub omega: Option<f64>,
    /// Saturation pressure at the relieving temperature [kPa abs]
    pub vapor_pressure_kpa_abs: Option<f64>,
    pub origin: PropertyOrigin,
    /// True when `k` is [`FALLBACK_K`] because cp/cv was undefined.
    #[serde(default)]
    pub k_defaulted: bool,
}

impl FluidProperties {
    /// Specific gravity relative to water at 1000 kg/m³.
    pub fn specific_gravity(&self) -> f64 {
        self.density / 1000.0
    }

    /// Inlet specific volume [m³/kg].
    pub fn specific_volume(&self) -> f64 {
        1.0 / self.density
    }

    /// Build a record from caller-supplied values without consulting any source.
    pub fn manual(values: &ManualProperties) -> FluidResult<Self> {
        let finite = [
            values.molecular_weight,
            values.k,
            values.z,
            values.specific_gravity,
            values.viscosity_cp,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(FluidError::NonPhysical {
                what: "manual properties must be finite",
            });
        }
        let density = ensure_positive(
            values
                .inlet_density
                .unwrap_or(values.specific_gravity * 1000.0),
            "density",
        )?;
        if values.omega.is_some_and(|w| !w.is_finite()) {
            return Err(FluidError::NonPhysical {
                what: "omega must be finite",
            });
        }

        Ok(Self {
            molecular_weight: values.molecular_weight,
            k: values.k,
            z: values.z,
            density,
            viscosity_cp: values.viscosity_cp,
            omega: values.omega,
            vapor_pressure_kpa_abs: values.vapor_pressure_kpa_abs,
            origin: PropertyOrigin::Manual,
            k_defaulted: false,
        })
    }
}

/// Values entered by hand for fluids outside the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualProperties {
    pub molecular_weight: f64,
    pub k: f64,
    pub z: f64,
    pub specific_gravity: f64,
    pub viscosity_cp: f64,
    #[serde(default)]
    pub omega: Option<f64>,
    /// Two-phase inlet density [kg/m³]; overrides `specific_gravity` when set.
    #[serde(default)]
    pub inlet_density: Option<f64>,
    #[serde(default)]
    pub vapor_pressure_kpa_abs: Option<f64>,
}

impl Default for ManualProperties {
    fn default() -> Self {
        Self {
            molecular_weight: 44.0,
            k: 1.3,
            z: 0.95,
            specific_gravity: 1.0,
            viscosity_cp: 1.0,
            omega: None,
            inlet_density: None,
            vapor_pressure_kpa_abs: None,
        }
    }
}

/// How the relieving fluid is modeled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PhaseModel {
    SinglePhase,
    TwoPhase { quality: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolveRequest {
    pub species: Species,
    pub t: Temperature,
    /// Absolute relieving pressure.
    pub p_abs: Pressure,
    pub phase: PhaseModel,
    /// Also look up the saturation pressure at `t` (liquid service).
    pub vapor_pressure: bool,
}

/// Resolve canonical properties for a catalog fluid from a property source.
pub fn resolve(source: &dyn PropertySource, request: &ResolveRequest) -> FluidResult<FluidProperties> {
    tracing::debug!(source = source.name(), fluid = %request.species, "resolving fluid properties");

    let mut props = match request.phase {
        PhaseModel::SinglePhase => resolve_single_phase(source, request)?,
        PhaseModel::TwoPhase { quality } => resolve_two_phase(source, request, quality)?,
    };

    if request.vapor_pressure {
        props.vapor_pressure_kpa_abs = saturation_pressure_kpa(source, request);
    }

    Ok(props)
}

fn resolve_single_phase(
    source: &dyn PropertySource,
    request: &ResolveRequest,
) -> FluidResult<FluidProperties> {
    let sample = source.lookup(
        request.species,
        StateInput::PT {
            p: request.p_abs,
            t: request.t,
        },
    )?;

    let (k, k_defaulted) = match sample.gamma().filter(|g| *g > 1.0) {
        Some(gamma) => (gamma, false),
        None => {
            tracing::warn!(
                fluid = %request.species,
                t_k = request.t.value,
                p_pa = request.p_abs.value,
                "cp/cv undefined at state, using k = {FALLBACK_K}"
            );
            (FALLBACK_K, true)
        }
    };

    Ok(FluidProperties {
        molecular_weight: sample.molar_mass,
        k,
        z: sample.compressibility(),
        density: sample.rho.value,
        viscosity_cp: sample.viscosity.map(|mu| mu.get::<centipoise>()).unwrap_or(0.0),
        omega: None,
        vapor_pressure_kpa_abs: None,
        origin: PropertyOrigin::Source,
        k_defaulted,
    })
}

/// Omega from the saturation state at `quality` and the isentropic state at
/// 90 % of the same absolute pressure: `omega = 9 * (v_0.9 / v_sat - 1)`.
fn resolve_two_phase(
    source: &dyn PropertySource,
    request: &ResolveRequest,
    quality: f64,
) -> FluidResult<FluidProperties> {
    let saturated = source.lookup(
        request.species,
        StateInput::PQ {
            p: request.p_abs,
            quality,
        },
    )?;
    let expanded = source.lookup(
        request.species,
        StateInput::PS {
            p: pa(request.p_abs.value * OMEGA_EXPANSION_RATIO),
            s: saturated.s,
        },
    )?;

    let v_sat = saturated.specific_volume();
    let v_expanded = expanded.specific_volume();
    let omega = 9.0 * (v_expanded / v_sat - 1.0);
    if !omega.is_finite() {
        return Err(FluidError::NonPhysical {
            what: "omega parameter is not finite",
        });
    }

    tracing::debug!(
        fluid = %request.species,
        quality,
        v_sat,
        v_expanded,
        omega,
        "two-phase omega resolved"
    );

    let gamma = saturated.gamma().filter(|g| *g > 1.0);
    Ok(FluidProperties {
        molecular_weight: saturated.molar_mass,
        k: gamma.unwrap_or(FALLBACK_K),
        z: saturated.compressibility(),
        density: saturated.rho.value,
        viscosity_cp: 0.0,
        omega: Some(omega),
        vapor_pressure_kpa_abs: None,
        origin: PropertyOrigin::Source,
        k_defaulted: gamma.is_none(),
    })
}

fn saturation_pressure_kpa(source: &dyn PropertySource, request: &ResolveRequest) -> Option<f64> {
    match source.lookup(
        request.species,
        StateInput::TQ {
            t: request.t,
            quality: 0.0,
        },
    ) {
        Ok(sample) => Some(sample.p.get::<kilopascal>()),
        Err(err) => {
            tracing::debug!(fluid = %request.species, %err, "no saturation pressure at temperature");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::UnavailableSource;
    use crate::state::PropertySample;
    use crate::tabulated::{TabulatedEntry, TabulatedSource};
    use approx::assert_relative_eq;
    use psv_core::units::{k, kg_per_m3};

    fn air_request() -> ResolveRequest {
        ResolveRequest {
            species: Species::Air,
            t: k(423.15),
            p_abs: pa(1_201_325.0),
            phase: PhaseModel::SinglePhase,
            vapor_pressure: false,
        }
    }

    #[test]
    fn single_phase_from_table() {
        let table = TabulatedSource::ideal_gases();
        let props = resolve(&table, &air_request()).unwrap();
        assert_eq!(props.origin, PropertyOrigin::Source);
        assert_relative_eq!(props.molecular_weight, 28.965);
        assert_relative_eq!(props.z, 1.0, max_relative = 1e-12);
        assert_relative_eq!(props.k, 1.4, max_relative = 0.01);
        assert!(!props.k_defaulted);
        assert!(props.viscosity_cp > 0.0);
    }

    #[test]
    fn unavailable_source_is_reported() {
        let err = resolve(&UnavailableSource, &air_request()).unwrap_err();
        assert_eq!(err, FluidError::Unavailable);
    }

    #[test]
    fn unsupported_fluid_is_reported() {
        let table = TabulatedSource::ideal_gases();
        let request = ResolveRequest {
            species: Species::R134a,
            ..air_request()
        };
        assert!(matches!(
            resolve(&table, &request),
            Err(FluidError::NotSupported { .. })
        ));
    }

    /// Source whose samples have no cv, as happens close to a phase boundary.
    struct NoCvSource;

    impl PropertySource for NoCvSource {
        fn name(&self) -> &str {
            "no-cv"
        }

        fn supports(&self, _species: Species) -> bool {
            true
        }

        fn lookup(&self, species: Species, input: StateInput) -> FluidResult<PropertySample> {
            let StateInput::PT { p, t } = input else {
                return Err(FluidError::NotSupported { what: "PT only" });
            };
            Ok(PropertySample {
                p,
                t,
                rho: kg_per_m3(5.0),
                s: 0.0,
                molar_mass: species.molar_mass(),
                cp: Some(2_000.0),
                cv: None,
                viscosity: None,
            })
        }
    }

    #[test]
    fn undefined_heat_capacity_ratio_falls_back() {
        let props = resolve(&NoCvSource, &air_request()).unwrap();
        assert_eq!(props.k, FALLBACK_K);
        assert!(props.k_defaulted);
        assert_eq!(props.viscosity_cp, 0.0);
    }

    /// Saturated mixture whose reported cp is below cv.
    struct SubunityGammaSource;

    impl PropertySource for SubunityGammaSource {
        fn name(&self) -> &str {
            "subunity-gamma"
        }

        fn supports(&self, _species: Species) -> bool {
            true
        }

        fn lookup(&self, species: Species, input: StateInput) -> FluidResult<PropertySample> {
            let (p, rho) = match input {
                StateInput::PQ { p, .. } => (p, 50.0),
                StateInput::PS { p, .. } => (p, 40.0),
                _ => return Err(FluidError::NotSupported { what: "PQ and PS only" }),
            };
            Ok(PropertySample {
                p,
                t: k(450.0),
                rho: kg_per_m3(rho),
                s: 2_000.0,
                molar_mass: species.molar_mass(),
                cp: Some(1_000.0),
                cv: Some(1_200.0),
                viscosity: None,
            })
        }
    }

    #[test]
    fn two_phase_flags_replaced_subunity_gamma() {
        let request = ResolveRequest {
            species: Species::H2O,
            phase: PhaseModel::TwoPhase { quality: 0.2 },
            ..air_request()
        };
        let props = resolve(&SubunityGammaSource, &request).unwrap();
        assert_eq!(props.k, FALLBACK_K);
        assert!(props.k_defaulted);
        assert_relative_eq!(props.omega.unwrap(), 9.0 * (50.0 / 40.0 - 1.0));
    }

    #[test]
    fn two_phase_requires_saturation_support() {
        let table = TabulatedSource::ideal_gases();
        let request = ResolveRequest {
            phase: PhaseModel::TwoPhase { quality: 0.1 },
            ..air_request()
        };
        assert!(matches!(
            resolve(&table, &request),
            Err(FluidError::NotSupported { .. })
        ));
    }

    #[test]
    fn vapor_pressure_is_optional() {
        let table = TabulatedSource::new().with(
            Species::H2O,
            TabulatedEntry::Liquid {
                density: 998.0,
                cp: 4_182.0,
                viscosity_pa_s: 1.0e-3,
                vapor_pressure_pa: Some(3_170.0),
            },
        );
        let request = ResolveRequest {
            species: Species::H2O,
            t: k(298.15),
            p_abs: pa(601_325.0),
            phase: PhaseModel::SinglePhase,
            vapor_pressure: true,
        };
        let props = resolve(&table, &request).unwrap();
        assert_relative_eq!(props.vapor_pressure_kpa_abs.unwrap(), 3.17);
        assert_relative_eq!(props.specific_gravity(), 0.998);
        assert_relative_eq!(props.viscosity_cp, 1.0, max_relative = 1e-9);
    }

    #[test]
    fn manual_entry_bypasses_source() {
        let props = FluidProperties::manual(&ManualProperties::default()).unwrap();
        assert_eq!(props.origin, PropertyOrigin::Manual);
        assert_relative_eq!(props.density, 1000.0);
        assert_relative_eq!(props.k, 1.3);
    }

    #[test]
    fn manual_two_phase_uses_inlet_density() {
        let values = ManualProperties {
            omega: Some(1.0),
            inlet_density: Some(500.0),
            ..ManualProperties::default()
        };
        let props = FluidProperties::manual(&values).unwrap();
        assert_relative_eq!(props.density, 500.0);
        assert_relative_eq!(props.specific_volume(), 0.002);
        assert_eq!(props.omega, Some(1.0));
    }

    #[test]
    fn manual_entry_rejects_nan() {
        let values = ManualProperties {
            k: f64::NAN,
            ..ManualProperties::default()
        };
        assert!(FluidProperties::manual(&values).is_err());
    }

    #[test]
    fn manual_entry_rejects_zero_density() {
        let values = ManualProperties {
            specific_gravity: 0.0,
            ..ManualProperties::default()
        };
        assert_eq!(
            FluidProperties::manual(&values),
            Err(FluidError::InvalidArg { what: "density" })
        );
    }
}

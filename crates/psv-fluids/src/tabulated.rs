//! Table-backed property source with frozen heat capacities.
//!
//! Gases follow the ideal-gas law with a constant cp; liquids are treated as
//! incompressible. The table is useful when no equation-of-state backend is
//! installed and as a deterministic source in tests. It is NOT a replacement for
//! CoolProp near saturation: two-phase lookups (`PQ`) are not supported.

use crate::error::{FluidError, FluidResult};
use crate::source::{PropertySource, validation};
use crate::species::Species;
use crate::state::{PropertySample, StateInput};
use psv_core::constants::R_UNIVERSAL;
use psv_core::units::{DynVisc, Pressure, k, kg_per_m3, pa};
use std::collections::HashMap;
use uom::si::dynamic_viscosity::pascal_second;

/// Reference state for the entropy datum (s = 0).
const T_REF_K: f64 = 298.15;
const P_REF_PA: f64 = 101_325.0;

/// One tabulated fluid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TabulatedEntry {
    /// Ideal gas with frozen cp [J/(kg·K)] and viscosity [Pa·s].
    IdealGas { cp: f64, viscosity_pa_s: f64 },
    /// Incompressible liquid with optional vapor pressure [Pa] at service temperature.
    Liquid {
        density: f64,
        cp: f64,
        viscosity_pa_s: f64,
        vapor_pressure_pa: Option<f64>,
    },
}

#[derive(Debug, Clone, Default)]
pub struct TabulatedSource {
    entries: HashMap<Species, TabulatedEntry>,
}

impl TabulatedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Common relief-service gases at near-ambient cp.
    pub fn ideal_gases() -> Self {
        let gases = [
            (Species::Air, 1_005.0, 1.85e-5),
            (Species::N2, 1_040.0, 1.76e-5),
            (Species::O2, 918.0, 2.04e-5),
            (Species::CO2, 844.0, 1.47e-5),
            (Species::CH4, 2_220.0, 1.10e-5),
            (Species::H2, 14_300.0, 0.88e-5),
            (Species::He, 5_193.0, 1.96e-5),
            (Species::Ar, 520.0, 2.23e-5),
            (Species::Propane, 1_670.0, 0.80e-5),
        ];
        gases
            .into_iter()
            .fold(Self::new(), |table, (species, cp, viscosity_pa_s)| {
                table.with(species, TabulatedEntry::IdealGas { cp, viscosity_pa_s })
            })
    }

    pub fn with(mut self, species: Species, entry: TabulatedEntry) -> Self {
        self.entries.insert(species, entry);
        self
    }

    pub fn entry(&self, species: Species) -> Option<&TabulatedEntry> {
        self.entries.get(&species)
    }

    fn ideal_gas_sample(
        &self,
        species: Species,
        cp: f64,
        viscosity_pa_s: f64,
        p: Pressure,
        t_k: f64,
    ) -> PropertySample {
        let mw = species.molar_mass();
        let r_specific = R_UNIVERSAL / mw;
        let s = cp * (t_k / T_REF_K).ln() - r_specific * (p.value / P_REF_PA).ln();
        PropertySample {
            p,
            t: k(t_k),
            rho: kg_per_m3(p.value / (r_specific * t_k)),
            s,
            molar_mass: mw,
            cp: Some(cp),
            cv: Some(cp - r_specific),
            viscosity: Some(DynVisc::new::<pascal_second>(viscosity_pa_s)),
        }
    }
}

impl PropertySource for TabulatedSource {
    fn name(&self) -> &str {
        "tabulated"
    }

    fn supports(&self, species: Species) -> bool {
        self.entries.contains_key(&species)
    }

    fn lookup(&self, species: Species, input: StateInput) -> FluidResult<PropertySample> {
        validation::validate_input(&input)?;

        let entry = self.entries.get(&species).ok_or(FluidError::NotSupported {
            what: "fluid not present in property table",
        })?;

        let sample = match (*entry, input) {
            (TabulatedEntry::IdealGas { cp, viscosity_pa_s }, StateInput::PT { p, t }) => {
                self.ideal_gas_sample(species, cp, viscosity_pa_s, p, t.value)
            }
            (TabulatedEntry::IdealGas { cp, viscosity_pa_s }, StateInput::PS { p, s }) => {
                // Invert s(T, p) of the frozen-cp ideal gas.
                let r_specific = R_UNIVERSAL / species.molar_mass();
                let t_k = T_REF_K * ((s + r_specific * (p.value / P_REF_PA).ln()) / cp).exp();
                self.ideal_gas_sample(species, cp, viscosity_pa_s, p, t_k)
            }
            (
                TabulatedEntry::Liquid {
                    density,
                    cp,
                    viscosity_pa_s,
                    ..
                },
                StateInput::PT { p, t },
            ) => PropertySample {
                p,
                t,
                rho: kg_per_m3(density),
                s: cp * (t.value / T_REF_K).ln(),
                molar_mass: species.molar_mass(),
                cp: Some(cp),
                cv: Some(cp),
                viscosity: Some(DynVisc::new::<pascal_second>(viscosity_pa_s)),
            },
            (
                TabulatedEntry::Liquid {
                    density,
                    cp,
                    viscosity_pa_s,
                    vapor_pressure_pa: Some(p_vap),
                },
                StateInput::TQ { t, quality },
            ) if quality == 0.0 => PropertySample {
                p: pa(p_vap),
                t,
                rho: kg_per_m3(density),
                s: cp * (t.value / T_REF_K).ln(),
                molar_mass: species.molar_mass(),
                cp: Some(cp),
                cv: Some(cp),
                viscosity: Some(DynVisc::new::<pascal_second>(viscosity_pa_s)),
            },
            _ => {
                return Err(FluidError::NotSupported {
                    what: "state kind not available from property table",
                });
            }
        };

        validation::validate_sample(&sample)?;
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn air_density_matches_ideal_gas_law() {
        let table = TabulatedSource::ideal_gases();
        let sample = table
            .lookup(
                Species::Air,
                StateInput::PT {
                    p: pa(101_325.0),
                    t: k(288.15),
                },
            )
            .unwrap();
        assert_relative_eq!(sample.rho.value, 1.225, max_relative = 0.01);
        assert_relative_eq!(sample.compressibility(), 1.0, max_relative = 1e-12);
        assert_relative_eq!(sample.gamma().unwrap(), 1.4, max_relative = 0.01);
    }

    #[test]
    fn isentropic_lookup_inverts_entropy() {
        let table = TabulatedSource::ideal_gases();
        let start = table
            .lookup(
                Species::N2,
                StateInput::PT {
                    p: pa(1.0e6),
                    t: k(400.0),
                },
            )
            .unwrap();
        let back = table
            .lookup(Species::N2, StateInput::PS { p: pa(1.0e6), s: start.s })
            .unwrap();
        assert_relative_eq!(back.t.value, 400.0, max_relative = 1e-9);
    }

    #[test]
    fn saturation_lookups_are_not_supported() {
        let table = TabulatedSource::ideal_gases();
        let result = table.lookup(
            Species::N2,
            StateInput::PQ {
                p: pa(1.0e6),
                quality: 0.5,
            },
        );
        assert!(matches!(result, Err(FluidError::NotSupported { .. })));
    }

    #[test]
    fn liquid_reports_tabulated_vapor_pressure() {
        let table = TabulatedSource::new().with(
            Species::H2O,
            TabulatedEntry::Liquid {
                density: 998.0,
                cp: 4_182.0,
                viscosity_pa_s: 1.0e-3,
                vapor_pressure_pa: Some(3_170.0),
            },
        );
        let sat = table
            .lookup(
                Species::H2O,
                StateInput::TQ {
                    t: k(298.15),
                    quality: 0.0,
                },
            )
            .unwrap();
        assert_relative_eq!(sat.p.value, 3_170.0);
    }

    #[test]
    fn unknown_species_is_not_supported() {
        let table = TabulatedSource::ideal_gases();
        assert!(!table.supports(Species::R134a));
    }
}

//! State specifications and the raw property record a source returns.

use psv_core::constants::R_UNIVERSAL;
use psv_core::units::{Density, DynVisc, Pressure, Temperature};

/// Specific entropy [J/(kg·K)].
///
/// Not part of uom's standard set, so we use f64 with clear documentation.
pub type SpecEntropy = f64;

/// Specific heat capacity [J/(kg·K)].
pub type SpecHeatCapacity = f64;

/// Input specification for a property lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateInput {
    /// Pressure and temperature.
    PT { p: Pressure, t: Temperature },
    /// Pressure and vapor quality (saturation state).
    PQ { p: Pressure, quality: f64 },
    /// Temperature and vapor quality (saturation state).
    TQ { t: Temperature, quality: f64 },
    /// Pressure and specific entropy.
    PS { p: Pressure, s: SpecEntropy },
}

impl StateInput {
    pub fn label(&self) -> &'static str {
        match self {
            Self::PT { .. } => "P-T",
            Self::PQ { .. } => "P-Q",
            Self::TQ { .. } => "T-Q",
            Self::PS { .. } => "P-s",
        }
    }
}

/// Properties evaluated by a [`crate::PropertySource`] at one state.
///
/// Heat capacities and viscosity are optional: backends may be unable to
/// evaluate them near a phase boundary even when the state itself exists.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySample {
    /// Pressure [Pa]
    pub p: Pressure,
    /// Temperature [K]
    pub t: Temperature,
    /// Density [kg/m³]
    pub rho: Density,
    /// Specific entropy [J/(kg·K)]
    pub s: SpecEntropy,
    /// Molar mass [kg/kmol]
    pub molar_mass: f64,
    /// Specific heat at constant pressure [J/(kg·K)]
    pub cp: Option<SpecHeatCapacity>,
    /// Specific heat at constant volume [J/(kg·K)]
    pub cv: Option<SpecHeatCapacity>,
    /// Dynamic viscosity [Pa·s]
    pub viscosity: Option<DynVisc>,
}

impl PropertySample {
    /// Compressibility factor Z = p·M / (ρ·R·T).
    pub fn compressibility(&self) -> f64 {
        self.p.value * self.molar_mass / (self.rho.value * R_UNIVERSAL * self.t.value)
    }

    /// Heat capacity ratio cp/cv, when both are known and the ratio is finite.
    pub fn gamma(&self) -> Option<f64> {
        let (cp, cv) = (self.cp?, self.cv?);
        let gamma = cp / cv;
        (gamma.is_finite() && cv > 0.0).then_some(gamma)
    }

    /// Specific volume [m³/kg].
    pub fn specific_volume(&self) -> f64 {
        1.0 / self.rho.value
    }
}

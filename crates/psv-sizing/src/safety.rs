//! Reaction force, noise and liquid-service flags.
//!
//! Everything here is advisory: a missing input yields `None` plus a note,
//! never an error that would hide a valid area.

use crate::error::{CalcResult, SizingError};
use crate::input::ServiceType;
use psv_core::constants::{KPA_PER_BAR, SECONDS_PER_HOUR};
use psv_fluids::FluidProperties;
use serde::Serialize;

/// Fraction of the set-to-vapor pressure span beyond which a liquid cavitates.
pub const CAVITATION_FACTOR: f64 = 0.6;

/// `F = 1.29·W·sqrt(k·T/((k+1)·M))` [N], W in kg/s.
pub fn reaction_force_gas(w_kg_s: f64, k: f64, temperature_k: f64, molecular_weight: f64) -> CalcResult<f64> {
    if k <= 1.0 || molecular_weight <= 0.0 || temperature_k <= 0.0 {
        return Err(SizingError::InvalidProperty {
            what: "reaction force needs k > 1, positive Mw and temperature",
        });
    }
    let force = 1.29 * w_kg_s * (k * temperature_k / ((k + 1.0) * molecular_weight)).sqrt();
    finite(force, "gas reaction force")
}

/// `F = W²/(ρ·A)` [N], W in kg/s and A in mm².
pub fn reaction_force_liquid(w_kg_s: f64, density: f64, area_mm2: f64) -> CalcResult<f64> {
    if density <= 0.0 || area_mm2 <= 0.0 {
        return Err(SizingError::InvalidProperty {
            what: "reaction force needs positive density and area",
        });
    }
    finite(w_kg_s * w_kg_s / (density * area_mm2 * 1.0e-6), "liquid reaction force")
}

/// `dBA = 12 + 17·log10(W) + 50·log10(P_set)`, W in kg/s and P_set in barg.
///
/// `None` when either logarithm argument is not positive.
pub fn noise_dba(w_kg_s: f64, set_pressure_barg: f64) -> Option<f64> {
    if !(w_kg_s > 0.0 && set_pressure_barg > 0.0) {
        return None;
    }
    let dba = 12.0 + 17.0 * w_kg_s.log10() + 50.0 * set_pressure_barg.log10();
    dba.is_finite().then_some(dba)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LiquidFlags {
    pub flashing: bool,
    pub cavitation: bool,
}

/// Flashing when back pressure is below vapor pressure; cavitation when the
/// pressure drop exceeds 60 % of the set-to-vapor span. All absolute kPa.
pub fn liquid_flags(set_kpa_abs: f64, back_kpa_abs: f64, vapor_kpa_abs: f64) -> LiquidFlags {
    LiquidFlags {
        flashing: back_kpa_abs < vapor_kpa_abs,
        cavitation: (set_kpa_abs - back_kpa_abs) > CAVITATION_FACTOR * (set_kpa_abs - vapor_kpa_abs),
    }
}

/// Inputs for [`assess`].
#[derive(Debug, Clone, Copy)]
pub struct SafetyInputs<'a> {
    pub service: ServiceType,
    /// Relieved or rated mass flow [kg/h].
    pub w_kg_h: f64,
    pub properties: &'a FluidProperties,
    pub temperature_k: f64,
    pub set_pressure_kpag: f64,
    pub set_pressure_kpa_abs: f64,
    pub back_pressure_kpa_abs: f64,
    /// Selected orifice area [mm²].
    pub orifice_area_mm2: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SafetyMetrics {
    pub reaction_force_n: Option<f64>,
    pub noise_dba: Option<f64>,
    pub flashing: Option<bool>,
    pub cavitation: Option<bool>,
    pub notes: Vec<String>,
}

/// Derive the advisory metrics for a finished calculation.
pub fn assess(inputs: &SafetyInputs<'_>) -> SafetyMetrics {
    let props = inputs.properties;
    let w_kg_s = inputs.w_kg_h / SECONDS_PER_HOUR;
    let mut metrics = SafetyMetrics::default();

    match inputs.service {
        ServiceType::GasVapor | ServiceType::Steam => {
            match reaction_force_gas(w_kg_s, props.k, inputs.temperature_k, props.molecular_weight) {
                Ok(force) => metrics.reaction_force_n = Some(force),
                Err(err) => metrics.notes.push(format!("Reaction force not evaluated: {err}")),
            }
            metrics.noise_dba = noise_dba(w_kg_s, inputs.set_pressure_kpag / KPA_PER_BAR);
            if metrics.noise_dba.is_none() {
                metrics.notes.push("Noise estimate not evaluated".to_string());
            }
        }
        ServiceType::Liquid => {
            match reaction_force_liquid(w_kg_s, props.density, inputs.orifice_area_mm2) {
                Ok(force) => metrics.reaction_force_n = Some(force),
                Err(err) => metrics.notes.push(format!("Reaction force not evaluated: {err}")),
            }
            match props.vapor_pressure_kpa_abs {
                Some(p_vap) if p_vap.is_finite() => {
                    let flags = liquid_flags(
                        inputs.set_pressure_kpa_abs,
                        inputs.back_pressure_kpa_abs,
                        p_vap,
                    );
                    if flags.flashing {
                        metrics.notes.push("Flashing: back pressure below vapor pressure".to_string());
                    }
                    if flags.cavitation {
                        metrics.notes.push("Cavitation likely across the valve".to_string());
                    }
                    metrics.flashing = Some(flags.flashing);
                    metrics.cavitation = Some(flags.cavitation);
                }
                _ => metrics
                    .notes
                    .push("Vapor pressure unknown; flashing/cavitation not checked".to_string()),
            }
        }
        ServiceType::TwoPhase => {}
    }

    metrics
}

fn finite(value: f64, what: &'static str) -> CalcResult<f64> {
    psv_core::ensure_finite(value, what).map_err(SizingError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use psv_fluids::ManualProperties;

    #[test]
    fn gas_reaction_force() {
        let f = reaction_force_gas(1.0, 1.3, 423.15, 44.0).unwrap();
        let expected = 1.29 * (1.3 * 423.15 / (2.3 * 44.0_f64)).sqrt();
        assert_relative_eq!(f, expected);
        assert!(reaction_force_gas(1.0, 1.0, 423.15, 44.0).is_err());
    }

    #[test]
    fn liquid_reaction_force_uses_square_metres() {
        // 10 kg/s of water through 1000 mm²
        let f = reaction_force_liquid(10.0, 1000.0, 1000.0).unwrap();
        assert_relative_eq!(f, 100.0);
        assert!(reaction_force_liquid(10.0, 0.0, 1000.0).is_err());
    }

    #[test]
    fn noise_guards_logarithms() {
        assert_relative_eq!(noise_dba(1.0, 10.0).unwrap(), 62.0);
        assert!(noise_dba(0.0, 10.0).is_none());
        assert!(noise_dba(1.0, -1.0).is_none());
    }

    #[test]
    fn liquid_flags_thresholds() {
        // set 601.325, back 101.325 kPa abs
        let cold = liquid_flags(601.325, 101.325, 3.17);
        assert!(!cold.flashing);
        assert!(cold.cavitation, "500 > 0.6 * 598");

        let hot = liquid_flags(601.325, 101.325, 200.0);
        assert!(hot.flashing);

        let small_drop = liquid_flags(601.325, 501.325, 3.17);
        assert!(!small_drop.cavitation);
    }

    #[test]
    fn liquid_without_vapor_pressure_skips_flags() {
        let props = FluidProperties::manual(&ManualProperties::default()).unwrap();
        let metrics = assess(&SafetyInputs {
            service: ServiceType::Liquid,
            w_kg_h: 36_000.0,
            properties: &props,
            temperature_k: 300.0,
            set_pressure_kpag: 500.0,
            set_pressure_kpa_abs: 601.325,
            back_pressure_kpa_abs: 101.325,
            orifice_area_mm2: 1000.0,
        });
        assert_eq!(metrics.flashing, None);
        assert_relative_eq!(metrics.reaction_force_n.unwrap(), 100.0);
        assert!(metrics.notes.iter().any(|n| n.contains("not checked")));
        assert!(metrics.noise_dba.is_none());
    }

    #[test]
    fn two_phase_has_no_metrics() {
        let props = FluidProperties::manual(&ManualProperties {
            omega: Some(1.0),
            ..ManualProperties::default()
        })
        .unwrap();
        let metrics = assess(&SafetyInputs {
            service: ServiceType::TwoPhase,
            w_kg_h: 3600.0,
            properties: &props,
            temperature_k: 400.0,
            set_pressure_kpag: 1000.0,
            set_pressure_kpa_abs: 1101.325,
            back_pressure_kpa_abs: 101.325,
            orifice_area_mm2: 500.0,
        });
        assert_eq!(metrics, SafetyMetrics::default());
    }
}

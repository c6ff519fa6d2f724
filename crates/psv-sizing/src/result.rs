//! Calculation result handed to renderers and history.

use crate::calculator::FlowRegime;
use crate::critical::CriticalRatio;
use crate::error::{CalcResult, SizingError};
use crate::input::{NormalizedConditions, ServiceType, SizingCoefficients};
use crate::mechanical::MechanicalOutcome;
use crate::normalize::{FlowUnit, Measured};
use crate::orifice::OrificeRecord;
use crate::safety::SafetyMetrics;
use crate::spring::SpringLookup;
use psv_fluids::FluidProperties;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Sizing,
    Capacity,
}

/// Mass flow the result is based on, echoed in the caller's unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowFigure {
    pub kg_per_h: f64,
    pub display: Measured<FlowUnit>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizingResult {
    pub service: ServiceType,
    pub mode: ModeKind,
    pub fluid: String,
    pub conditions: NormalizedConditions,
    pub properties: FluidProperties,
    /// Coefficients as applied, Ksh included.
    pub coefficients: SizingCoefficients,
    /// Required flow (sizing) or rated capacity (capacity).
    pub flow: FlowFigure,
    /// Required area [mm²]; `None` in capacity mode.
    pub required_area_mm2: Option<f64>,
    pub orifice: OrificeRecord,
    pub mechanical: MechanicalOutcome,
    pub spring: SpringLookup,
    pub safety: SafetyMetrics,
    pub gas_constant: Option<f64>,
    pub kn: Option<f64>,
    pub critical: Option<CriticalRatio>,
    pub flow_regime: Option<FlowRegime>,
    pub sizing_basis: &'static str,
    pub formula: &'static str,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
}

impl SizingResult {
    /// Joined note line, as printed on a datasheet.
    pub fn note_line(&self) -> String {
        self.notes.join(" | ")
    }

    /// Fail if any number a renderer would show is NaN or infinite.
    pub fn ensure_finite(&self) -> CalcResult<()> {
        let c = &self.conditions;
        let p = &self.properties;
        let mut checks: Vec<(f64, &'static str)> = vec![
            (c.set_pressure_kpag, "set pressure"),
            (c.back_pressure_kpag, "back pressure"),
            (c.relieving_pressure_kpa_abs, "relieving pressure"),
            (c.temperature_k, "temperature"),
            (p.molecular_weight, "molecular weight"),
            (p.k, "k"),
            (p.z, "Z"),
            (p.density, "density"),
            (p.viscosity_cp, "viscosity"),
            (self.flow.kg_per_h, "mass flow"),
            (self.flow.display.value, "displayed flow"),
            (self.orifice.area_mm2, "orifice area"),
        ];
        let optional = [
            (self.required_area_mm2, "required area"),
            (p.omega, "omega"),
            (p.vapor_pressure_kpa_abs, "vapor pressure"),
            (self.gas_constant, "gas constant"),
            (self.kn, "Kn"),
            (self.critical.map(|c| c.eta_c), "eta_c"),
            (self.safety.reaction_force_n, "reaction force"),
            (self.safety.noise_dba, "noise"),
            (self.mechanical.center_to_face.map(|d| d.inlet_mm), "inlet center-to-face"),
            (self.mechanical.center_to_face.map(|d| d.outlet_mm), "outlet center-to-face"),
        ];
        checks.extend(optional.into_iter().filter_map(|(v, what)| v.map(|v| (v, what))));
        if let SpringLookup::Found(range) = &self.spring {
            checks.push((range.min_barg, "spring minimum"));
            checks.push((range.max_barg, "spring maximum"));
        }

        for (value, what) in checks {
            psv_core::ensure_finite(value, what).map_err(SizingError::from)?;
        }
        Ok(())
    }
}

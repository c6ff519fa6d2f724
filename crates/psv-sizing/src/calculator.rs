//! Area/capacity calculator.
//!
//! One function per direction, each dispatching exhaustively on
//! [`ServiceType`]. Pressures are absolute kPa, temperature K, flow kg/h and
//! area mm². Sizing and capacity use the same equation rearranged, so a
//! capacity fed back into sizing reproduces the orifice area.

use crate::critical::{CriticalRatio, solve_eta_c};
use crate::error::{CalcResult, SizingError};
use crate::input::{ServiceType, SizingCoefficients};
use psv_core::constants::SECONDS_PER_HOUR;
use psv_fluids::FluidProperties;
use serde::Serialize;

/// Gas sizing constant for SI units (kg/h, kPa, K, mm²).
pub const GAS_EQUATION_CONSTANT: f64 = 13_160.0;
/// Liquid sizing constant for SI units (L/min, kPa, mm²).
pub const LIQUID_EQUATION_CONSTANT: f64 = 11.78;
/// Relieving pressure above which the Napier correction applies [kPa abs].
pub const NAPIER_THRESHOLD_KPA: f64 = 10_443.0;
/// Derating applied to the two-phase mass flux.
pub const TWO_PHASE_DERATING: f64 = 0.9;

/// Conditions the regime equations need, already in base units.
#[derive(Debug, Clone, Copy)]
pub struct RegimeConditions<'a> {
    pub service: ServiceType,
    /// Relieving pressure P1 [kPa abs].
    pub relieving_pressure_kpa_abs: f64,
    /// Total back pressure P2 [kPa abs].
    pub back_pressure_kpa_abs: f64,
    pub temperature_k: f64,
    pub properties: &'a FluidProperties,
    /// Coefficients with the effective Ksh already decided.
    pub coefficients: &'a SizingCoefficients,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FlowRegime {
    Critical,
    Subcritical,
}

/// Result of one regime evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegimeOutcome {
    /// Area [mm²] when sizing, mass flow [kg/h] when rating.
    pub value: f64,
    pub formula: &'static str,
    pub notes: Vec<String>,
    /// Gas constant C (compressible services).
    pub gas_constant: Option<f64>,
    /// Napier factor (steam).
    pub kn: Option<f64>,
    pub critical: Option<CriticalRatio>,
    pub flow_regime: Option<FlowRegime>,
}

impl RegimeOutcome {
    fn new(value: f64, formula: &'static str) -> Self {
        Self {
            value,
            formula,
            notes: Vec::new(),
            gas_constant: None,
            kn: None,
            critical: None,
            flow_regime: None,
        }
    }
}

/// `C = 520·sqrt(k·(2/(k+1))^((k+1)/(k−1)))`
pub fn gas_constant(k: f64) -> CalcResult<f64> {
    if !k.is_finite() || k <= 1.0 {
        return Err(SizingError::InvalidProperty {
            what: "specific heat ratio k must be greater than 1",
        });
    }
    let exponent = (k + 1.0) / (k - 1.0);
    Ok(520.0 * (k * (2.0 / (k + 1.0)).powf(exponent)).sqrt())
}

/// Napier high-pressure steam correction; 1 at or below the threshold.
pub fn napier_kn(relieving_pressure_kpa_abs: f64) -> f64 {
    if relieving_pressure_kpa_abs > NAPIER_THRESHOLD_KPA {
        let p1_bar = relieving_pressure_kpa_abs / 100.0;
        (0.276 * p1_bar - 1000.0) / (0.33 * p1_bar - 1061.0)
    } else {
        1.0
    }
}

/// Required orifice area [mm²] for mass flow `w_kg_h`.
pub fn required_area(cond: &RegimeConditions<'_>, w_kg_h: f64) -> CalcResult<RegimeOutcome> {
    if !w_kg_h.is_finite() || w_kg_h <= 0.0 {
        return Err(SizingError::InvalidInput {
            what: "required flow must be positive",
        });
    }
    let outcome = match cond.service {
        ServiceType::GasVapor | ServiceType::Steam => {
            let gas = CompressibleTerms::evaluate(cond)?;
            let mut out = RegimeOutcome::new(
                GAS_EQUATION_CONSTANT * w_kg_h * gas.sqrt_tzm / gas.denominator_per_area,
                "A = 13160 * W * sqrt(T*Z/M) / (C * Kd * P1 * Kb * Kc * Kn * Ksh)",
            );
            gas.annotate(&mut out);
            out
        }
        ServiceType::Liquid => {
            let liquid = LiquidTerms::evaluate(cond)?;
            let q_lpm = w_kg_h / liquid.sg / 60.0;
            RegimeOutcome::new(
                LIQUID_EQUATION_CONSTANT * q_lpm / liquid.coefficient_product
                    * (liquid.sg / liquid.dp_kpa).sqrt(),
                "A = 11.78 * Q / (Kd * Kb * Kc * Kv) * sqrt(SG / (P1 - P2))",
            )
        }
        ServiceType::TwoPhase => {
            let two_phase = TwoPhaseTerms::evaluate(cond)?;
            let w_kg_s = w_kg_h / SECONDS_PER_HOUR;
            let mut out = RegimeOutcome::new(
                1.0e6 * w_kg_s / two_phase.flux_per_area,
                "A = W / (G * 0.9 * Kd * Kb * Kc)",
            );
            two_phase.annotate(&mut out);
            out
        }
    };

    tracing::debug!(
        service = %cond.service,
        w_kg_h,
        area_mm2 = outcome.value,
        "required area computed"
    );
    Ok(outcome)
}

/// Rated mass flow [kg/h] through an orifice of `area_mm2`.
pub fn rated_capacity(cond: &RegimeConditions<'_>, area_mm2: f64) -> CalcResult<RegimeOutcome> {
    if !area_mm2.is_finite() || area_mm2 <= 0.0 {
        return Err(SizingError::InvalidInput {
            what: "orifice area must be positive",
        });
    }
    let outcome = match cond.service {
        ServiceType::GasVapor | ServiceType::Steam => {
            let gas = CompressibleTerms::evaluate(cond)?;
            let mut out = RegimeOutcome::new(
                area_mm2 * gas.denominator_per_area / (GAS_EQUATION_CONSTANT * gas.sqrt_tzm),
                "W = A * C * Kd * P1 * Kb * Kc * Kn * Ksh / (13160 * sqrt(T*Z/M))",
            );
            gas.annotate(&mut out);
            out
        }
        ServiceType::Liquid => {
            let liquid = LiquidTerms::evaluate(cond)?;
            let q_lpm = area_mm2 * liquid.coefficient_product * liquid.dp_kpa.sqrt()
                / (LIQUID_EQUATION_CONSTANT * liquid.sg.sqrt());
            RegimeOutcome::new(
                q_lpm * 60.0 * liquid.sg,
                "Q = A * Kd * Kb * Kc * Kv * sqrt(P1 - P2) / (11.78 * sqrt(SG))",
            )
        }
        ServiceType::TwoPhase => {
            let two_phase = TwoPhaseTerms::evaluate(cond)?;
            let w_kg_s = area_mm2 * 1.0e-6 * two_phase.flux_per_area;
            let mut out = RegimeOutcome::new(
                w_kg_s * SECONDS_PER_HOUR,
                "W = A * G * 0.9 * Kd * Kb * Kc",
            );
            two_phase.annotate(&mut out);
            out
        }
    };

    tracing::debug!(
        service = %cond.service,
        area_mm2,
        w_kg_h = outcome.value,
        "rated capacity computed"
    );
    Ok(outcome)
}

struct CompressibleTerms {
    c: f64,
    kn: f64,
    napier_applied: bool,
    sqrt_tzm: f64,
    /// C·Kd·P1·Kb·Kc·Kn·Ksh
    denominator_per_area: f64,
}

impl CompressibleTerms {
    fn evaluate(cond: &RegimeConditions<'_>) -> CalcResult<Self> {
        let props = cond.properties;
        let coeffs = cond.coefficients;
        if !props.molecular_weight.is_finite() || props.molecular_weight <= 0.0 {
            return Err(SizingError::InvalidProperty {
                what: "molecular weight must be positive",
            });
        }
        if !props.z.is_finite() || props.z <= 0.0 {
            return Err(SizingError::InvalidProperty {
                what: "compressibility factor Z must be positive",
            });
        }
        let c = gas_constant(props.k)?;

        let (kn, napier_applied) = match cond.service {
            ServiceType::Steam => {
                let kn = napier_kn(cond.relieving_pressure_kpa_abs);
                (kn, cond.relieving_pressure_kpa_abs > NAPIER_THRESHOLD_KPA)
            }
            _ => (1.0, false),
        };
        let ksh = if cond.service == ServiceType::Steam {
            coeffs.ksh
        } else {
            1.0
        };

        Ok(Self {
            c,
            kn,
            napier_applied,
            sqrt_tzm: (cond.temperature_k * props.z / props.molecular_weight).sqrt(),
            denominator_per_area: c
                * coeffs.kd
                * cond.relieving_pressure_kpa_abs
                * coeffs.kb
                * coeffs.kc
                * kn
                * ksh,
        })
    }

    fn annotate(&self, out: &mut RegimeOutcome) {
        out.gas_constant = Some(self.c);
        if self.napier_applied {
            out.kn = Some(self.kn);
            out.notes.push(format!("Napier correction (Kn = {:.4}) applied", self.kn));
        }
    }
}

struct LiquidTerms {
    sg: f64,
    dp_kpa: f64,
    /// Kd·Kb·Kc·Kv
    coefficient_product: f64,
}

impl LiquidTerms {
    fn evaluate(cond: &RegimeConditions<'_>) -> CalcResult<Self> {
        let dp_kpa = cond.relieving_pressure_kpa_abs - cond.back_pressure_kpa_abs;
        if dp_kpa.is_nan() || dp_kpa <= 0.0 {
            return Err(SizingError::Overpressure {
                p1_abs_kpa: cond.relieving_pressure_kpa_abs,
                p2_abs_kpa: cond.back_pressure_kpa_abs,
            });
        }
        let sg = cond.properties.specific_gravity();
        if !sg.is_finite() || sg <= 0.0 {
            return Err(SizingError::InvalidProperty {
                what: "specific gravity must be positive",
            });
        }
        let c = cond.coefficients;
        Ok(Self {
            sg,
            dp_kpa,
            coefficient_product: c.kd * c.kb * c.kc * c.kv,
        })
    }
}

struct TwoPhaseTerms {
    critical: CriticalRatio,
    regime: FlowRegime,
    /// G·0.9·Kd·Kb·Kc [kg/(s·m²)]
    flux_per_area: f64,
}

impl TwoPhaseTerms {
    fn evaluate(cond: &RegimeConditions<'_>) -> CalcResult<Self> {
        let props = cond.properties;
        let omega = props.omega.ok_or(SizingError::InvalidProperty {
            what: "two-phase service requires the omega parameter",
        })?;
        if !omega.is_finite() || omega <= 0.0 {
            return Err(SizingError::InvalidProperty {
                what: "omega must be positive",
            });
        }
        if !props.density.is_finite() || props.density <= 0.0 {
            return Err(SizingError::InvalidProperty {
                what: "inlet density must be positive",
            });
        }

        let critical = solve_eta_c(omega);
        let p1 = cond.relieving_pressure_kpa_abs;
        let critical_pressure = critical.eta_c * p1;
        let regime = if cond.back_pressure_kpa_abs < critical_pressure {
            FlowRegime::Critical
        } else {
            FlowRegime::Subcritical
        };

        let v0 = props.specific_volume();
        // The subcritical branch uses the critical mass flux as well.
        let mass_flux = match regime {
            FlowRegime::Critical | FlowRegime::Subcritical => {
                critical.eta_c * ((p1 * 1000.0 / v0) / omega).sqrt()
            }
        };

        let c = cond.coefficients;
        Ok(Self {
            critical,
            regime,
            flux_per_area: mass_flux * TWO_PHASE_DERATING * c.kd * c.kb * c.kc,
        })
    }

    fn annotate(&self, out: &mut RegimeOutcome) {
        out.critical = Some(self.critical);
        out.flow_regime = Some(self.regime);
        let label = match self.regime {
            FlowRegime::Critical => "Critical",
            FlowRegime::Subcritical => "Subcritical",
        };
        out.notes
            .push(format!("Flow is {label} (eta_c={:.3})", self.critical.eta_c));
    }
}

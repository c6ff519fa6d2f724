//! Process input, service type and sizing coefficients.

use crate::error::{CalcResult, SizingError};
use crate::normalize::{
    FlowUnit, Measured, PressureUnit, TemperatureUnit, normalize_pressure,
    normalize_pressure_abs, normalize_temperature,
};
use psv_core::constants::ATM_KPA;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Relief service regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Gas/Vapor", alias = "gas", alias = "gas_vapor")]
    GasVapor,
    #[serde(rename = "Liquid", alias = "liquid")]
    Liquid,
    #[serde(rename = "Steam", alias = "steam")]
    Steam,
    #[serde(rename = "Two-Phase", alias = "two_phase")]
    TwoPhase,
}

impl ServiceType {
    pub const ALL: [ServiceType; 4] = [Self::GasVapor, Self::Liquid, Self::Steam, Self::TwoPhase];

    pub fn label(&self) -> &'static str {
        match self {
            Self::GasVapor => "Gas/Vapor",
            Self::Liquid => "Liquid",
            Self::Steam => "Steam",
            Self::TwoPhase => "Two-Phase",
        }
    }

    /// Gas/vapor and steam share the compressible-flow equation.
    pub fn is_compressible(&self) -> bool {
        matches!(self, Self::GasVapor | Self::Steam)
    }

    pub fn default_kd(&self) -> f64 {
        match self {
            Self::Liquid => 0.65,
            Self::GasVapor | Self::Steam | Self::TwoPhase => 0.975,
        }
    }

    pub fn sizing_basis(&self) -> &'static str {
        match self {
            Self::TwoPhase => "API 520 (Omega)",
            _ => "API 520 Part I",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ServiceType {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "gas/vapor" | "gas" | "vapor" | "gas-vapor" => Ok(Self::GasVapor),
            "liquid" => Ok(Self::Liquid),
            "steam" => Ok(Self::Steam),
            "two-phase" | "twophase" => Ok(Self::TwoPhase),
            _ => Err(SizingError::InvalidInput {
                what: "service must be Gas/Vapor, Liquid, Steam or Two-Phase",
            }),
        }
    }
}

/// Allowable overpressure above set pressure during relief.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum Accumulation {
    /// Single valve
    Ten,
    /// Multiple valves
    Sixteen,
    /// Fire case
    TwentyOne,
}

impl Accumulation {
    pub fn percent(&self) -> u32 {
        match self {
            Self::Ten => 10,
            Self::Sixteen => 16,
            Self::TwentyOne => 21,
        }
    }

    pub fn fraction(&self) -> f64 {
        f64::from(self.percent()) / 100.0
    }
}

impl TryFrom<u32> for Accumulation {
    type Error = SizingError;

    fn try_from(percent: u32) -> Result<Self, Self::Error> {
        match percent {
            10 => Ok(Self::Ten),
            16 => Ok(Self::Sixteen),
            21 => Ok(Self::TwentyOne),
            _ => Err(SizingError::InvalidInput {
                what: "overpressure must be 10, 16 or 21 %",
            }),
        }
    }
}

impl From<Accumulation> for u32 {
    fn from(value: Accumulation) -> Self {
        value.percent()
    }
}

impl fmt::Display for Accumulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// What a calculation solves for.
///
/// The variant carries the one input that mode needs, so a request can never
/// supply both a flow and a target orifice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CalcMode {
    /// Find the orifice for a required flow.
    Sizing { flow: Measured<FlowUnit> },
    /// Find the rated flow of a chosen orifice.
    Capacity {
        orifice: String,
        output_unit: FlowUnit,
    },
}

impl CalcMode {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sizing { .. } => "Sizing",
            Self::Capacity { .. } => "Capacity",
        }
    }
}

/// Process conditions at the valve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInput {
    pub service: ServiceType,
    #[serde(flatten)]
    pub mode: CalcMode,
    pub set_pressure: Measured<PressureUnit>,
    pub back_pressure_constant: Measured<PressureUnit>,
    pub back_pressure_variable: Measured<PressureUnit>,
    pub temperature: Measured<TemperatureUnit>,
    pub accumulation: Accumulation,
}

/// Process pressures and temperature in base units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NormalizedConditions {
    pub set_pressure_kpag: f64,
    pub set_pressure_kpa_abs: f64,
    /// Constant plus variable back pressure.
    pub back_pressure_kpag: f64,
    pub back_pressure_kpa_abs: f64,
    /// Set pressure plus accumulation.
    pub relieving_pressure_kpa_abs: f64,
    pub temperature_k: f64,
}

impl NormalizedConditions {
    pub fn set_pressure_barg(&self) -> f64 {
        self.set_pressure_kpag / 100.0
    }

    /// Total back pressure as a percentage of set pressure, both gauge.
    pub fn back_pressure_ratio_pct(&self) -> f64 {
        if self.set_pressure_kpag > 0.0 {
            self.back_pressure_kpag / self.set_pressure_kpag * 100.0
        } else {
            0.0
        }
    }
}

/// `(P_set,abs − atm)·(1 + accumulation) + atm`
pub fn relieving_pressure_kpa_abs(set_pressure_kpa_abs: f64, accumulation: Accumulation) -> f64 {
    (set_pressure_kpa_abs - ATM_KPA) * (1.0 + accumulation.fraction()) + ATM_KPA
}

impl ProcessInput {
    pub fn normalize(&self) -> CalcResult<NormalizedConditions> {
        let set_kpag = normalize_pressure(self.set_pressure.value, self.set_pressure.unit);
        if !set_kpag.is_finite() || set_kpag <= 0.0 {
            return Err(SizingError::InvalidInput {
                what: "set pressure must be positive (gauge)",
            });
        }

        let back_kpag = normalize_pressure(
            self.back_pressure_constant.value,
            self.back_pressure_constant.unit,
        ) + normalize_pressure(
            self.back_pressure_variable.value,
            self.back_pressure_variable.unit,
        );
        if !back_kpag.is_finite() || back_kpag < -ATM_KPA {
            return Err(SizingError::InvalidInput {
                what: "back pressure must not be below full vacuum",
            });
        }

        let set_abs = normalize_pressure_abs(set_kpag);
        Ok(NormalizedConditions {
            set_pressure_kpag: set_kpag,
            set_pressure_kpa_abs: set_abs,
            back_pressure_kpag: back_kpag,
            back_pressure_kpa_abs: normalize_pressure_abs(back_kpag),
            relieving_pressure_kpa_abs: relieving_pressure_kpa_abs(set_abs, self.accumulation),
            temperature_k: normalize_temperature(self.temperature.value, self.temperature.unit)?,
        })
    }

    /// Total back pressure expressed in the constant back-pressure unit.
    pub fn total_back_pressure(&self) -> Measured<PressureUnit> {
        combine_back_pressure(self.back_pressure_constant, self.back_pressure_variable)
    }
}

/// Constant plus variable back pressure, in the constant term's unit.
pub fn combine_back_pressure(
    constant: Measured<PressureUnit>,
    variable: Measured<PressureUnit>,
) -> Measured<PressureUnit> {
    let unit = constant.unit;
    let variable_kpa = normalize_pressure(variable.value, variable.unit);
    Measured::new(constant.value + variable_kpa / unit.kpa_factor(), unit)
}

/// Dimensionless correction factors, each in (0, 1.2].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingCoefficients {
    /// Discharge
    pub kd: f64,
    /// Back pressure
    pub kb: f64,
    /// Rupture disc combination
    pub kc: f64,
    /// Viscosity (liquid only)
    pub kv: f64,
    /// Steam superheat; honored only for manually entered steam properties.
    #[serde(default = "unity")]
    pub ksh: f64,
}

fn unity() -> f64 {
    1.0
}

pub const COEFFICIENT_MAX: f64 = 1.2;

impl SizingCoefficients {
    pub fn for_service(service: ServiceType) -> Self {
        Self {
            kd: service.default_kd(),
            kb: 1.0,
            kc: 1.0,
            kv: 1.0,
            ksh: 1.0,
        }
    }

    pub fn validate(&self) -> CalcResult<()> {
        let checks = [
            (self.kd, "Kd must be in (0, 1.2]"),
            (self.kb, "Kb must be in (0, 1.2]"),
            (self.kc, "Kc must be in (0, 1.2]"),
            (self.kv, "Kv must be in (0, 1.2]"),
            (self.ksh, "Ksh must be in (0, 1.2]"),
        ];
        for (value, what) in checks {
            if !(value > 0.0 && value <= COEFFICIENT_MAX) {
                return Err(SizingError::InvalidInput { what });
            }
        }
        Ok(())
    }
}

//! Sizing case schema definitions.

use psv_fluids::ManualProperties;
use psv_sizing::{
    Accumulation, CalcMode, FluidSpec, Measured, MechanicalSpec, PressureUnit, ServiceType,
    SizingCoefficients, SizingRequest, TemperatureUnit,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::validate::ValidationError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SizingCase {
    pub version: u32,
    #[serde(default)]
    pub general: GeneralDef,
    pub process: ProcessDef,
    pub fluid: FluidDef,
    /// Defaults per service when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coefficients: Option<SizingCoefficients>,
    pub mechanical: MechanicalDef,
    #[serde(default)]
    pub engine: EngineDef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GeneralDef {
    #[serde(default)]
    pub customer: String,
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub enquiry: String,
    #[serde(default)]
    pub offer: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessDef {
    pub service: ServiceType,
    #[serde(flatten)]
    pub mode: CalcMode,
    pub set_pressure: Measured<PressureUnit>,
    #[serde(default = "zero_gauge")]
    pub back_pressure_constant: Measured<PressureUnit>,
    #[serde(default = "zero_gauge")]
    pub back_pressure_variable: Measured<PressureUnit>,
    pub temperature: Measured<TemperatureUnit>,
    /// 10, 16 or 21.
    #[serde(default = "default_overpressure")]
    pub overpressure_pct: u32,
}

fn zero_gauge() -> Measured<PressureUnit> {
    Measured::new(0.0, PressureUnit::Barg)
}

fn default_overpressure() -> u32 {
    10
}

/// Either a catalog name or hand-entered values.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FluidDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual: Option<ManualFluidDef>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ManualFluidDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub molecular_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub k: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_gravity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viscosity_cp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omega: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inlet_density: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vapor_pressure_kpa_abs: Option<f64>,
}

impl ManualFluidDef {
    /// Names of the values `service` cannot do without.
    pub fn missing_for(&self, service: ServiceType) -> Vec<&'static str> {
        let mut missing = Vec::new();
        match service {
            ServiceType::GasVapor | ServiceType::Steam => {
                if self.molecular_weight.is_none() {
                    missing.push("molecular_weight");
                }
                if self.k.is_none() {
                    missing.push("k");
                }
                if self.z.is_none() {
                    missing.push("z");
                }
            }
            ServiceType::Liquid => {
                if self.specific_gravity.is_none() {
                    missing.push("specific_gravity");
                }
            }
            ServiceType::TwoPhase => {
                if self.omega.is_none() {
                    missing.push("omega");
                }
                if self.inlet_density.is_none() && self.specific_gravity.is_none() {
                    missing.push("inlet_density");
                }
            }
        }
        missing
    }

    fn to_properties(&self) -> ManualProperties {
        let defaults = ManualProperties::default();
        ManualProperties {
            molecular_weight: self.molecular_weight.unwrap_or(defaults.molecular_weight),
            k: self.k.unwrap_or(defaults.k),
            z: self.z.unwrap_or(defaults.z),
            specific_gravity: self.specific_gravity.unwrap_or(defaults.specific_gravity),
            viscosity_cp: self.viscosity_cp.unwrap_or(defaults.viscosity_cp),
            omega: self.omega,
            inlet_density: self.inlet_density,
            vapor_pressure_kpa_abs: self.vapor_pressure_kpa_abs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeverType {
    None,
    #[serde(alias = "Plain Lever")]
    Plain,
    #[serde(alias = "Packed Lever")]
    Packed,
    #[serde(alias = "Open Lever")]
    Open,
}

impl LeverType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Plain => "Plain",
            Self::Packed => "Packed",
            Self::Open => "Open",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MechanicalDef {
    #[serde(flatten)]
    pub valve: MechanicalSpec,
    /// Free text, e.g. "RF" or "1\" NPT(M)".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lever: Option<LeverType>,
    #[serde(default)]
    pub materials: MaterialsDef,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MaterialsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nozzle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spring: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    #[default]
    Coolprop,
    None,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineDef {
    #[serde(default)]
    pub backend: BackendKind,
    /// Spring range CSV, relative to the case file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub springs: Option<PathBuf>,
}

impl SizingCase {
    /// The engine request this case describes. Call after validation.
    pub fn to_request(&self) -> Result<SizingRequest, ValidationError> {
        let process = &self.process;
        let accumulation = Accumulation::try_from(process.overpressure_pct).map_err(|_| {
            ValidationError::InvalidValue {
                field: "process.overpressure_pct".to_string(),
                value: process.overpressure_pct.to_string(),
                reason: "must be 10, 16 or 21".to_string(),
            }
        })?;

        Ok(SizingRequest {
            process: psv_sizing::ProcessInput {
                service: process.service,
                mode: process.mode.clone(),
                set_pressure: process.set_pressure,
                back_pressure_constant: process.back_pressure_constant,
                back_pressure_variable: process.back_pressure_variable,
                temperature: process.temperature,
                accumulation,
            },
            fluid: self.fluid_spec()?,
            coefficients: self
                .coefficients
                .unwrap_or_else(|| SizingCoefficients::for_service(process.service)),
            mechanical: self.mechanical.valve.clone(),
        })
    }

    fn fluid_spec(&self) -> Result<FluidSpec, ValidationError> {
        match (&self.fluid.name, &self.fluid.manual) {
            (Some(name), None) => {
                let species = psv_fluids::lookup_fluid(name).map_err(|e| {
                    ValidationError::InvalidValue {
                        field: "fluid.name".to_string(),
                        value: name.clone(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(FluidSpec::Catalog {
                    species,
                    quality: self.fluid.quality,
                })
            }
            (None, Some(manual)) => Ok(FluidSpec::Manual(manual.to_properties())),
            _ => Err(ValidationError::InvalidValue {
                field: "fluid".to_string(),
                value: String::new(),
                reason: "give exactly one of name or manual".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_gas_needs_mw_k_z() {
        let manual = ManualFluidDef {
            k: Some(1.4),
            ..Default::default()
        };
        assert_eq!(
            manual.missing_for(ServiceType::GasVapor),
            vec!["molecular_weight", "z"]
        );
    }

    #[test]
    fn manual_two_phase_accepts_specific_gravity_for_density() {
        let manual = ManualFluidDef {
            omega: Some(2.0),
            specific_gravity: Some(0.8),
            ..Default::default()
        };
        assert!(manual.missing_for(ServiceType::TwoPhase).is_empty());
    }

    #[test]
    fn open_lever_accepts_datasheet_spelling() {
        let lever: LeverType = serde_yaml::from_str("open").unwrap();
        assert_eq!(lever, LeverType::Open);
        let lever: LeverType = serde_yaml::from_str("Open Lever").unwrap();
        assert_eq!(lever, LeverType::Open);
        assert_eq!(serde_yaml::to_string(&LeverType::Open).unwrap().trim(), "open");
    }

    #[test]
    fn unset_manual_values_take_defaults() {
        let manual = ManualFluidDef {
            specific_gravity: Some(0.75),
            ..Default::default()
        };
        let props = manual.to_properties();
        assert_eq!(props.specific_gravity, 0.75);
        assert_eq!(props.molecular_weight, ManualProperties::default().molecular_weight);
        assert!(props.omega.is_none());
    }
}

//! Sizing engine: one request in, one [`SizingResult`] out.
//!
//! The engine holds only immutable collaborators (property source, orifice
//! table, spring table) and keeps no state between runs, so a single instance
//! can serve concurrent requests.

use crate::calculator::{RegimeConditions, rated_capacity, required_area};
use crate::error::{CalcResult, SizingError};
use crate::input::{CalcMode, NormalizedConditions, ProcessInput, ServiceType, SizingCoefficients};
use crate::mechanical::{MechanicalSpec, resolve_mechanical};
use crate::normalize::{Measured, denormalize_flow, normalize_flow};
use crate::orifice::OrificeTable;
use crate::result::{FlowFigure, ModeKind, SizingResult};
use crate::safety::{SafetyInputs, assess};
use crate::spring::{SpringLookup, SpringTable};
use psv_core::units::{k, kpa};
use psv_fluids::{
    FluidProperties, ManualProperties, PhaseModel, PropertySource, ResolveRequest, Species,
    UnavailableSource, resolve,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Where fluid properties come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FluidSpec {
    /// Named fluid evaluated by the property source.
    Catalog {
        species: Species,
        /// Vapor mass fraction; two-phase service only.
        #[serde(default)]
        quality: Option<f64>,
    },
    Manual(ManualProperties),
}

impl FluidSpec {
    pub fn label(&self) -> String {
        match self {
            Self::Catalog { species, .. } => species.display_name().to_string(),
            Self::Manual(_) => "Custom (Manual Input)".to_string(),
        }
    }
}

/// Everything one calculation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingRequest {
    pub process: ProcessInput,
    pub fluid: FluidSpec,
    pub coefficients: SizingCoefficients,
    pub mechanical: MechanicalSpec,
}

pub struct SizingEngine {
    source: Arc<dyn PropertySource>,
    orifices: OrificeTable,
    springs: Option<SpringTable>,
}

impl Default for SizingEngine {
    fn default() -> Self {
        Self::new(Arc::new(UnavailableSource))
    }
}

impl SizingEngine {
    pub fn new(source: Arc<dyn PropertySource>) -> Self {
        Self {
            source,
            orifices: OrificeTable::standard(),
            springs: None,
        }
    }

    pub fn with_orifices(mut self, orifices: OrificeTable) -> Self {
        self.orifices = orifices;
        self
    }

    pub fn with_springs(mut self, springs: SpringTable) -> Self {
        self.springs = Some(springs);
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn orifices(&self) -> &OrificeTable {
        &self.orifices
    }

    /// Run one sizing or capacity calculation.
    pub fn run(&self, request: &SizingRequest) -> CalcResult<SizingResult> {
        let process = &request.process;
        let service = process.service;
        request.coefficients.validate()?;
        let conditions = process.normalize()?;

        let properties = self.resolve_properties(service, &request.fluid, &conditions)?;
        let mut warnings = Vec::new();
        let coefficients = effective_coefficients(service, &request.fluid, request.coefficients, &mut warnings);

        let regime = RegimeConditions {
            service,
            relieving_pressure_kpa_abs: conditions.relieving_pressure_kpa_abs,
            back_pressure_kpa_abs: conditions.back_pressure_kpa_abs,
            temperature_k: conditions.temperature_k,
            properties: &properties,
            coefficients: &coefficients,
        };

        let standard = request.mechanical.standard;
        let set_barg = conditions.set_pressure_barg();
        let (mode, flow, required_area_mm2, orifice, outcome) = match &process.mode {
            CalcMode::Sizing { flow } => {
                let w_kg_h = normalize_flow(flow.value, flow.unit, &properties)?;
                let outcome = required_area(&regime, w_kg_h)?;
                let orifice = self.orifices.select_for_area(
                    outcome.value,
                    standard.family(),
                    standard.mounting(),
                    set_barg,
                )?;
                let figure = FlowFigure {
                    kg_per_h: w_kg_h,
                    display: *flow,
                };
                (ModeKind::Sizing, figure, Some(outcome.value), orifice, outcome)
            }
            CalcMode::Capacity {
                orifice,
                output_unit,
            } => {
                let selection = self.orifices.select_by_designation(
                    orifice,
                    standard.family(),
                    standard.mounting(),
                    set_barg,
                )?;
                warnings.extend(selection.warnings);
                let outcome = rated_capacity(&regime, selection.record.area_mm2)?;
                let display = denormalize_flow(outcome.value, *output_unit, &properties)?;
                let figure = FlowFigure {
                    kg_per_h: outcome.value,
                    display: Measured::new(display, *output_unit),
                };
                (ModeKind::Capacity, figure, None, selection.record, outcome)
            }
        };

        let spring = match &self.springs {
            Some(table) => table.resolve(orifice.designation, set_barg),
            None => SpringLookup::Unavailable {
                reason: "no spring range table configured".to_string(),
            },
        };

        let mechanical = resolve_mechanical(
            &request.mechanical,
            orifice.designation,
            set_barg,
            conditions.back_pressure_ratio_pct(),
        );
        warnings.extend(mechanical.warnings.iter().cloned());

        let safety = assess(&SafetyInputs {
            service,
            w_kg_h: flow.kg_per_h,
            properties: &properties,
            temperature_k: conditions.temperature_k,
            set_pressure_kpag: conditions.set_pressure_kpag,
            set_pressure_kpa_abs: conditions.set_pressure_kpa_abs,
            back_pressure_kpa_abs: conditions.back_pressure_kpa_abs,
            orifice_area_mm2: orifice.area_mm2,
        });

        let mut notes = outcome.notes;
        notes.extend(mechanical.notes.iter().cloned());
        notes.extend(safety.notes.iter().cloned());
        if properties.k_defaulted && service.is_compressible() {
            notes.push(format!("k defaulted to {}", psv_fluids::FALLBACK_K));
        }

        let result = SizingResult {
            service,
            mode,
            fluid: request.fluid.label(),
            conditions,
            properties,
            coefficients,
            flow,
            required_area_mm2,
            orifice,
            mechanical,
            spring,
            safety,
            gas_constant: outcome.gas_constant,
            kn: outcome.kn,
            critical: outcome.critical,
            flow_regime: outcome.flow_regime,
            sizing_basis: service.sizing_basis(),
            formula: outcome.formula,
            notes,
            warnings,
        };
        result.ensure_finite()?;

        tracing::info!(
            service = %service,
            mode = process.mode.label(),
            orifice = %result.orifice.designation,
            flow_kg_h = result.flow.kg_per_h,
            "calculation complete"
        );
        Ok(result)
    }

    fn resolve_properties(
        &self,
        service: ServiceType,
        fluid: &FluidSpec,
        conditions: &NormalizedConditions,
    ) -> CalcResult<FluidProperties> {
        match fluid {
            FluidSpec::Manual(values) => {
                FluidProperties::manual(values).map_err(|source| SizingError::PropertyResolution {
                    fluid: fluid.label(),
                    service,
                    source,
                })
            }
            FluidSpec::Catalog { species, quality } => {
                let phase = match service {
                    ServiceType::TwoPhase => PhaseModel::TwoPhase {
                        quality: quality.ok_or(SizingError::InvalidInput {
                            what: "two-phase service requires a vapor quality",
                        })?,
                    },
                    _ => PhaseModel::SinglePhase,
                };
                let request = ResolveRequest {
                    species: *species,
                    t: k(conditions.temperature_k),
                    p_abs: kpa(conditions.set_pressure_kpa_abs),
                    phase,
                    vapor_pressure: service == ServiceType::Liquid,
                };
                resolve(self.source.as_ref(), &request).map_err(|source| {
                    SizingError::PropertyResolution {
                        fluid: fluid.label(),
                        service,
                        source,
                    }
                })
            }
        }
    }
}

/// Ksh only applies to manually entered steam; tabulated steam gets 1.
fn effective_coefficients(
    service: ServiceType,
    fluid: &FluidSpec,
    requested: SizingCoefficients,
    warnings: &mut Vec<String>,
) -> SizingCoefficients {
    let manual_steam = service == ServiceType::Steam && matches!(fluid, FluidSpec::Manual(_));
    if manual_steam || requested.ksh == 1.0 {
        return requested;
    }
    warnings.push("Ksh applies only to manually entered steam properties; using 1.0".to_string());
    SizingCoefficients {
        ksh: 1.0,
        ..requested
    }
}

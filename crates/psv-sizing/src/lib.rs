//! psv-sizing: pressure-safety valve sizing and selection.
//!
//! Provides:
//! - Unit normalization of process conditions
//! - Required area / rated capacity for gas, steam, liquid and two-phase relief
//! - The two-phase critical pressure ratio solver
//! - Orifice selection, spring ranges, API 526 sizes and dimensions
//! - Reaction force, noise and liquid flashing/cavitation advisories
//!
//! # Example
//!
//! ```
//! use psv_sizing::{
//!     Accumulation, CalcMode, FlangeRating, FluidSpec, MechanicalSpec,
//!     ProcessInput, ServiceType, SizingCoefficients, SizingEngine, SizingRequest,
//! };
//! use psv_fluids::ManualProperties;
//!
//! let request = SizingRequest {
//!     process: ProcessInput {
//!         service: ServiceType::GasVapor,
//!         mode: CalcMode::Sizing { flow: "1000 kg/hr".parse().unwrap() },
//!         set_pressure: "10 barg".parse().unwrap(),
//!         back_pressure_constant: "0 barg".parse().unwrap(),
//!         back_pressure_variable: "0 barg".parse().unwrap(),
//!         temperature: "150 C".parse().unwrap(),
//!         accumulation: Accumulation::Ten,
//!     },
//!     fluid: FluidSpec::Manual(ManualProperties::default()),
//!     coefficients: SizingCoefficients::for_service(ServiceType::GasVapor),
//!     mechanical: MechanicalSpec::api_526(FlangeRating::Class300, FlangeRating::Class150),
//! };
//!
//! let result = SizingEngine::default().run(&request).unwrap();
//! println!("{} ({} mm²)", result.orifice.designation, result.orifice.area_mm2);
//! ```

pub mod calculator;
pub mod critical;
pub mod dimensions;
pub mod engine;
pub mod error;
pub mod input;
pub mod mechanical;
pub mod normalize;
pub mod orifice;
pub mod result;
pub mod safety;
pub mod spring;

pub use calculator::{FlowRegime, RegimeConditions, RegimeOutcome, rated_capacity, required_area};
pub use critical::{CriticalRatio, SolveOutcome, eta_c, solve_eta_c};
pub use dimensions::{CenterToFace, FlangeRating, ValveSize, api_526_dimensions, api_526_valve_size};
pub use engine::{FluidSpec, SizingEngine, SizingRequest};
pub use error::{CalcResult, SizingError};
pub use input::{
    Accumulation, CalcMode, NormalizedConditions, ProcessInput, ServiceType, SizingCoefficients,
};
pub use mechanical::{DimensionSource, MechanicalOutcome, MechanicalSpec, ValveStandard};
pub use normalize::{
    FlowUnit, Measured, PressureUnit, TemperatureUnit, UnitSymbol, denormalize_flow,
    normalize_flow, normalize_pressure, normalize_pressure_abs, normalize_temperature,
};
pub use orifice::{Mounting, OrificeRecord, OrificeSelection, OrificeTable, StandardFamily};
pub use result::{FlowFigure, ModeKind, SizingResult};
pub use safety::SafetyMetrics;
pub use spring::{SpringLookup, SpringRange, SpringTable};

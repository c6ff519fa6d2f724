//! psv-fluids: fluid properties at relief conditions.
//!
//! Provides:
//! - Pure-fluid species and the named catalog offered for selection
//! - State specifications and raw property samples
//! - `PropertySource` trait with CoolProp and table-backed implementations
//! - Resolution of the canonical property record used for sizing
//!
//! # Architecture
//!
//! Sizing code never talks to a property backend directly. It asks [`resolve`]
//! for a [`FluidProperties`] record from any [`PropertySource`], or builds one
//! with [`FluidProperties::manual`] when the fluid is not in the catalog or no
//! backend is installed.
//!
//! # Example
//!
//! ```no_run
//! use psv_fluids::{CoolPropSource, PhaseModel, ResolveRequest, Species, resolve};
//! use psv_core::units::{k, pa};
//!
//! let source = CoolPropSource::new();
//! let request = ResolveRequest {
//!     species: Species::N2,
//!     t: k(300.0),
//!     p_abs: pa(1.2e6),
//!     phase: PhaseModel::SinglePhase,
//!     vapor_pressure: false,
//! };
//! let props = resolve(&source, &request).unwrap();
//! println!("k = {:.3}, Z = {:.3}", props.k, props.z);
//! ```

pub mod catalog;
pub mod coolprop;
pub mod error;
pub mod resolver;
pub mod source;
pub mod species;
pub mod state;
pub mod tabulated;

pub use catalog::{FluidCatalogEntry, filter_fluid_catalog, fluid_catalog, lookup_fluid};
pub use coolprop::CoolPropSource;
pub use error::{FluidError, FluidResult};
pub use resolver::{
    FALLBACK_K, FluidProperties, ManualProperties, PhaseModel, PropertyOrigin, ResolveRequest,
    resolve,
};
pub use source::{PropertySource, UnavailableSource};
pub use species::Species;
pub use state::{PropertySample, SpecEntropy, SpecHeatCapacity, StateInput};
pub use tabulated::{TabulatedEntry, TabulatedSource};

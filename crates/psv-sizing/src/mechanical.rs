//! Mechanical construction: valve standard, end connections and the
//! advisories that follow from them.

use crate::dimensions::{CenterToFace, FlangeRating, api_526_dimensions, api_526_valve_size};
use crate::orifice::{Mounting, StandardFamily};
use serde::{Deserialize, Serialize};

/// Back pressure ratio above which a balanced bellows is recommended [%].
pub const BELLOWS_THRESHOLD_PCT: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValveStandard {
    /// Flanged to API 526.
    Api526,
    /// Compact threaded body.
    NonApi,
}

impl ValveStandard {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Api526 => "API 526 (Flanged)",
            Self::NonApi => "Non-API / Compact (Threaded)",
        }
    }

    pub fn family(&self) -> StandardFamily {
        match self {
            Self::Api526 => StandardFamily::Api526,
            Self::NonApi => StandardFamily::NonApi,
        }
    }

    pub fn mounting(&self) -> Mounting {
        match self {
            Self::Api526 => Mounting::Flanged,
            Self::NonApi => Mounting::NonFlanged,
        }
    }
}

/// Construction details the engine acts on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MechanicalSpec {
    pub standard: ValveStandard,
    #[serde(default)]
    pub inlet_rating: Option<FlangeRating>,
    #[serde(default)]
    pub outlet_rating: Option<FlangeRating>,
    /// Threaded sizes for non-API valves, e.g. `1/2"`.
    #[serde(default)]
    pub threaded_inlet_size: Option<String>,
    #[serde(default)]
    pub threaded_outlet_size: Option<String>,
    #[serde(default)]
    pub bellows: bool,
    /// Used when no standard dimension exists for the selection.
    #[serde(default)]
    pub manual_center_to_face: Option<CenterToFace>,
}

impl MechanicalSpec {
    pub fn api_526(inlet: FlangeRating, outlet: FlangeRating) -> Self {
        Self {
            standard: ValveStandard::Api526,
            inlet_rating: Some(inlet),
            outlet_rating: Some(outlet),
            threaded_inlet_size: None,
            threaded_outlet_size: None,
            bellows: false,
            manual_center_to_face: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionSource {
    Api526,
    Manual,
}

/// Mechanical part of a result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MechanicalOutcome {
    /// `"1\" x 2\""`, `"Check API Std"` or the threaded sizes.
    pub valve_size: String,
    pub center_to_face: Option<CenterToFace>,
    pub dimension_source: DimensionSource,
    pub bellows_recommended: bool,
    pub notes: Vec<String>,
    pub warnings: Vec<String>,
}

/// Valve size, dimensions and construction advisories for a selected orifice.
pub fn resolve_mechanical(
    spec: &MechanicalSpec,
    designation: char,
    set_pressure_barg: f64,
    back_pressure_ratio_pct: f64,
) -> MechanicalOutcome {
    let mut notes = Vec::new();
    let mut warnings = Vec::new();

    let bellows_recommended = back_pressure_ratio_pct > BELLOWS_THRESHOLD_PCT;
    if bellows_recommended {
        notes.push(format!(
            "Total back pressure is {back_pressure_ratio_pct:.1}% of set pressure; bellows recommended"
        ));
        if !spec.bellows {
            warnings.push(format!(
                "Back pressure above {BELLOWS_THRESHOLD_PCT}% but bellows not specified"
            ));
        }
    }

    if let Some(inlet) = spec.inlet_rating
        && spec.standard == ValveStandard::Api526
        && set_pressure_barg > inlet.max_set_pressure_barg()
    {
        tracing::warn!(
            rating = %inlet,
            set_pressure_barg,
            limit_barg = inlet.max_set_pressure_barg(),
            "set pressure exceeds inlet flange rating"
        );
        warnings.push(format!(
            "Set pressure ({set_pressure_barg:.1} bar) exceeds {inlet} rating limit (~{} bar)",
            inlet.max_set_pressure_barg()
        ));
    }

    let mut center_to_face = spec.manual_center_to_face;
    let mut dimension_source = DimensionSource::Manual;
    let valve_size = match spec.standard {
        ValveStandard::Api526 => match api_526_valve_size(designation) {
            Some(size) => {
                let standard = match (spec.inlet_rating, spec.outlet_rating) {
                    (Some(inlet), Some(outlet)) => api_526_dimensions(designation, inlet, outlet),
                    _ => None,
                };
                match standard {
                    Some(dims) => {
                        center_to_face = Some(dims);
                        dimension_source = DimensionSource::Api526;
                        notes.push("API dims found".to_string());
                    }
                    None => notes.push("Std API Dims not found".to_string()),
                }
                size.to_string()
            }
            None => "Check API Std".to_string(),
        },
        ValveStandard::NonApi => format!(
            "{} x {}",
            spec.threaded_inlet_size.as_deref().unwrap_or("-"),
            spec.threaded_outlet_size.as_deref().unwrap_or("-")
        ),
    };

    MechanicalOutcome {
        valve_size,
        center_to_face,
        dimension_source,
        bellows_recommended,
        notes,
        warnings,
    }
}

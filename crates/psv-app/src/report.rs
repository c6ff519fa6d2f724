//! Datasheet groups handed to renderers.
//!
//! Every value is already a display string. The engine guarantees finite
//! numbers, so nothing here formats a NaN.

use psv_project::{LeverType, SizingCase};
use psv_sizing::{
    ModeKind, ServiceType, SizingResult, ValveStandard, input::combine_back_pressure,
};
use serde::Serialize;

pub const GENERAL: &str = "1. General Detail";
pub const PROCESS: &str = "2. Process Conditions";
pub const FLUID: &str = "3. Fluid Properties & Coefficients";
pub const MECHANICAL: &str = "4. Mechanical Construction";
pub const RESULTS: &str = "5. Sizing & Selection Results";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasheetGroup {
    pub title: &'static str,
    pub rows: Vec<(String, String)>,
}

impl DatasheetGroup {
    fn new(title: &'static str) -> Self {
        Self {
            title,
            rows: Vec::new(),
        }
    }

    fn push(&mut self, key: &str, value: impl Into<String>) {
        self.rows.push((key.to_string(), value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datasheet {
    pub groups: Vec<DatasheetGroup>,
}

impl Datasheet {
    pub fn group(&self, title: &str) -> Option<&DatasheetGroup> {
        self.groups.iter().find(|g| g.title == title)
    }

    pub fn get(&self, title: &str, key: &str) -> Option<&str> {
        self.group(title).and_then(|g| g.get(key))
    }
}

fn or_dash(value: &Option<String>) -> String {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or("-")
        .to_string()
}

fn optional_number(value: Option<f64>, precision: usize, unit: &str) -> String {
    match value {
        Some(v) if unit.is_empty() => format!("{v:.precision$}"),
        Some(v) => format!("{v:.precision$} {unit}"),
        None => "N/A".to_string(),
    }
}

fn yes_no(flag: Option<bool>) -> &'static str {
    match flag {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "Not checked",
    }
}

pub fn build_datasheet(case: &SizingCase, result: &SizingResult) -> Datasheet {
    Datasheet {
        groups: vec![
            general_group(case, result),
            process_group(case, result),
            fluid_group(case, result),
            mechanical_group(case, result),
            results_group(result),
        ],
    }
}

fn general_group(case: &SizingCase, result: &SizingResult) -> DatasheetGroup {
    let general = &case.general;
    let mut group = DatasheetGroup::new(GENERAL);
    group.push("Customer", general.customer.clone());
    group.push("Tag No", general.tag.clone());
    group.push("Enquiry No", general.enquiry.clone());
    group.push("Offer No", general.offer.clone());
    group.push("Description", general.description.clone());
    group.push("Service", result.service.label());
    group
}

fn process_group(case: &SizingCase, result: &SizingResult) -> DatasheetGroup {
    let process = &case.process;
    let flow_label = match result.mode {
        ModeKind::Sizing => "Required Flow",
        ModeKind::Capacity => "Rated Capacity",
    };
    let total_back =
        combine_back_pressure(process.back_pressure_constant, process.back_pressure_variable);

    let mut group = DatasheetGroup::new(PROCESS);
    group.push("Fluid", result.fluid.clone());
    group.push(
        flow_label,
        format!("{:.2} {}", result.flow.display.value, result.flow.display.unit),
    );
    group.push("Set Pressure", process.set_pressure.to_string());
    group.push("Constant Back Pressure", process.back_pressure_constant.to_string());
    group.push("Variable Back Pressure", process.back_pressure_variable.to_string());
    group.push(
        "Total Back Pressure",
        format!("{:.2} {}", total_back.value, total_back.unit),
    );
    group.push("Relieving Temp", process.temperature.to_string());
    group.push(
        "Overpressure",
        format!("{}% Accumulation", process.overpressure_pct),
    );
    group.push(
        "Relieving Pressure",
        format!("{:.2} kPa abs", result.conditions.relieving_pressure_kpa_abs),
    );
    group
}

fn fluid_group(case: &SizingCase, result: &SizingResult) -> DatasheetGroup {
    let c = &result.coefficients;
    let p = &result.properties;
    let mut group = DatasheetGroup::new(FLUID);
    group.push("Kd", format!("{}", c.kd));
    group.push("Kb", format!("{}", c.kb));
    group.push("Kc", format!("{}", c.kc));

    match result.service {
        ServiceType::TwoPhase => {
            group.push(
                "Quality (x)",
                case.fluid
                    .quality
                    .map(|q| q.to_string())
                    .unwrap_or_else(|| "N/A".to_string()),
            );
            group.push("Omega (w)", optional_number(p.omega, 3, ""));
            group.push("Inlet Density", format!("{:.1} kg/m3", p.density));
            if let Some(critical) = &result.critical {
                group.push("Critical Ratio (eta_c)", format!("{:.4}", critical.eta_c));
            }
        }
        service => {
            group.push("MW", format!("{:.2}", p.molecular_weight));
            group.push("k (Cp/Cv)", format!("{:.3}", p.k));
            group.push("Z Factor", format!("{:.3}", p.z));
            group.push("Specific Gravity", format!("{:.3}", p.specific_gravity()));
            group.push(
                "Viscosity",
                if service == ServiceType::Liquid {
                    format!("{:.3} cP", p.viscosity_cp)
                } else {
                    "N/A".to_string()
                },
            );
            match service {
                ServiceType::Liquid => group.push("Kv", format!("{}", c.kv)),
                ServiceType::Steam => {
                    group.push("Ksh", format!("{}", c.ksh));
                    group.push("Kn", optional_number(result.kn, 4, ""));
                }
                _ => {}
            }
            if let Some(gas_constant) = result.gas_constant {
                group.push("Gas Constant (C)", format!("{gas_constant:.2}"));
            }
        }
    }
    group
}

fn mechanical_group(case: &SizingCase, result: &SizingResult) -> DatasheetGroup {
    let mech = &case.mechanical;
    let valve = &mech.valve;
    let (inlet_conn, outlet_conn) = match valve.standard {
        ValveStandard::Api526 => {
            let facing = mech.connection.as_deref().unwrap_or("RF");
            let side = |rating: Option<psv_sizing::FlangeRating>| match rating {
                Some(rating) => format!("{rating} {facing}"),
                None => "-".to_string(),
            };
            (side(valve.inlet_rating), side(valve.outlet_rating))
        }
        ValveStandard::NonApi => (
            or_dash(&valve.threaded_inlet_size),
            or_dash(&valve.threaded_outlet_size),
        ),
    };
    let lever = mech.lever.unwrap_or(LeverType::None).label();
    let ctf = result.mechanical.center_to_face;

    let mut group = DatasheetGroup::new(MECHANICAL);
    group.push("Type", valve.standard.label());
    group.push("Valve Size", result.mechanical.valve_size.clone());
    group.push("Orifice", result.orifice.designation.to_string());
    group.push("Body Material", or_dash(&mech.materials.body));
    group.push("Nozzle Material", or_dash(&mech.materials.nozzle));
    group.push("Disc Material", or_dash(&mech.materials.disc));
    group.push("Spring Material", or_dash(&mech.materials.spring));
    group.push("Bellows", if valve.bellows { "Yes" } else { "No" });
    group.push("Lever", lever);
    group.push("Inlet Conn", inlet_conn);
    group.push("Outlet Conn", outlet_conn);
    group.push(
        "Center to Face (Inlet)",
        optional_number(ctf.map(|d| d.inlet_mm), 0, "mm"),
    );
    group.push(
        "Center to Face (Outlet)",
        optional_number(ctf.map(|d| d.outlet_mm), 0, "mm"),
    );
    group.push("Spring Range", result.spring.label());
    group
}

fn results_group(result: &SizingResult) -> DatasheetGroup {
    let orifice = &result.orifice;
    let mut group = DatasheetGroup::new(RESULTS);
    group.push(
        "Calculated Area",
        match result.required_area_mm2 {
            Some(area) => format!("{area:.2} mm²"),
            None => "N/A (capacity check)".to_string(),
        },
    );
    group.push(
        "Selected Area",
        format!("{:.2} mm² ({})", orifice.area_mm2, orifice.designation),
    );
    group.push(
        "Back Pressure Ratio",
        format!("{:.1} %", result.conditions.back_pressure_ratio_pct()),
    );
    group.push(
        "Reaction Force",
        optional_number(result.safety.reaction_force_n, 1, "N"),
    );
    group.push("Noise", optional_number(result.safety.noise_dba, 1, "dBA"));
    if result.service == ServiceType::Liquid {
        group.push("Flashing", yes_no(result.safety.flashing));
        group.push("Cavitation", yes_no(result.safety.cavitation));
    }
    group.push("Sizing Basis", result.sizing_basis);
    group.push("Note", result.note_line());
    group.push("Formula Used", result.formula);
    if !result.warnings.is_empty() {
        group.push("Warnings", result.warnings.join(" | "));
    }
    group
}

//! CoolProp integration tests.
//!
//! Broad tolerances avoid backend version issues while still enforcing physical
//! plausibility of the resolved sizing properties.

use psv_core::units::{k, pa};
use psv_fluids::{
    CoolPropSource, PhaseModel, PropertySource, ResolveRequest, Species, StateInput, resolve,
};

#[test]
fn water_at_1atm_300k() {
    let source = CoolPropSource::new();
    let sample = source
        .lookup(
            Species::H2O,
            StateInput::PT {
                p: pa(101_325.0),
                t: k(300.0),
            },
        )
        .unwrap();

    assert!(
        sample.rho.value > 900.0 && sample.rho.value < 1100.0,
        "rho = {} kg/m³",
        sample.rho.value
    );
}

#[test]
fn nitrogen_relief_properties_are_near_ideal() {
    let source = CoolPropSource::new();
    let request = ResolveRequest {
        species: Species::N2,
        t: k(300.0),
        p_abs: pa(1.2e6),
        phase: PhaseModel::SinglePhase,
        vapor_pressure: false,
    };
    let props = resolve(&source, &request).unwrap();

    assert!((props.k - 1.4).abs() < 0.05, "k = {}", props.k);
    assert!((props.z - 1.0).abs() < 0.02, "Z = {}", props.z);
    assert!((props.molecular_weight - 28.014).abs() < 0.01);
    assert!(props.viscosity_cp > 0.01 && props.viscosity_cp < 0.03);
}

#[test]
fn water_saturation_pressure_near_boiling() {
    let source = CoolPropSource::new();
    let request = ResolveRequest {
        species: Species::H2O,
        t: k(373.124),
        p_abs: pa(500_000.0),
        phase: PhaseModel::SinglePhase,
        vapor_pressure: true,
    };
    let props = resolve(&source, &request).unwrap();
    let p_vap = props.vapor_pressure_kpa_abs.unwrap();

    assert!((p_vap - 101.325).abs() < 1.0, "p_vap = {p_vap} kPa");
    assert!(props.specific_gravity() > 0.9 && props.specific_gravity() < 1.0);
}

#[test]
fn flashing_water_has_positive_omega() {
    let source = CoolPropSource::new();
    let request = ResolveRequest {
        species: Species::H2O,
        t: k(453.0),
        p_abs: pa(1.0e6),
        phase: PhaseModel::TwoPhase { quality: 0.1 },
        vapor_pressure: false,
    };
    let props = resolve(&source, &request).unwrap();
    let omega = props.omega.unwrap();

    assert!(omega > 0.0 && omega.is_finite(), "omega = {omega}");
    // Mixture density sits between saturated vapor and liquid.
    assert!(props.density > 5.0 && props.density < 900.0);
}

#[test]
fn air_heat_capacity_ratio_from_backend_cv() {
    let source = CoolPropSource::new();
    let sample = source
        .lookup(
            Species::Air,
            StateInput::PT {
                p: pa(101_325.0),
                t: k(300.0),
            },
        )
        .unwrap();
    let gamma = sample.gamma().unwrap();

    assert!((gamma - 1.40).abs() < 0.01, "k = {gamma}");
}

#[test]
fn superheated_steam_heat_capacity_ratio() {
    let source = CoolPropSource::new();
    let request = ResolveRequest {
        species: Species::H2O,
        t: k(473.15),
        p_abs: pa(1.0e6),
        phase: PhaseModel::SinglePhase,
        vapor_pressure: false,
    };
    let props = resolve(&source, &request).unwrap();

    // The ideal-gas shortcut gives about 1.19 here.
    assert!(props.k > 1.25 && props.k < 1.40, "k = {}", props.k);
    assert!(!props.k_defaulted);
}

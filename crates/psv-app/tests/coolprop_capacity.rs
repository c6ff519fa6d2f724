//! Capacity check against a real equation of state.

use approx::assert_relative_eq;
use psv_app::report::PROCESS;
use psv_app::{SizingOptions, size_case_file};
use psv_sizing::{FlowUnit, ModeKind};
use std::path::PathBuf;

#[test]
fn nitrogen_capacity_reports_normal_cubic_metres() {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.pop();
    path.push("demos/cases/02_nitrogen_capacity.yaml");

    let options = SizingOptions {
        springs: None,
        history_dir: None,
        user: "tester".to_string(),
    };
    let response = size_case_file(&path, &options).unwrap();
    let result = &response.result;

    assert_eq!(result.mode, ModeKind::Capacity);
    assert_eq!(result.orifice.designation, 'F');
    assert_eq!(result.flow.display.unit, FlowUnit::Nm3PerHr);
    assert!((result.properties.molecular_weight - 28.0134).abs() < 0.01);
    assert_relative_eq!(
        result.flow.display.value,
        result.flow.kg_per_h / result.properties.molecular_weight * 22.414,
        max_relative = 1e-9
    );
    assert!(
        response
            .datasheet
            .get(PROCESS, "Rated Capacity")
            .unwrap()
            .ends_with("Nm3/hr")
    );
}

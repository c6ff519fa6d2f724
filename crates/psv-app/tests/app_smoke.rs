//! Smoke tests for the psv-app service layer against the demo cases.

use psv_app::report::{FLUID, GENERAL, MECHANICAL, PROCESS, RESULTS};
use psv_app::{SizingOptions, list_history, load_case, size_case, size_case_file, summarize_case};
use psv_project::LeverType;
use psv_sizing::{ServiceType, SpringLookup};
use std::path::PathBuf;

fn demo(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.pop();
    path.pop();
    path.push("demos");
    path.push("cases");
    path.push(name);
    path
}

fn options() -> SizingOptions {
    SizingOptions {
        springs: None,
        history_dir: None,
        user: "tester".to_string(),
    }
}

#[test]
fn gas_demo_sizes_with_spring_table() {
    let response = size_case_file(&demo("01_gas_sizing.yaml"), &options()).unwrap();
    let result = &response.result;

    assert_eq!(result.orifice.designation, 'E');
    match &result.spring {
        SpringLookup::Found(range) => assert_eq!(range.spring_id, "S-2"),
        other => panic!("expected a spring, got {other:?}"),
    }

    let sheet = &response.datasheet;
    assert_eq!(sheet.groups.len(), 5);
    assert_eq!(sheet.get(GENERAL, "Tag No"), Some("PSV-101"));
    assert_eq!(sheet.get(PROCESS, "Set Pressure"), Some("10 barg"));
    assert_eq!(sheet.get(FLUID, "Kd"), Some("0.975"));
    assert_eq!(sheet.get(MECHANICAL, "Valve Size"), Some("1\" x 2\""));
    assert_eq!(sheet.get(MECHANICAL, "Inlet Conn"), Some("300# RF"));
    assert_eq!(sheet.get(MECHANICAL, "Lever"), Some("Plain"));
    assert_eq!(sheet.get(RESULTS, "Sizing Basis"), Some("API 520 Part I"));
    assert!(sheet.get(RESULTS, "Calculated Area").unwrap().ends_with("mm²"));
    assert!(response.history_entry.is_none());
}

#[test]
fn open_lever_is_shown_on_datasheet() {
    let path = demo("01_gas_sizing.yaml");
    let mut case = load_case(&path).unwrap();
    case.mechanical.lever = Some(LeverType::Open);

    let response = size_case(&case, path.parent(), &options()).unwrap();
    assert_eq!(response.datasheet.get(MECHANICAL, "Lever"), Some("Open"));
}

#[test]
fn spring_override_replaces_case_table() {
    let table = std::env::temp_dir().join("psv_app_override_springs.csv");
    std::fs::write(&table, "Spring,E\nX-9,9.0-10.5\n").unwrap();

    let options = SizingOptions {
        springs: Some(table),
        ..options()
    };
    let response = size_case_file(&demo("01_gas_sizing.yaml"), &options).unwrap();
    match &response.result.spring {
        SpringLookup::Found(range) => assert_eq!(range.spring_id, "X-9"),
        other => panic!("expected override spring, got {other:?}"),
    }
}

#[test]
fn missing_spring_table_degrades_to_unavailable() {
    let options = SizingOptions {
        springs: Some(PathBuf::from("/nonexistent/springs.csv")),
        ..options()
    };
    let response = size_case_file(&demo("01_gas_sizing.yaml"), &options).unwrap();
    assert!(matches!(
        response.result.spring,
        SpringLookup::Unavailable { .. }
    ));
    assert_eq!(
        response.datasheet.get(MECHANICAL, "Spring Range"),
        Some("Spring table unavailable")
    );
}

#[test]
fn liquid_demo_reports_flags_and_threaded_sizes() {
    let response = size_case_file(&demo("03_liquid_threaded.yaml"), &options()).unwrap();
    let result = &response.result;

    assert_eq!(result.service, ServiceType::Liquid);
    assert!(result.safety.flashing.is_some());
    assert_eq!(
        response.datasheet.get(MECHANICAL, "Inlet Conn"),
        Some("1\" NPT(M)")
    );
    assert_eq!(response.datasheet.get(FLUID, "Viscosity"), Some("2.500 cP"));
    assert!(response.datasheet.get(RESULTS, "Flashing").is_some());
}

#[test]
fn two_phase_demo_uses_omega_basis() {
    let response = size_case_file(&demo("04_two_phase_fire.yaml"), &options()).unwrap();
    assert_eq!(
        response.datasheet.get(RESULTS, "Sizing Basis"),
        Some("API 520 (Omega)")
    );
    assert_eq!(response.datasheet.get(FLUID, "Omega (w)"), Some("1.000"));
    assert_eq!(
        response.datasheet.get(PROCESS, "Overpressure"),
        Some("21% Accumulation")
    );
    assert!(response.result.critical.is_some());
}

#[test]
fn history_is_appended_when_requested() {
    let dir = std::env::temp_dir().join("psv_app_history");
    let _ = std::fs::remove_dir_all(&dir);

    let options = SizingOptions {
        history_dir: Some(dir.clone()),
        ..options()
    };
    let first = size_case_file(&demo("01_gas_sizing.yaml"), &options).unwrap();
    size_case_file(&demo("03_liquid_threaded.yaml"), &options).unwrap();

    let entry = first.history_entry.unwrap();
    assert_eq!(entry.draft.user, "tester");
    assert_eq!(entry.draft.orifice, "E");
    assert_eq!(entry.draft.back_pressure, "0.00 barg");

    assert_eq!(list_history(&dir, None).unwrap().len(), 2);
    let tagged = list_history(&dir, Some("PSV-201")).unwrap();
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged[0].draft.service, "Liquid");
}

#[test]
fn listing_missing_history_leaves_no_directory() {
    let dir = std::env::temp_dir().join("psv_app_history_absent");
    let _ = std::fs::remove_dir_all(&dir);

    assert!(list_history(&dir, None).unwrap().is_empty());
    assert!(list_history(&dir, Some("PSV-101")).unwrap().is_empty());
    assert!(!dir.exists());
}

#[test]
fn summary_names_the_fluid_source() {
    let case = load_case(&demo("02_nitrogen_capacity.yaml")).unwrap();
    let summary = summarize_case(&case);
    assert_eq!(summary.tag, "PSV-102");
    assert_eq!(summary.mode, "Capacity");
    assert_eq!(summary.fluid, "Nitrogen");
}

#[test]
fn missing_case_file_is_a_read_error() {
    let err = load_case(&demo("does_not_exist.yaml")).unwrap_err();
    assert!(matches!(err, psv_app::AppError::CaseFileRead { .. }));
}

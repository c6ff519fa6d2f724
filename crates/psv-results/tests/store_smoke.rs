use psv_results::*;

fn draft(tag: &str, orifice: &str) -> EntryDraft {
    EntryDraft {
        user: "jdoe".to_string(),
        tag: tag.to_string(),
        service: "Gas/Vapor".to_string(),
        mode: "Sizing".to_string(),
        set_pressure: "10 barg".to_string(),
        back_pressure: "0 barg".to_string(),
        orifice: orifice.to_string(),
        valve_size: "1\" x 2\"".to_string(),
        outcome: "97.90 mm²".to_string(),
    }
}

fn fresh_store(name: &str) -> HistoryStore {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    HistoryStore::new(dir).unwrap()
}

#[test]
fn empty_store_lists_nothing() {
    let store = fresh_store("psv_results_empty");
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn append_list_and_filter() {
    let store = fresh_store("psv_results_append");

    let first = HistoryEntry::at(draft("PSV-101", "E"), "2026-10-16T09:00:00+00:00".to_string());
    let second = HistoryEntry::at(draft("PSV-102", "G"), "2026-10-16T09:05:00+00:00".to_string());
    let third = HistoryEntry::stamp(draft("psv-101", "F"));

    store.append(&first).unwrap();
    store.append(&second).unwrap();
    store.append(&third).unwrap();

    let all = store.list().unwrap();
    assert_eq!(all.len(), 3);
    assert_eq!(all[0], first);
    assert_eq!(all[1], second);

    let tagged = store.filter_by_tag("PSV-101").unwrap();
    assert_eq!(tagged.len(), 2);
    assert_eq!(tagged[1].draft.orifice, "F");
}

#[test]
fn reopened_store_keeps_entries() {
    let dir = std::env::temp_dir().join("psv_results_reopen");
    let _ = std::fs::remove_dir_all(&dir);

    let entry = HistoryEntry::stamp(draft("PSV-7", "D"));
    HistoryStore::new(dir.clone()).unwrap().append(&entry).unwrap();

    let reopened = HistoryStore::new(dir).unwrap();
    assert_eq!(reopened.list().unwrap(), vec![entry]);
}

#[test]
fn corrupt_line_is_reported_with_its_number() {
    let store = fresh_store("psv_results_corrupt");
    store
        .append(&HistoryEntry::stamp(draft("PSV-1", "E")))
        .unwrap();
    std::fs::write(
        store.path(),
        format!("{}\nnot json\n", std::fs::read_to_string(store.path()).unwrap().trim()),
    )
    .unwrap();

    match store.list() {
        Err(HistoryError::Corrupt { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected corrupt error, got {other:?}"),
    }
}

#[test]
fn entry_is_one_flat_json_line() {
    let entry = HistoryEntry::at(draft("PSV-1", "E"), "2026-10-16T09:00:00+00:00".to_string());
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["tag"], "PSV-1");
    assert_eq!(json["orifice"], "E");
    assert_eq!(json["id"].as_str().unwrap().len(), 64);
}

#[test]
fn open_does_not_create_missing_directory() {
    let dir = std::env::temp_dir().join("psv_results_open_missing");
    let _ = std::fs::remove_dir_all(&dir);

    let store = HistoryStore::open(dir.clone()).unwrap();
    assert!(store.list().unwrap().is_empty());
    assert!(store.filter_by_tag("PSV-101").unwrap().is_empty());
    assert!(!dir.exists());
}

#[test]
fn open_rejects_a_file_path() {
    let path = std::env::temp_dir().join("psv_results_open_file.txt");
    std::fs::write(&path, "not a directory").unwrap();
    assert!(matches!(
        HistoryStore::open(path),
        Err(HistoryError::InvalidPath { .. })
    ));
}

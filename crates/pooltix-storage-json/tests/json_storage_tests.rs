use std::{sync::Arc, thread, time::Duration as StdDuration};

use chrono::{TimeZone, Utc};
use pooltix_core::{FixedClock, IssueRequest, IssueService, KeyValueStore, LedgerStore, TICKETS_KEY};
use pooltix_domain::{Catalog, DayCalendar};
use pooltix_storage_json::{JsonFileStore, StoragePaths};
use tempfile::tempdir;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 20, 9, 0, 0).unwrap(),
    ))
}

#[test]
fn json_store_round_trips_values_and_reports_missing_keys() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create storage");

    assert_eq!(store.get("tickets").unwrap(), None);
    store.set("tickets", "[]").expect("set");
    assert_eq!(store.get("tickets").unwrap().as_deref(), Some("[]"));

    let path = store.entry_path("tickets");
    assert_eq!(path.extension().and_then(|ext| ext.to_str()), Some("json"));
    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn ledger_survives_restart_on_disk() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let catalog = Catalog::standard();
    let clock = clock();

    {
        let storage = JsonFileStore::new(paths.clone()).expect("create storage");
        let mut ledger = LedgerStore::open(Box::new(storage), clock.clone(), DayCalendar::default());
        IssueService::issue(
            &mut ledger,
            &catalog,
            &IssueRequest::new("adult").with_quantity(2),
        )
        .expect("issue");
    }

    let storage = JsonFileStore::new(paths).expect("reopen storage");
    let raw = storage.get(TICKETS_KEY).unwrap().expect("snapshot written");
    assert!(raw.contains("\"typeName\""));

    let ledger = LedgerStore::open(Box::new(storage), clock, DayCalendar::default());
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.tickets()[0].date, "1403/01/01");
}

#[test]
fn removing_a_key_keeps_a_restorable_backup() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create storage");
    store.set("tickets", r#"[{"marker":1}]"#).unwrap();

    store.remove("tickets").expect("remove");
    assert_eq!(store.get("tickets").unwrap(), None);

    let backups = store.list_backups("tickets").expect("list backups");
    assert_eq!(backups.len(), 1);
    assert!(backups[0].id.starts_with("tickets_"));
    assert!(backups[0].created_at.is_some());

    let (info, payload) = store
        .read_backup("tickets", &backups[0].id)
        .expect("read backup");
    assert_eq!(info.id, backups[0].id);
    assert_eq!(payload, r#"[{"marker":1}]"#);
    assert_eq!(store.get("tickets").unwrap(), None);
}

#[test]
fn removing_a_missing_key_is_not_an_error() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create storage");
    store.remove("tickets").expect("remove missing key");
    assert!(store.list_backups("tickets").unwrap().is_empty());
}

#[test]
fn backups_are_pruned_to_retention() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::with_retention(StoragePaths::under(dir.path()), 2)
        .expect("create storage");

    for round in 0..4 {
        store.set("tickets", &format!("[{round}]")).unwrap();
        store.remove("tickets").unwrap();
        thread::sleep(StdDuration::from_millis(5));
    }

    let backups = store.list_backups("tickets").unwrap();
    assert_eq!(backups.len(), 2);
    let newest = std::fs::read_to_string(&backups[0].path).unwrap();
    assert_eq!(newest, "[3]");
}

#[test]
fn reading_unknown_backup_fails() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create storage");
    assert!(store.read_backup("tickets", "nope.json").is_err());
}

#[test]
fn backups_taken_in_the_same_instant_do_not_overwrite() {
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::new(StoragePaths::under(dir.path())).expect("create storage");

    for round in 0..3 {
        store.set("tickets", &format!("[{round}]")).unwrap();
        store.remove("tickets").unwrap();
    }

    let backups = store.list_backups("tickets").unwrap();
    assert_eq!(backups.len(), 3);
    let (_, newest) = store.read_backup("tickets", &backups[0].id).unwrap();
    assert_eq!(newest, "[2]");
    let mut contents: Vec<String> = backups
        .iter()
        .map(|info| store.read_backup("tickets", &info.id).unwrap().1)
        .collect();
    contents.sort();
    assert_eq!(contents, ["[0]", "[1]", "[2]"]);
}

#[test]
fn backup_restores_into_the_ledger() {
    let dir = tempdir().expect("tempdir");
    let paths = StoragePaths::under(dir.path());
    let catalog = Catalog::standard();
    let storage = JsonFileStore::new(paths.clone()).expect("create storage");
    let mut ledger = LedgerStore::open(Box::new(storage), clock(), DayCalendar::default());
    IssueService::issue(
        &mut ledger,
        &catalog,
        &IssueRequest::new("child").with_quantity(3),
    )
    .expect("issue");
    ledger.clear().expect("clear");
    assert!(ledger.is_empty());

    let reader = JsonFileStore::new(paths).expect("reopen storage");
    let backups = reader.list_backups(TICKETS_KEY).unwrap();
    let (_, payload) = reader.read_backup(TICKETS_KEY, &backups[0].id).unwrap();
    ledger.restore_from(&payload).expect("restore");

    assert_eq!(ledger.len(), 3);
    let live = reader.get(TICKETS_KEY).unwrap().expect("snapshot rewritten");
    assert!(live.contains("child"));
}

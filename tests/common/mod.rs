#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc, sync::Mutex};

use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;
use pooltix_core::{FixedClock, LedgerStore};
use pooltix_domain::DayCalendar;
use pooltix_storage_json::{JsonFileStore, StoragePaths};
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Returns a fresh directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// 2024-03-20 10:45 at +03:30, the first day of 1403.
pub fn nowruz_clock() -> Arc<FixedClock> {
    Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 3, 20, 7, 15, 0).unwrap(),
    ))
}

/// Opens a ledger on disk under `home` with the default calendar.
pub fn open_ledger(home: &std::path::Path, clock: Arc<FixedClock>) -> LedgerStore {
    let storage = JsonFileStore::new(StoragePaths::under(home)).expect("create json storage");
    LedgerStore::open(Box::new(storage), clock, DayCalendar::default())
}

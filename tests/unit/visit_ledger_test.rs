//! Unit tests for the visit ledger: record lifecycle, merge rules, duration
//! formatting, the retention cap, and store-failure resilience.

use std::sync::Arc;

use rstest::rstest;

use quizdeck::database::connection::Database;
use quizdeck::database::store::{KeyValueStore, SqliteStore};
use quizdeck::managers::visit_ledger::{
    format_duration, VisitLedger, VisitLedgerTrait, MAX_VISIT_HISTORY, STORAGE_KEY,
};
use quizdeck::types::errors::StoreError;

fn store() -> Arc<SqliteStore> {
    let db = Arc::new(Database::open_in_memory().expect("Failed to open in-memory database"));
    Arc::new(SqliteStore::new(db))
}

/// A store where every operation fails, as if the backing medium is gone.
struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
        Err(StoreError::ReadError("medium gone".to_string()))
    }
    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::WriteError("medium gone".to_string()))
    }
    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::WriteError("medium gone".to_string()))
    }
}

/// Opening the same URL twice before any close merges into one record with
/// count 2 — never two records.
#[test]
fn test_repeat_open_merges_into_open_record() {
    let mut ledger = VisitLedger::new(store());

    ledger.record_open_at("https://quiz.example/1", "Week 1", 1_000);
    ledger.record_open_at("https://quiz.example/1", "Week 1", 2_000);

    assert_eq!(ledger.visits().len(), 1);
    let record = &ledger.visits()[0];
    assert_eq!(record.count, 2);
    assert_eq!(record.last_visit_time, Some(2_000));
    assert!(record.is_open());
    assert!(ledger.open_record("https://quiz.example/1").is_some());
}

/// A new record goes to the front; `last_visit` tracks creation, not merges.
#[test]
fn test_new_records_insert_front() {
    let mut ledger = VisitLedger::new(store());

    ledger.record_open_at("https://quiz.example/1", "Week 1", 1_000);
    ledger.record_open_at("https://quiz.example/2", "Week 2", 2_000);
    ledger.record_open_at("https://quiz.example/1", "Week 1", 3_000);

    assert_eq!(ledger.visits().len(), 2);
    assert_eq!(ledger.visits()[0].url, "https://quiz.example/2");
    assert_eq!(ledger.visits()[1].count, 2);
    // The merge at 3_000 did not create a record, so last_visit stays at the
    // last creation.
    assert_eq!(ledger.last_visit(), Some(2_000));
}

/// Closing sets end_time and a formatted duration on the open record.
#[test]
fn test_close_sets_end_time_and_duration() {
    let mut ledger = VisitLedger::new(store());

    ledger.record_open_at("https://quiz.example/1", "Week 1", 10_000);
    ledger.record_close_at("https://quiz.example/1", 135_000);
    assert!(ledger.open_record("https://quiz.example/1").is_none());

    let record = &ledger.visits()[0];
    assert_eq!(record.end_time, Some(135_000));
    assert!(record.end_time.unwrap() >= record.start_time);
    assert_eq!(record.duration, "2m 5s");
}

/// Closing targets only the open record: closed history is never touched,
/// and a close with no open visit is a no-op.
#[test]
fn test_close_targets_only_open_record() {
    let url = "https://quiz.example/1";
    let mut ledger = VisitLedger::new(store());

    ledger.record_open_at(url, "Week 1", 1_000);
    ledger.record_close_at(url, 6_000);
    ledger.record_open_at(url, "Week 1", 10_000);
    ledger.record_close_at(url, 12_000);

    assert_eq!(ledger.visits().len(), 2);
    // Most recent first: the second visit closed at 12_000.
    assert_eq!(ledger.visits()[0].end_time, Some(12_000));
    assert_eq!(ledger.visits()[0].duration, "2s");
    // The first visit kept its original close.
    assert_eq!(ledger.visits()[1].end_time, Some(6_000));
    assert_eq!(ledger.visits()[1].duration, "5s");

    // No open record left: closing again changes nothing.
    ledger.record_close_at(url, 99_000);
    assert_eq!(ledger.visits()[0].end_time, Some(12_000));
}

/// The ledger never retains more than the cap after a persist.
#[test]
fn test_retention_cap() {
    let mut ledger = VisitLedger::new(store());

    for i in 0..(MAX_VISIT_HISTORY + 10) {
        ledger.record_open_at(&format!("https://quiz.example/{}", i), "Quiz", i as i64);
    }

    assert_eq!(ledger.visits().len(), MAX_VISIT_HISTORY);
    // Newest at the front, oldest dropped from the tail.
    assert_eq!(
        ledger.visits()[0].url,
        format!("https://quiz.example/{}", MAX_VISIT_HISTORY + 9)
    );
    assert!(ledger
        .visits()
        .iter()
        .all(|v| v.url != "https://quiz.example/0"));
}

/// State persists through the store and reloads wholesale.
#[test]
fn test_reload_from_store() {
    let store = store();

    {
        let mut ledger = VisitLedger::new(store.clone());
        ledger.record_open_at("https://quiz.example/1", "Week 1", 1_000);
        ledger.record_close_at("https://quiz.example/1", 4_000);
    }

    let ledger = VisitLedger::new(store);
    assert_eq!(ledger.visits().len(), 1);
    assert_eq!(ledger.visits()[0].duration, "3s");
    assert_eq!(ledger.visits()[0].end_time, Some(4_000));
}

/// A corrupt stored value degrades to the empty default state.
#[test]
fn test_corrupt_state_degrades_to_default() {
    let store = store();
    store.set(STORAGE_KEY, "{ not json ]").unwrap();

    let ledger = VisitLedger::new(store);
    assert!(ledger.visits().is_empty());
    assert_eq!(ledger.total_time_spent(), 0);
    assert_eq!(ledger.last_visit(), None);
}

/// A failing store never panics or surfaces errors; the in-memory state
/// still works for the session.
#[test]
fn test_failing_store_is_non_fatal() {
    let mut ledger = VisitLedger::new(Arc::new(FailingStore));

    ledger.record_open_at("https://quiz.example/1", "Week 1", 1_000);
    ledger.record_close_at("https://quiz.example/1", 2_000);
    ledger.accumulate_session_time();
    ledger.clear();

    assert!(ledger.visits().is_empty());
}

/// Session time accumulation counts whole seconds since construction.
#[test]
fn test_accumulate_session_time() {
    let store = store();
    let mut ledger = VisitLedger::new(store.clone());

    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_millis() as i64;
    ledger.accumulate_session_time_at(now_ms + 5_000);

    // Construction happened within the last second, so the counter lands on
    // five or six seconds.
    assert!((5..=6).contains(&ledger.total_time_spent()));

    let stored = store.get(STORAGE_KEY).unwrap().expect("stats persisted");
    assert!(stored.contains("totalTimeSpent"));
}

/// Clearing resets state and removes the store key.
#[test]
fn test_clear_removes_store_key() {
    let store = store();
    let mut ledger = VisitLedger::new(store.clone());

    ledger.record_open_at("https://quiz.example/1", "Week 1", 1_000);
    assert!(store.get(STORAGE_KEY).unwrap().is_some());

    ledger.clear();
    assert!(ledger.visits().is_empty());
    assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
}

#[rstest]
#[case(0, "0s")]
#[case(45, "45s")]
#[case(59, "59s")]
#[case(60, "1m 0s")]
#[case(125, "2m 5s")]
#[case(3599, "59m 59s")]
#[case(3600, "1h 0m")]
#[case(3725, "1h 2m")]
#[case(7200, "2h 0m")]
fn test_format_duration(#[case] seconds: i64, #[case] expected: &str) {
    assert_eq!(format_duration(seconds), expected);
}

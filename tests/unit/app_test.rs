//! Unit tests for the App service object: quiz open/close flow, the visited
//! switch, the session timer, and persistence across reopen.

use quizdeck::app::App;
use quizdeck::managers::visit_ledger::VisitLedgerTrait;
use quizdeck::managers::visited_tracker::VisitedTrackerTrait;

const KNOWN_URL: &str = "https://quizizz.com/join?gc=05773812";
const UNKNOWN_URL: &str = "https://quiz.example/not-in-catalog";

/// Opening a catalog quiz flags it and records a visit titled from the
/// catalog entry.
#[test]
fn test_open_quiz_flags_and_records_with_catalog_title() {
    let mut app = App::open_in_memory().unwrap();

    app.open_quiz(KNOWN_URL);

    assert!(app.tracker.is_visited(KNOWN_URL));
    assert_eq!(app.ledger.visits().len(), 1);
    assert_eq!(app.ledger.visits()[0].title, "Week 2");
}

/// Opening a URL the catalog does not know still flags it, but there is no
/// title to record, so no ledger entry is made.
#[test]
fn test_open_unknown_quiz_flags_without_ledger_entry() {
    let mut app = App::open_in_memory().unwrap();

    app.open_quiz(UNKNOWN_URL);

    assert!(app.tracker.is_visited(UNKNOWN_URL));
    assert!(app.ledger.visits().is_empty());
}

/// Closing after opening finishes the visit.
#[test]
fn test_close_quiz_finishes_visit() {
    let mut app = App::open_in_memory().unwrap();

    app.open_quiz(KNOWN_URL);
    app.close_quiz(KNOWN_URL);

    let record = &app.ledger.visits()[0];
    assert!(record.end_time.is_some());
    assert!(!record.duration.is_empty());
}

/// The switch cannot invent a visit: toggling on for a never-visited URL is
/// rejected.
#[test]
fn test_switch_on_rejected_for_unvisited() {
    let mut app = App::open_in_memory().unwrap();

    assert!(!app.set_visited_switch(KNOWN_URL, true));
    assert!(!app.tracker.is_visited(KNOWN_URL));
    assert!(app.ledger.visits().is_empty());
}

/// Toggling on after a real visit re-records it, merging into the open
/// record.
#[test]
fn test_switch_on_after_visit_increments_count() {
    let mut app = App::open_in_memory().unwrap();

    app.open_quiz(KNOWN_URL);
    assert!(app.set_visited_switch(KNOWN_URL, true));

    assert_eq!(app.ledger.visits().len(), 1);
    assert_eq!(app.ledger.visits()[0].count, 2);
}

/// Toggling off clears the flag but the history survives.
#[test]
fn test_switch_off_keeps_history() {
    let mut app = App::open_in_memory().unwrap();

    app.open_quiz(KNOWN_URL);
    assert!(app.set_visited_switch(KNOWN_URL, false));

    assert!(!app.tracker.is_visited(KNOWN_URL));
    let history = app.build_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].url, KNOWN_URL);
}

/// Ticks accumulate session time until the timer is stopped.
#[test]
fn test_tick_respects_timer_state() {
    let mut app = App::open_in_memory().unwrap();
    assert!(app.is_session_timer_running());
    assert_eq!(app.session_timer_interval_secs(), 1);

    app.tick();
    let after_tick = app.ledger.total_time_spent();

    app.stop_session_timer();
    assert!(!app.is_session_timer_running());
    app.tick();
    assert_eq!(app.ledger.total_time_spent(), after_tick);

    app.start_session_timer();
    assert!(app.is_session_timer_running());
}

/// Clearing drops flags and statistics together.
#[test]
fn test_clear_all_data() {
    let mut app = App::open_in_memory().unwrap();

    app.open_quiz(KNOWN_URL);
    app.clear_all_data();

    assert!(!app.tracker.is_visited(KNOWN_URL));
    assert!(app.ledger.visits().is_empty());
    assert!(app.build_history().is_empty());
}

/// Visits and flags survive a full close and reopen of the on-disk
/// database.
#[test]
fn test_state_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quizdeck.db");
    let path = path.to_str().unwrap();

    {
        let mut app = App::open(path).unwrap();
        app.open_quiz(KNOWN_URL);
        app.close_quiz(KNOWN_URL);
    }

    let app = App::open(path).unwrap();
    assert!(app.tracker.is_visited(KNOWN_URL));
    assert_eq!(app.ledger.visits().len(), 1);
    assert_eq!(app.ledger.visits()[0].title, "Week 2");
    assert!(app.ledger.visits()[0].end_time.is_some());
}
